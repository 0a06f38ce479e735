//! Loading of the squirrel census inputs.
//!
//! Two sources feed the dashboard: the merged sightings dataset (JSON, or the
//! `;`-separated CSV it is exported from) and the sightings GeoJSON layer.
//! Both are normalized into `squirrel-model` types; malformed rows are
//! skipped and reported instead of aborting the load.

pub mod error;
pub mod features;
pub mod normalize;
pub mod records;
pub mod report;
pub mod sanitize;

pub use error::{IngestError, Result};
pub use features::{load_features, parse_features};
pub use records::{
    CsvOptions, load_records, load_records_csv, load_records_json, parse_records_csv,
    parse_records_json,
};
pub use report::{LoadReport, SkippedEntry};
pub use sanitize::sanitize_json;
