//! Data model for the squirrel census dashboard.

pub mod enums;
pub mod error;
pub mod ids;
pub mod record;

pub use enums::{Activity, AgeGroup, FurColor, Shift};
pub use error::{ModelError, Result};
pub use ids::RecordId;
pub use record::{ActivitySet, GeoPoint, Record, Sighting, SightingFeature};
