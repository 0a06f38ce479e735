//! View models and orchestration for the squirrel census dashboard.
//!
//! Three views share one filter store and one selection store:
//!
//! - **butterfly** - AM/PM activity counts; behaviors only change emphasis
//! - **line chart** - activity frequency by temperature; behaviors only
//!   change emphasis
//! - **map** - sightings filtered by every category; the brush produces the
//!   cross-view selection
//!
//! [`Dashboard`] wires them together and re-renders synchronously after each
//! interaction.

pub mod actions;
pub mod butterfly;
pub mod config;
pub mod dashboard;
pub mod line_chart;
pub mod map;
pub mod palette;
pub mod view;

pub use actions::{Action, ActionParseError, ScriptError, parse_script};
pub use butterfly::{ActivityBar, ButterflyChart, ButterflyFrame, ShiftCounts, shift_counts};
pub use config::{ConfigError, DashboardConfig, OpacityLevels, OpacityScheme, ScaleMode, Viewport};
pub use dashboard::{Dashboard, DashboardStatus, Frames, ViewKind};
pub use line_chart::{
    Domains, LineChart, LineFrame, Series, SeriesPoint, TemperatureBucket, group_by_temperature,
};
pub use map::{
    LinearProjector, MapFrame, MapPoint, MapView, PointEmphasis, Projector, Rect, ScreenPoint,
};
pub use view::{DataSource, LegendEntry, RenderContext, View, ViewFrame};
