//! The contract between the orchestrator and each view.

use serde::Serialize;

use squirrel_core::{Emphasis, FilterState, Selection, emphasis_for};
use squirrel_model::{Activity, Record, SightingFeature};

use crate::butterfly::ButterflyFrame;
use crate::config::{DashboardConfig, OpacityLevels};
use crate::line_chart::LineFrame;
use crate::map::MapFrame;
use crate::palette::activity_color;

/// Which loaded input a view plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The flat records collection (charts).
    Records,
    /// The GeoJSON sightings layer (map).
    Features,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Records => "records",
            DataSource::Features => "features",
        }
    }
}

/// Everything a view may read during one render pass.
///
/// Views only ever see snapshots; they cannot mutate the stores.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub records: Option<&'a [Record]>,
    pub features: Option<&'a [SightingFeature]>,
    pub filters: &'a FilterState,
    pub selection: &'a Selection,
    pub config: &'a DashboardConfig,
}

impl RenderContext<'_> {
    pub fn is_ready(&self, source: DataSource) -> bool {
        match source {
            DataSource::Records => self.records.is_some(),
            DataSource::Features => self.features.is_some(),
        }
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewFrame {
    /// Required data has not arrived yet.
    Pending,
    /// Data is loaded but nothing survives filtering and selection.
    Empty { reason: String },
    Butterfly(ButterflyFrame),
    Line(LineFrame),
    Map(MapFrame),
}

impl ViewFrame {
    pub fn empty(reason: impl Into<String>) -> Self {
        ViewFrame::Empty {
            reason: reason.into(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ViewFrame::Pending)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ViewFrame::Empty { .. })
    }

    pub fn as_butterfly(&self) -> Option<&ButterflyFrame> {
        match self {
            ViewFrame::Butterfly(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineFrame> {
        match self {
            ViewFrame::Line(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapFrame> {
        match self {
            ViewFrame::Map(frame) => Some(frame),
            _ => None,
        }
    }

    /// Short status word for tables.
    pub fn status(&self) -> &'static str {
        match self {
            ViewFrame::Pending => "pending",
            ViewFrame::Empty { .. } => "empty",
            ViewFrame::Butterfly(_) | ViewFrame::Line(_) | ViewFrame::Map(_) => "rendered",
        }
    }
}

/// A dashboard view.
///
/// Views read the context, never each other, and produce a deterministic
/// frame. They may cache values derived from the full dataset (fixed scale
/// domains); the orchestrator calls [`View::reset`] when that dataset is
/// replaced.
pub trait View {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Input that must be loaded before [`View::render`] is called.
    fn source(&self) -> DataSource;

    fn render(&mut self, ctx: &RenderContext<'_>) -> ViewFrame;

    /// Drop caches derived from the previous dataset.
    fn reset(&mut self) {}
}

/// One clickable legend row; clicking toggles the behavior filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub activity: Activity,
    pub color: &'static str,
    pub emphasis: Emphasis,
    pub opacity: f64,
}

pub(crate) fn legend(filters: &FilterState, levels: &OpacityLevels) -> Vec<LegendEntry> {
    Activity::ALL
        .into_iter()
        .map(|activity| {
            let emphasis = emphasis_for(activity, filters);
            LegendEntry {
                activity,
                color: activity_color(activity),
                emphasis,
                opacity: levels.for_emphasis(emphasis),
            }
        })
        .collect()
}
