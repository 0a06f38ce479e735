//! The orchestrator: owns the data, both stores, and every view.
//!
//! Store callbacks only mark views dirty. Each public mutation then runs a
//! render pass before returning, so frames always reflect the latest state.
//! Views whose input has not arrived stay [`ViewFrame::Pending`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use squirrel_core::{FilterState, FilterStore, Selection, SelectionEvent, SelectionStore};
use squirrel_model::{Activity, AgeGroup, FurColor, Record, SightingFeature};

use crate::actions::Action;
use crate::butterfly::ButterflyChart;
use crate::config::{DashboardConfig, ScaleMode};
use crate::line_chart::LineChart;
use crate::map::{MapView, Rect};
use crate::view::{DataSource, RenderContext, View, ViewFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Butterfly,
    LineChart,
    Map,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Butterfly, ViewKind::LineChart, ViewKind::Map];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Butterfly => "butterfly",
            ViewKind::LineChart => "line_chart",
            ViewKind::Map => "map",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Views awaiting a render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Dirty {
    butterfly: bool,
    line_chart: bool,
    map: bool,
}

impl Dirty {
    const ALL: Dirty = Dirty {
        butterfly: true,
        line_chart: true,
        map: true,
    };

    fn with(mut self, kind: ViewKind) -> Self {
        match kind {
            ViewKind::Butterfly => self.butterfly = true,
            ViewKind::LineChart => self.line_chart = true,
            ViewKind::Map => self.map = true,
        }
        self
    }

    fn contains(&self, kind: ViewKind) -> bool {
        match kind {
            ViewKind::Butterfly => self.butterfly,
            ViewKind::LineChart => self.line_chart,
            ViewKind::Map => self.map,
        }
    }

    fn is_clean(&self) -> bool {
        *self == Dirty::default()
    }
}

/// Latest frame of every view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frames {
    pub butterfly: ViewFrame,
    pub line_chart: ViewFrame,
    pub map: ViewFrame,
}

impl Default for Frames {
    fn default() -> Self {
        Self {
            butterfly: ViewFrame::Pending,
            line_chart: ViewFrame::Pending,
            map: ViewFrame::Pending,
        }
    }
}

impl Frames {
    pub fn get(&self, kind: ViewKind) -> &ViewFrame {
        match kind {
            ViewKind::Butterfly => &self.butterfly,
            ViewKind::LineChart => &self.line_chart,
            ViewKind::Map => &self.map,
        }
    }

    fn set(&mut self, kind: ViewKind, frame: ViewFrame) {
        match kind {
            ViewKind::Butterfly => self.butterfly = frame,
            ViewKind::LineChart => self.line_chart = frame,
            ViewKind::Map => self.map = frame,
        }
    }
}

/// Serializable summary of the dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStatus {
    /// `None` until the records have loaded.
    pub records: Option<usize>,
    /// `None` until the features have loaded.
    pub features: Option<usize>,
    pub filters: FilterState,
    pub selected: usize,
    pub scale_mode: ScaleMode,
    pub zoom: Option<(f64, f64)>,
    pub render_passes: u64,
}

pub struct Dashboard {
    config: DashboardConfig,
    records: Option<Vec<Record>>,
    features: Option<Vec<SightingFeature>>,
    filters: FilterStore,
    selection: SelectionStore,
    butterfly: ButterflyChart,
    line_chart: LineChart,
    map: MapView,
    frames: Frames,
    dirty: Rc<Cell<Dirty>>,
    render_passes: u64,
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("records", &self.records.as_ref().map(Vec::len))
            .field("features", &self.features.as_ref().map(Vec::len))
            .field("filters", &self.filters)
            .field("selection", &self.selection)
            .field("render_passes", &self.render_passes)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self::with_map(config, MapView::new())
    }

    /// Build with a preconfigured map view (for a surface-supplied projector).
    pub fn with_map(config: DashboardConfig, map: MapView) -> Self {
        let dirty = Rc::new(Cell::new(Dirty::default()));

        let mut filters = FilterStore::new();
        let on_filters = Rc::clone(&dirty);
        filters.set_on_change(move |_| on_filters.set(Dirty::ALL));

        let mut selection = SelectionStore::new();
        let on_selection = Rc::clone(&dirty);
        selection.on(SelectionEvent::Change, move |_| on_selection.set(Dirty::ALL));

        Self {
            butterfly: ButterflyChart::new(config.scale_mode),
            config,
            records: None,
            features: None,
            filters,
            selection,
            line_chart: LineChart::new(),
            map,
            frames: Frames::default(),
            dirty,
            render_passes: 0,
        }
    }

    // === Data arrival ===

    /// Deliver the records collection. Either load may arrive first.
    pub fn records_loaded(&mut self, records: Vec<Record>) {
        info!(records = records.len(), "records loaded");
        self.records = Some(records);
        self.butterfly.reset();
        self.line_chart.reset();
        self.mark(ViewKind::Butterfly);
        self.mark(ViewKind::LineChart);
        self.flush();
    }

    /// Deliver the sightings layer. Either load may arrive first.
    pub fn features_loaded(&mut self, features: Vec<SightingFeature>) {
        info!(features = features.len(), "features loaded");
        self.features = Some(features);
        self.map.reset();
        self.mark(ViewKind::Map);
        self.flush();
    }

    /// Record a failed load. The source stays absent and its views pending;
    /// other views are unaffected.
    pub fn load_failed(&mut self, source: DataSource, reason: &dyn fmt::Display) {
        error!(source = source.as_str(), %reason, "load failed");
    }

    // === Filter interactions ===

    pub fn toggle_behavior(&mut self, activity: Activity) {
        self.filters.toggle_behavior(activity);
        self.flush();
    }

    /// A click on a chart legend row.
    pub fn legend_click(&mut self, activity: Activity) {
        self.toggle_behavior(activity);
    }

    pub fn toggle_age(&mut self, age: AgeGroup) {
        self.filters.toggle_age_value(age);
        self.flush();
    }

    pub fn toggle_color(&mut self, color: FurColor) {
        self.filters.toggle_color(color);
        self.flush();
    }

    pub fn toggle_dogs(&mut self) {
        self.filters.toggle_dogs();
        self.flush();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
        self.flush();
    }

    // === Selection ===

    /// Select the shown map points inside `rect`; a brush that hits nothing
    /// clears the selection. Returns the number of selected points.
    ///
    /// Ignored (with a warning) while the map has no data.
    pub fn brush(&mut self, rect: Rect) -> usize {
        if self.features.is_none() {
            warn!("map has no data yet; brush ignored");
            return 0;
        }
        let ids = self.map.brush_select(rect);
        let hits = ids.len();
        debug!(hits, "brush");
        if ids.is_empty() {
            self.selection.clear();
        } else {
            self.selection.set(ids);
        }
        self.flush();
        hits
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.flush();
    }

    // === View settings ===

    /// Zoom the line chart x-axis. Returns false when ignored.
    pub fn zoom(&mut self, lo: f64, hi: f64) -> bool {
        if self.records.is_none() {
            warn!("line chart has no data yet; zoom ignored");
            return false;
        }
        if !self.line_chart.zoom_to(lo, hi) {
            return false;
        }
        self.mark(ViewKind::LineChart);
        self.flush();
        true
    }

    pub fn reset_zoom(&mut self) {
        if self.records.is_none() {
            warn!("line chart has no data yet; zoom reset ignored");
            return;
        }
        self.line_chart.reset_zoom();
        self.mark(ViewKind::LineChart);
        self.flush();
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.butterfly.set_scale_mode(mode);
        self.mark(ViewKind::Butterfly);
        self.flush();
    }

    pub fn apply(&mut self, action: &Action) {
        match *action {
            Action::ToggleBehavior(activity) => self.toggle_behavior(activity),
            Action::ToggleAge(age) => self.toggle_age(age),
            Action::ToggleColor(color) => self.toggle_color(color),
            Action::ToggleDogs => self.toggle_dogs(),
            Action::ClearFilters => self.clear_filters(),
            Action::Brush(rect) => {
                self.brush(rect);
            }
            Action::ClearSelection => self.clear_selection(),
            Action::Zoom { lo, hi } => {
                self.zoom(lo, hi);
            }
            Action::ResetZoom => self.reset_zoom(),
            Action::SetScale(mode) => self.set_scale_mode(mode),
        }
    }

    // === Accessors ===

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn records(&self) -> Option<&[Record]> {
        self.records.as_deref()
    }

    pub fn features(&self) -> Option<&[SightingFeature]> {
        self.features.as_deref()
    }

    pub fn filters(&self) -> &FilterState {
        self.filters.state()
    }

    pub fn selection(&self) -> Selection {
        self.selection.get()
    }

    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    pub fn frame(&self, kind: ViewKind) -> &ViewFrame {
        self.frames.get(kind)
    }

    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            records: self.records.as_ref().map(Vec::len),
            features: self.features.as_ref().map(Vec::len),
            filters: self.filters.snapshot(),
            selected: self.selection.get().len(),
            scale_mode: self.butterfly.scale_mode(),
            zoom: self.line_chart.zoom(),
            render_passes: self.render_passes,
        }
    }

    fn mark(&self, kind: ViewKind) {
        self.dirty.set(self.dirty.get().with(kind));
    }

    /// Render every dirty view whose data has arrived.
    fn flush(&mut self) {
        let dirty = self.dirty.take();
        if dirty.is_clean() {
            return;
        }
        let selection = self.selection.get();
        let ctx = RenderContext {
            records: self.records.as_deref(),
            features: self.features.as_deref(),
            filters: self.filters.state(),
            selection: &selection,
            config: &self.config,
        };

        let mut rendered = Vec::new();
        for kind in ViewKind::ALL {
            if !dirty.contains(kind) {
                continue;
            }
            let view: &mut dyn View = match kind {
                ViewKind::Butterfly => &mut self.butterfly,
                ViewKind::LineChart => &mut self.line_chart,
                ViewKind::Map => &mut self.map,
            };
            if !ctx.is_ready(view.source()) {
                debug!(view = view.name(), "waiting for {}", view.source().as_str());
                continue;
            }
            let frame = view.render(&ctx);
            debug!(view = view.name(), status = frame.status(), "rendered");
            self.frames.set(kind, frame);
            rendered.push(kind.as_str());
        }

        if !rendered.is_empty() {
            self.render_passes += 1;
            info!(
                views = %rendered.join(","),
                filters = %ctx.filters,
                selected = selection.len(),
                "render pass"
            );
        }
    }
}
