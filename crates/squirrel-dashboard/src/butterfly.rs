//! Butterfly chart: activity counts split by shift, AM bars to the left and
//! PM bars to the right of a shared zero axis.

use serde::Serialize;

use squirrel_core::{Emphasis, FilterScope, emphasis_for, highlighted_activities, working_set};
use squirrel_model::{Activity, Record, Shift};

use crate::config::ScaleMode;
use crate::palette::activity_color;
use crate::view::{DataSource, LegendEntry, RenderContext, View, ViewFrame, legend};

/// AM/PM sighting counts for one activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShiftCounts {
    pub am: u32,
    pub pm: u32,
}

impl ShiftCounts {
    pub fn max(&self) -> u32 {
        self.am.max(self.pm)
    }
}

/// Count each activity per shift. Records without a shift are not counted.
pub fn shift_counts<'a>(records: impl IntoIterator<Item = &'a Record>) -> [ShiftCounts; 12] {
    let mut counts = [ShiftCounts::default(); 12];
    for record in records {
        let Some(shift) = record.shift else {
            continue;
        };
        for activity in record.activities.iter() {
            let slot = &mut counts[activity.index()];
            match shift {
                Shift::Am => slot.am += 1,
                Shift::Pm => slot.pm += 1,
            }
        }
    }
    counts
}

/// Largest single-shift count, never below 1 so the scale has extent.
fn scale_max(counts: &[ShiftCounts; 12]) -> u32 {
    counts.iter().map(ShiftCounts::max).max().unwrap_or(0).max(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityBar {
    pub activity: Activity,
    pub color: &'static str,
    pub am: u32,
    pub pm: u32,
    pub emphasis: Emphasis,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButterflyFrame {
    pub scale_mode: ScaleMode,
    /// Symmetric x-domain is `[-scale_max, scale_max]`.
    pub scale_max: u32,
    /// Records contributing to the bars.
    pub records: usize,
    pub highlighted: Vec<Activity>,
    /// One bar pair per activity, in canonical order.
    pub bars: Vec<ActivityBar>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Default)]
pub struct ButterflyChart {
    scale_mode: ScaleMode,
    /// Full-dataset maximum, computed on the first render after a reset.
    fixed_max: Option<u32>,
}

impl ButterflyChart {
    pub fn new(scale_mode: ScaleMode) -> Self {
        Self {
            scale_mode,
            fixed_max: None,
        }
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    pub fn set_scale_mode(&mut self, scale_mode: ScaleMode) {
        self.scale_mode = scale_mode;
    }
}

impl View for ButterflyChart {
    fn name(&self) -> &'static str {
        "butterfly"
    }

    fn source(&self) -> DataSource {
        DataSource::Records
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> ViewFrame {
        let Some(all) = ctx.records else {
            return ViewFrame::Pending;
        };
        let fixed_max = *self
            .fixed_max
            .get_or_insert_with(|| scale_max(&shift_counts(all)));

        let plotted = working_set(all, ctx.filters, ctx.selection, FilterScope::SubsettingOnly);
        if plotted.is_empty() {
            return ViewFrame::empty("no records match the current filters and selection");
        }

        let counts = shift_counts(plotted.iter().copied());
        let domain_max = match self.scale_mode {
            ScaleMode::Fixed => fixed_max,
            ScaleMode::Dynamic => scale_max(&counts),
        };
        let levels = &ctx.config.opacity.bars;
        let bars = Activity::ALL
            .into_iter()
            .map(|activity| {
                let ShiftCounts { am, pm } = counts[activity.index()];
                let emphasis = emphasis_for(activity, ctx.filters);
                ActivityBar {
                    activity,
                    color: activity_color(activity),
                    am,
                    pm,
                    emphasis,
                    opacity: levels.for_emphasis(emphasis),
                }
            })
            .collect();

        ViewFrame::Butterfly(ButterflyFrame {
            scale_mode: self.scale_mode,
            scale_max: domain_max,
            records: plotted.len(),
            highlighted: highlighted_activities(ctx.filters),
            bars,
            legend: legend(ctx.filters, &ctx.config.opacity.legend),
        })
    }

    fn reset(&mut self) {
        self.fixed_max = None;
    }
}
