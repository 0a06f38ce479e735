//! Line chart: activity frequency by rounded temperature, one series per
//! activity.
//!
//! Both axes use domains computed once from the full dataset so series stay
//! comparable while filters change. The x-axis can be zoomed to a sub-range
//! (a horizontal brush in the UI) and reset.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use squirrel_core::{Emphasis, FilterScope, emphasis_for, highlighted_activities, working_set};
use squirrel_model::{Activity, Record};

use crate::palette::activity_color;
use crate::view::{DataSource, LegendEntry, RenderContext, View, ViewFrame, legend};

/// Activity counts for one rounded temperature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemperatureBucket {
    pub temperature: i64,
    /// Indexed by [`Activity::index`].
    pub counts: [u32; 12],
}

/// Round half up, so 52.5 becomes 53 and -2.5 becomes -2.
fn round_temperature(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Group records by rounded temperature in ascending order.
///
/// Records without a temperature are skipped.
pub fn group_by_temperature<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> Vec<TemperatureBucket> {
    let mut groups: BTreeMap<i64, [u32; 12]> = BTreeMap::new();
    for record in records {
        let Some(value) = record.temperature.filter(|t| t.is_finite()) else {
            continue;
        };
        let counts = groups.entry(round_temperature(value)).or_insert([0; 12]);
        for activity in record.activities.iter() {
            counts[activity.index()] += 1;
        }
    }
    groups
        .into_iter()
        .map(|(temperature, counts)| TemperatureBucket {
            temperature,
            counts,
        })
        .collect()
}

/// Fixed axis domains from the full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domains {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Domains {
    /// `None` when no record carries a temperature.
    fn from_buckets(buckets: &[TemperatureBucket]) -> Option<Self> {
        let first = buckets.first()?.temperature as f64;
        let last = buckets.last()?.temperature as f64;
        let max_count = buckets
            .iter()
            .flat_map(|bucket| bucket.counts)
            .max()
            .unwrap_or(0)
            .max(1);
        Some(Self {
            x: (first, last),
            y: (0.0, f64::from(max_count)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub temperature: i64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub activity: Activity,
    pub color: &'static str,
    pub emphasis: Emphasis,
    pub line_opacity: f64,
    pub dot_opacity: f64,
    /// Points inside the visible x-domain, ascending by temperature.
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFrame {
    /// Visible x-domain (zoomed or global).
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    pub global_x_domain: (f64, f64),
    pub zoomed: bool,
    pub records: usize,
    pub highlighted: Vec<Activity>,
    pub series: Vec<Series>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Default)]
pub struct LineChart {
    domains: Option<Domains>,
    zoom: Option<(f64, f64)>,
}

impl LineChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the x-axis to `[lo, hi]` (order-insensitive).
    ///
    /// Returns false and leaves the zoom unchanged for an empty or
    /// non-finite range.
    pub fn zoom_to(&mut self, lo: f64, hi: f64) -> bool {
        if !lo.is_finite() || !hi.is_finite() || lo == hi {
            warn!(lo, hi, "ignoring degenerate zoom range");
            return false;
        }
        self.zoom = Some((lo.min(hi), lo.max(hi)));
        true
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = None;
    }

    pub fn zoom(&self) -> Option<(f64, f64)> {
        self.zoom
    }
}

impl View for LineChart {
    fn name(&self) -> &'static str {
        "line_chart"
    }

    fn source(&self) -> DataSource {
        DataSource::Records
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> ViewFrame {
        let Some(all) = ctx.records else {
            return ViewFrame::Pending;
        };
        if self.domains.is_none() {
            self.domains = Domains::from_buckets(&group_by_temperature(all));
        }
        let Some(domains) = self.domains else {
            return ViewFrame::empty("no records carry a temperature");
        };

        let plotted = working_set(all, ctx.filters, ctx.selection, FilterScope::SubsettingOnly);
        if plotted.is_empty() {
            return ViewFrame::empty("no records match the current filters and selection");
        }
        let buckets = group_by_temperature(plotted.iter().copied());
        if buckets.is_empty() {
            return ViewFrame::empty("no matching record carries a temperature");
        }

        let x_domain = self.zoom.unwrap_or(domains.x);
        let visible = |temperature: i64| {
            let t = temperature as f64;
            t >= x_domain.0 && t <= x_domain.1
        };
        let opacity = &ctx.config.opacity;
        let series = Activity::ALL
            .into_iter()
            .map(|activity| {
                let emphasis = emphasis_for(activity, ctx.filters);
                Series {
                    activity,
                    color: activity_color(activity),
                    emphasis,
                    line_opacity: opacity.lines.for_emphasis(emphasis),
                    dot_opacity: opacity.dots.for_emphasis(emphasis),
                    points: buckets
                        .iter()
                        .filter(|bucket| visible(bucket.temperature))
                        .map(|bucket| SeriesPoint {
                            temperature: bucket.temperature,
                            count: bucket.counts[activity.index()],
                        })
                        .collect(),
                }
            })
            .collect();

        ViewFrame::Line(LineFrame {
            x_domain,
            y_domain: domains.y,
            global_x_domain: domains.x,
            zoomed: self.zoom.is_some(),
            records: plotted.len(),
            highlighted: highlighted_activities(ctx.filters),
            series,
            legend: legend(ctx.filters, &opacity.legend),
        })
    }

    fn reset(&mut self) {
        self.domains = None;
        self.zoom = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squirrel_core::{FilterState, Selection};
    use squirrel_model::{AgeGroup, RecordId};

    use crate::config::DashboardConfig;

    fn record(id: &str, temperature: Option<f64>, activities: &[Activity]) -> Record {
        let mut record = Record::new(RecordId::new(id).expect("id"));
        record.temperature = temperature;
        record.activities = activities.iter().copied().collect();
        record
    }

    #[test]
    fn groups_rounded_temperatures_ascending() {
        let records = [
            record("a", Some(61.4), &[Activity::Eating]),
            record("b", Some(52.5), &[Activity::Eating, Activity::Kuks]),
            record("c", Some(60.6), &[Activity::Eating]),
            record("d", None, &[Activity::Eating]),
        ];
        let buckets = group_by_temperature(&records);
        let temperatures: Vec<i64> = buckets.iter().map(|b| b.temperature).collect();
        assert_eq!(temperatures, vec![53, 61]);
        assert_eq!(buckets[1].counts[Activity::Eating.index()], 2);
        assert_eq!(buckets[0].counts[Activity::Kuks.index()], 1);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_temperature(-2.5), -2);
        assert_eq!(round_temperature(2.5), 3);
        assert_eq!(round_temperature(2.49), 2);
    }

    #[test]
    fn domains_from_full_dataset() {
        let records = [
            record("a", Some(40.0), &[]),
            record("b", Some(70.2), &[Activity::Running]),
        ];
        let domains = Domains::from_buckets(&group_by_temperature(&records)).expect("domains");
        assert_eq!(domains.x, (40.0, 70.0));
        assert_eq!(domains.y, (0.0, 1.0));
    }

    #[test]
    fn zoom_rejects_degenerate_ranges() {
        let mut chart = LineChart::new();
        assert!(!chart.zoom_to(50.0, 50.0));
        assert!(!chart.zoom_to(f64::NAN, 60.0));
        assert!(chart.zoom_to(70.0, 50.0));
        assert_eq!(chart.zoom(), Some((50.0, 70.0)));
        chart.reset_zoom();
        assert_eq!(chart.zoom(), None);
    }

    #[test]
    fn empty_reason_tells_missing_temperatures_from_no_match() {
        let mut adult = record("a", None, &[Activity::Running]);
        adult.age = AgeGroup::Adult;
        let records = vec![adult, record("b", Some(60.0), &[Activity::Running])];
        let config = DashboardConfig::default();
        let selection = Selection::default();
        let render = |age: AgeGroup| {
            let filters = FilterState {
                ages: [age].into_iter().collect(),
                ..FilterState::default()
            };
            let ctx = RenderContext {
                records: Some(&records),
                features: None,
                filters: &filters,
                selection: &selection,
                config: &config,
            };
            LineChart::new().render(&ctx)
        };

        assert_eq!(
            render(AgeGroup::Adult),
            ViewFrame::empty("no matching record carries a temperature")
        );
        assert_eq!(
            render(AgeGroup::Juvenile),
            ViewFrame::empty("no records match the current filters and selection")
        );
    }
}
