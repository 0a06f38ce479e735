//! End-to-end behavior of the orchestrator over a three-record census.

use squirrel_core::Emphasis;
use squirrel_dashboard::{
    Action, ButterflyFrame, Dashboard, DashboardConfig, DataSource, LineFrame, MapFrame, MapView,
    PointEmphasis, Projector, Rect, ScaleMode, ScreenPoint, ViewKind, parse_script,
};
use squirrel_model::{
    Activity, ActivitySet, AgeGroup, FurColor, GeoPoint, Record, RecordId, Shift,
    SightingFeature,
};

/// Screen coordinates equal to lon/lat, so brush rectangles are easy to
/// reason about.
struct Identity;

impl Projector for Identity {
    fn project(&self, point: GeoPoint) -> ScreenPoint {
        ScreenPoint {
            x: point.lon,
            y: point.lat,
        }
    }
}

fn rid(raw: &str) -> RecordId {
    RecordId::new(raw).expect("test id")
}

fn activities(list: &[Activity]) -> ActivitySet {
    list.iter().copied().collect()
}

struct Sighting {
    id: &'static str,
    age: AgeGroup,
    color: FurColor,
    shift: Shift,
    activities: &'static [Activity],
    temperature: f64,
    dogs: u32,
    at: (f64, f64),
}

const CENSUS: [Sighting; 3] = [
    Sighting {
        id: "R1",
        age: AgeGroup::Adult,
        color: FurColor::Gray,
        shift: Shift::Am,
        activities: &[Activity::Running],
        temperature: 60.2,
        dogs: 0,
        at: (1.0, 1.0),
    },
    Sighting {
        id: "R2",
        age: AgeGroup::Juvenile,
        color: FurColor::Black,
        shift: Shift::Pm,
        activities: &[Activity::Climbing],
        temperature: 60.6,
        dogs: 1,
        at: (2.0, 2.0),
    },
    Sighting {
        id: "R3",
        age: AgeGroup::Adult,
        color: FurColor::Cinnamon,
        shift: Shift::Pm,
        activities: &[Activity::Running, Activity::Climbing],
        temperature: 71.0,
        dogs: 0,
        at: (10.0, 10.0),
    },
];

fn records() -> Vec<Record> {
    CENSUS
        .iter()
        .map(|s| {
            let mut record = Record::new(rid(s.id));
            record.age = s.age;
            record.fur_color = s.color;
            record.shift = Some(s.shift);
            record.activities = activities(s.activities);
            record.temperature = Some(s.temperature);
            record.dogs = s.dogs;
            record
        })
        .collect()
}

/// The census sightings plus F9, a point that exists only on the map.
fn features() -> Vec<SightingFeature> {
    let mut features: Vec<SightingFeature> = CENSUS
        .iter()
        .map(|s| SightingFeature {
            id: rid(s.id),
            position: GeoPoint::new(s.at.0, s.at.1).expect("position"),
            date: None,
            age: s.age,
            fur_color: s.color,
            activities: activities(s.activities),
            dogs: Some(s.dogs),
        })
        .collect();
    features.push(SightingFeature {
        id: rid("F9"),
        position: GeoPoint::new(20.0, 20.0).expect("position"),
        date: None,
        age: AgeGroup::Adult,
        fur_color: FurColor::Gray,
        activities: ActivitySet::new(),
        dogs: None,
    });
    features
}

fn dashboard() -> Dashboard {
    Dashboard::with_map(
        DashboardConfig::default(),
        MapView::with_projector(Box::new(Identity)),
    )
}

fn loaded() -> Dashboard {
    let mut dashboard = dashboard();
    dashboard.records_loaded(records());
    dashboard.features_loaded(features());
    dashboard
}

fn butterfly(dashboard: &Dashboard) -> &ButterflyFrame {
    dashboard
        .frame(ViewKind::Butterfly)
        .as_butterfly()
        .expect("butterfly rendered")
}

fn line(dashboard: &Dashboard) -> &LineFrame {
    dashboard
        .frame(ViewKind::LineChart)
        .as_line()
        .expect("line chart rendered")
}

fn map(dashboard: &Dashboard) -> &MapFrame {
    dashboard.frame(ViewKind::Map).as_map().expect("map rendered")
}

fn bar(frame: &ButterflyFrame, activity: Activity) -> (u32, u32) {
    let bar = &frame.bars[activity.index()];
    (bar.am, bar.pm)
}

fn shown_ids(frame: &MapFrame) -> Vec<&str> {
    frame.points.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn nothing_renders_before_data() {
    let mut dashboard = dashboard();
    dashboard.toggle_behavior(Activity::Running);
    dashboard.clear_filters();
    assert_eq!(dashboard.brush(Rect::new(0.0, 0.0, 100.0, 100.0)), 0);
    assert!(!dashboard.zoom(50.0, 60.0));

    for kind in ViewKind::ALL {
        assert!(dashboard.frame(kind).is_pending(), "{kind} rendered early");
    }
    assert_eq!(dashboard.status().render_passes, 0);
}

#[test]
fn tolerates_features_before_records() {
    let mut dashboard = dashboard();
    dashboard.features_loaded(features());
    assert_eq!(map(&dashboard).shown, 4);
    assert!(dashboard.frame(ViewKind::Butterfly).is_pending());
    assert!(dashboard.frame(ViewKind::LineChart).is_pending());

    dashboard.records_loaded(records());
    assert_eq!(butterfly(&dashboard).records, 3);
    assert_eq!(line(&dashboard).records, 3);
}

#[test]
fn failed_load_leaves_views_pending() {
    let mut dashboard = dashboard();
    dashboard.load_failed(DataSource::Features, &"connection reset");
    dashboard.records_loaded(records());
    assert!(dashboard.frame(ViewKind::Map).is_pending());
    assert!(!dashboard.frame(ViewKind::Butterfly).is_pending());
    assert_eq!(dashboard.status().features, None);
}

#[test]
fn behaviors_highlight_charts_and_subset_the_map() {
    let mut dashboard = loaded();
    dashboard.toggle_behavior(Activity::Running);

    let frame = butterfly(&dashboard);
    assert_eq!(frame.records, 3);
    let rows: Vec<String> = frame
        .bars
        .iter()
        .map(|bar| {
            format!(
                "{:<14}{} {} {:?}",
                bar.activity.as_str(),
                bar.am,
                bar.pm,
                bar.emphasis
            )
        })
        .collect();
    insta::assert_snapshot!(rows.join("\n"), @r"
    Running       1 1 Highlighted
    Climbing      0 2 Dimmed
    Chasing       0 0 Dimmed
    Eating        0 0 Dimmed
    Foraging      0 0 Dimmed
    Kuks          0 0 Dimmed
    Quaas         0 0 Dimmed
    Tail flags    0 0 Dimmed
    Tail twitches 0 0 Dimmed
    Approaches    0 0 Dimmed
    Indifferent   0 0 Dimmed
    Runs from     0 0 Dimmed
    ");
    assert_eq!(frame.bars[0].opacity, 0.95);
    assert_eq!(frame.legend[1].opacity, 0.12);
    assert_eq!(frame.highlighted, vec![Activity::Running]);

    let series = &line(&dashboard).series;
    assert_eq!(series[0].emphasis, Emphasis::Highlighted);
    assert_eq!(series[1].line_opacity, 0.1);

    assert_eq!(shown_ids(map(&dashboard)), vec!["R1", "R3"]);
}

#[test]
fn subsetting_filters_apply_everywhere() {
    let mut dashboard = loaded();
    dashboard.toggle_age(AgeGroup::Adult);
    dashboard.toggle_color(FurColor::Black);
    assert!(dashboard.frame(ViewKind::Butterfly).is_empty());
    assert!(dashboard.frame(ViewKind::LineChart).is_empty());
    assert!(dashboard.frame(ViewKind::Map).is_empty());

    dashboard.clear_filters();
    dashboard.toggle_dogs();
    assert_eq!(butterfly(&dashboard).records, 1);
    assert_eq!(shown_ids(map(&dashboard)), vec!["R2"]);
}

#[test]
fn brush_restricts_charts_and_emphasizes_map() {
    let mut dashboard = loaded();
    assert_eq!(dashboard.brush(Rect::new(0.0, 0.0, 3.0, 3.0)), 2);

    let frame = butterfly(&dashboard);
    assert_eq!(frame.records, 2);
    assert_eq!(bar(frame, Activity::Running), (1, 0));
    assert_eq!(bar(frame, Activity::Climbing), (0, 1));

    let map = map(&dashboard);
    assert_eq!(map.selected, 2);
    let emphasis: Vec<PointEmphasis> = map.points.iter().map(|p| p.emphasis).collect();
    assert_eq!(
        emphasis,
        vec![
            PointEmphasis::Selected,
            PointEmphasis::Selected,
            PointEmphasis::Dimmed,
            PointEmphasis::Dimmed,
        ]
    );

    assert_eq!(dashboard.brush(Rect::new(50.0, 50.0, 60.0, 60.0)), 0);
    assert_eq!(dashboard.selection().len(), 0);
    assert_eq!(butterfly(&dashboard).records, 3);
}

#[test]
fn brush_only_sees_shown_points() {
    let mut dashboard = loaded();
    dashboard.toggle_behavior(Activity::Climbing);
    assert_eq!(dashboard.brush(Rect::new(0.0, 0.0, 3.0, 3.0)), 1);
    assert!(dashboard.selection().contains(&rid("R2")));
}

#[test]
fn selection_without_matching_records_renders_empty() {
    let mut dashboard = loaded();
    assert_eq!(dashboard.brush(Rect::new(15.0, 15.0, 25.0, 25.0)), 1);
    assert!(dashboard.frame(ViewKind::Butterfly).is_empty());
    assert!(dashboard.frame(ViewKind::LineChart).is_empty());
    assert_eq!(map(&dashboard).selected, 1);

    dashboard.clear_selection();
    assert_eq!(butterfly(&dashboard).records, 3);
}

#[test]
fn fixed_scale_ignores_filters_dynamic_follows_them() {
    let mut dashboard = loaded();
    assert_eq!(butterfly(&dashboard).scale_max, 2);

    dashboard.brush(Rect::new(0.0, 0.0, 3.0, 3.0));
    assert_eq!(butterfly(&dashboard).scale_max, 2);

    dashboard.set_scale_mode(ScaleMode::Dynamic);
    assert_eq!(butterfly(&dashboard).scale_max, 1);
    assert_eq!(dashboard.status().scale_mode, ScaleMode::Dynamic);
}

#[test]
fn line_chart_domains_and_zoom() {
    let mut dashboard = loaded();
    let frame = line(&dashboard);
    assert_eq!(frame.global_x_domain, (60.0, 71.0));
    assert_eq!(frame.y_domain, (0.0, 1.0));
    assert!(!frame.zoomed);

    assert!(dashboard.zoom(65.0, 59.0));
    let frame = line(&dashboard);
    assert_eq!(frame.x_domain, (59.0, 65.0));
    let running: Vec<(i64, u32)> = frame.series[Activity::Running.index()]
        .points
        .iter()
        .map(|p| (p.temperature, p.count))
        .collect();
    assert_eq!(running, vec![(60, 1), (61, 0)]);

    dashboard.toggle_age(AgeGroup::Juvenile);
    assert_eq!(line(&dashboard).y_domain, (0.0, 1.0));
    assert!(line(&dashboard).zoomed);

    dashboard.reset_zoom();
    assert_eq!(line(&dashboard).x_domain, (60.0, 71.0));
}

#[test]
fn every_interaction_renders_synchronously() {
    let mut dashboard = loaded();
    let before = dashboard.status().render_passes;
    dashboard.legend_click(Activity::Kuks);
    dashboard.legend_click(Activity::Kuks);
    assert_eq!(dashboard.status().render_passes, before + 2);
    assert!(dashboard.filters().is_empty());
}

#[test]
fn replays_a_script() {
    let mut dashboard = loaded();
    let script = "\
# narrow to adults, then brush the lower-left corner
age adult
brush 0 0 3 3
scale dynamic
";
    let actions = parse_script(script).expect("valid script");
    assert_eq!(actions[0], Action::ToggleAge(AgeGroup::Adult));
    for action in &actions {
        dashboard.apply(action);
    }

    let status = dashboard.status();
    assert_eq!(status.selected, 1);
    assert_eq!(status.scale_mode, ScaleMode::Dynamic);
    assert_eq!(butterfly(&dashboard).records, 1);

    let json = serde_json::to_value(dashboard.frames()).expect("frames serialize");
    assert_eq!(json["butterfly"]["status"], "butterfly");
    assert_eq!(json["map"]["selected"], 1);
}
