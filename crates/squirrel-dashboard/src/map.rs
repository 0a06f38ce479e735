//! Map view: one point per sighting feature, brushable.
//!
//! The map applies every filter category, including behaviors. The cross-view
//! selection only changes point emphasis here; brushing selects among the
//! points currently shown.

use serde::Serialize;

use squirrel_core::{Selection, apply};
use squirrel_model::{FurColor, GeoPoint, RecordId, SightingFeature};

use crate::config::{OpacityLevels, Viewport};
use crate::palette::fur_color;
use crate::view::{DataSource, RenderContext, View, ViewFrame};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Geographic-to-screen transform supplied by the map surface.
pub trait Projector {
    fn project(&self, point: GeoPoint) -> ScreenPoint;
}

/// Equirectangular projection fitting a bounding box into a viewport.
///
/// North is up: larger latitudes map to smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearProjector {
    min_lon: f64,
    max_lat: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl LinearProjector {
    /// Fit `points` into `viewport` with `padding` pixels on every side,
    /// keeping the aspect ratio. A single point (or none) lands at the center.
    pub fn fit(points: impl IntoIterator<Item = GeoPoint>, viewport: Viewport, padding: f64) -> Self {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for point in points {
            bounds = Some(match bounds {
                None => (point.lon, point.lon, point.lat, point.lat),
                Some((min_lon, max_lon, min_lat, max_lat)) => (
                    min_lon.min(point.lon),
                    max_lon.max(point.lon),
                    min_lat.min(point.lat),
                    max_lat.max(point.lat),
                ),
            });
        }
        let (min_lon, max_lon, min_lat, max_lat) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));
        let span_lon = max_lon - min_lon;
        let span_lat = max_lat - min_lat;
        let inner_w = (viewport.width - 2.0 * padding).max(1.0);
        let inner_h = (viewport.height - 2.0 * padding).max(1.0);

        let scale = match (span_lon > 0.0, span_lat > 0.0) {
            (true, true) => (inner_w / span_lon).min(inner_h / span_lat),
            (true, false) => inner_w / span_lon,
            (false, true) => inner_h / span_lat,
            (false, false) => 1.0,
        };
        Self {
            min_lon,
            max_lat,
            scale,
            offset_x: (viewport.width - span_lon * scale) / 2.0,
            offset_y: (viewport.height - span_lat * scale) / 2.0,
        }
    }
}

impl Projector for LinearProjector {
    fn project(&self, point: GeoPoint) -> ScreenPoint {
        ScreenPoint {
            x: self.offset_x + (point.lon - self.min_lon) * self.scale,
            y: self.offset_y + (self.max_lat - point.lat) * self.scale,
        }
    }
}

/// Screen-space brush rectangle; corners may be given in any order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointEmphasis {
    /// No selection is active.
    Normal,
    Selected,
    /// A selection is active and excludes this point.
    Dimmed,
}

impl PointEmphasis {
    fn of(id: &RecordId, selection: &Selection) -> Self {
        if !selection.is_active() {
            PointEmphasis::Normal
        } else if selection.contains(id) {
            PointEmphasis::Selected
        } else {
            PointEmphasis::Dimmed
        }
    }

    fn opacity(self, levels: &OpacityLevels) -> f64 {
        match self {
            PointEmphasis::Normal => levels.neutral,
            PointEmphasis::Selected => levels.highlighted,
            PointEmphasis::Dimmed => levels.dimmed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: RecordId,
    pub position: GeoPoint,
    pub screen: ScreenPoint,
    pub fur_color: FurColor,
    pub color: &'static str,
    pub emphasis: PointEmphasis,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    /// Features loaded.
    pub total: usize,
    /// Points that survive the filters.
    pub shown: usize,
    /// Shown points that are part of the selection.
    pub selected: usize,
    pub points: Vec<MapPoint>,
}

const PADDING: f64 = 10.0;

#[derive(Default)]
pub struct MapView {
    projector: Option<Box<dyn Projector>>,
    /// Whether `projector` was fitted here (and must be refitted on reset).
    fitted: bool,
    visible: Vec<(RecordId, ScreenPoint)>,
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("has_projector", &self.projector.is_some())
            .field("fitted", &self.fitted)
            .field("visible", &self.visible.len())
            .finish()
    }
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a surface-supplied projector instead of fitting one to the data.
    pub fn with_projector(projector: Box<dyn Projector>) -> Self {
        Self {
            projector: Some(projector),
            fitted: false,
            visible: Vec::new(),
        }
    }

    /// Identifiers of the shown points inside `rect`, in render order.
    pub fn brush_select(&self, rect: Rect) -> Vec<RecordId> {
        self.visible
            .iter()
            .filter(|(_, screen)| rect.contains(*screen))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

impl View for MapView {
    fn name(&self) -> &'static str {
        "map"
    }

    fn source(&self) -> DataSource {
        DataSource::Features
    }

    fn render(&mut self, ctx: &RenderContext<'_>) -> ViewFrame {
        let Some(features) = ctx.features else {
            return ViewFrame::Pending;
        };
        if self.projector.is_none() {
            let fitted = LinearProjector::fit(
                features.iter().map(|feature| feature.position),
                ctx.config.viewport,
                PADDING,
            );
            self.projector = Some(Box::new(fitted));
            self.fitted = true;
        }
        let Some(projector) = self.projector.as_deref() else {
            return ViewFrame::Pending;
        };

        let shown: Vec<&SightingFeature> = apply(features, ctx.filters);
        let levels = &ctx.config.opacity.points;
        let points: Vec<MapPoint> = shown
            .iter()
            .map(|feature| {
                let emphasis = PointEmphasis::of(&feature.id, ctx.selection);
                MapPoint {
                    id: feature.id.clone(),
                    position: feature.position,
                    screen: projector.project(feature.position),
                    fur_color: feature.fur_color,
                    color: fur_color(feature.fur_color),
                    emphasis,
                    opacity: emphasis.opacity(levels),
                }
            })
            .collect();
        self.visible = points.iter().map(|p| (p.id.clone(), p.screen)).collect();

        if points.is_empty() {
            return ViewFrame::empty("no sightings match the current filters");
        }
        let selected = points
            .iter()
            .filter(|p| p.emphasis == PointEmphasis::Selected)
            .count();
        ViewFrame::Map(MapFrame {
            total: features.len(),
            shown: points.len(),
            selected,
            points,
        })
    }

    fn reset(&mut self) {
        if self.fitted {
            self.projector = None;
            self.fitted = false;
        }
        self.visible.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lon: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lon, lat).expect("valid coordinate")
    }

    #[test]
    fn fit_maps_corners_inside_viewport() {
        let viewport = Viewport {
            width: 200.0,
            height: 100.0,
        };
        let projector =
            LinearProjector::fit([point(-74.0, 40.0), point(-73.0, 41.0)], viewport, 0.0);
        let north_west = projector.project(point(-74.0, 41.0));
        let south_east = projector.project(point(-73.0, 40.0));
        assert_eq!(north_west, ScreenPoint { x: 50.0, y: 0.0 });
        assert_eq!(south_east, ScreenPoint { x: 150.0, y: 100.0 });
    }

    #[test]
    fn single_point_is_centered() {
        let projector = LinearProjector::fit([point(-73.9, 40.7)], Viewport::default(), 10.0);
        assert_eq!(
            projector.project(point(-73.9, 40.7)),
            ScreenPoint { x: 400.0, y: 300.0 }
        );
    }

    #[test]
    fn rect_normalizes_corners() {
        let rect = Rect::new(10.0, 20.0, 0.0, 5.0);
        assert!(rect.contains(ScreenPoint { x: 0.0, y: 5.0 }));
        assert!(rect.contains(ScreenPoint { x: 10.0, y: 20.0 }));
        assert!(!rect.contains(ScreenPoint { x: 10.1, y: 10.0 }));
    }

    proptest::proptest! {
        #[test]
        fn rect_containment_ignores_corner_order(
            x0 in -100.0f64..100.0,
            y0 in -100.0f64..100.0,
            x1 in -100.0f64..100.0,
            y1 in -100.0f64..100.0,
            px in -100.0f64..100.0,
            py in -100.0f64..100.0,
        ) {
            let point = ScreenPoint { x: px, y: py };
            proptest::prop_assert_eq!(
                Rect::new(x0, y0, x1, y1).contains(point),
                Rect::new(x1, y1, x0, y0).contains(point)
            );
            let corner = ScreenPoint { x: x0, y: y1 };
            proptest::prop_assert!(Rect::new(x0, y0, x1, y1).contains(corner));
        }
    }
}
