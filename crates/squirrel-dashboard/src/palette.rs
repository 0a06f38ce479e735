//! Fixed colors shared by the chart legends and the map.

use squirrel_model::{Activity, FurColor};

/// Category10 followed by two light variants, indexed by [`Activity::index`].
const ACTIVITY_COLORS: [&str; 12] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#aec7e8", "#ffbb78",
];

pub fn activity_color(activity: Activity) -> &'static str {
    ACTIVITY_COLORS[activity.index()]
}

pub fn fur_color(color: FurColor) -> &'static str {
    match color {
        FurColor::Gray => "#8c8c8c",
        FurColor::Cinnamon => "#d2691e",
        FurColor::Black => "#1a1a1a",
        FurColor::Unknown => "#c7c7c7",
    }
}
