//! Terminal and JSON rendering of dashboard frames.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use squirrel_core::Emphasis;
use squirrel_dashboard::{
    ButterflyFrame, DashboardStatus, Frames, LineFrame, MapFrame, PointEmphasis, ViewFrame,
    ViewKind,
};
use squirrel_dashboard::palette::{activity_color, fur_color};
use squirrel_model::{Activity, FurColor};

use crate::session::{LoadSummary, ReplayStep, SourceOutcome};

/// Everything `inspect` reports.
#[derive(Debug, Serialize)]
pub struct InspectReport<'a> {
    pub load: &'a LoadSummary,
    pub status: DashboardStatus,
    pub frames: &'a Frames,
}

/// Everything `replay` reports.
#[derive(Debug, Serialize)]
pub struct ReplayReport<'a> {
    pub load: &'a LoadSummary,
    pub steps: &'a [ReplayStep],
    pub frames: &'a Frames,
}

pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Print load results, the status overview, and every rendered frame.
pub fn print_dashboard(load: &LoadSummary, status: &DashboardStatus, frames: &Frames) {
    println!("{}", load_table(load));
    println!("Filters: {}", status.filters);
    if status.selected > 0 {
        println!("Selection: {} sighting(s)", status.selected);
    }
    println!("{}", status_table(frames));
    if let Some(frame) = frames.butterfly.as_butterfly() {
        println!("{}", butterfly_table(frame));
    }
    if let Some(frame) = frames.line_chart.as_line() {
        println!("{}", line_table(frame));
    }
    if let Some(frame) = frames.map.as_map() {
        println!("{}", map_table(frame));
    }
}

pub fn load_table(load: &LoadSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Loaded"),
        header_cell("Skipped"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (name, outcome) in [("records", &load.records), ("features", &load.features)] {
        let row = match outcome {
            SourceOutcome::Loaded { items, skipped } => vec![
                Cell::new(name),
                Cell::new(items),
                count_cell(*skipped, Color::Yellow),
                dim_cell("-"),
            ],
            SourceOutcome::Failed { error } => vec![
                Cell::new(name),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(error).fg(Color::Red),
            ],
            SourceOutcome::NotRequested => vec![
                Cell::new(name),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("not requested"),
            ],
        };
        table.add_row(row);
    }
    table
}

pub fn status_table(frames: &Frames) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("View"),
        header_cell("Status"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    for kind in ViewKind::ALL {
        let frame = frames.get(kind);
        let status = match frame {
            ViewFrame::Pending => dim_cell(frame.status()),
            ViewFrame::Empty { .. } => Cell::new(frame.status()).fg(Color::Yellow),
            _ => Cell::new(frame.status()).fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(kind.as_str()),
            status,
            Cell::new(frame_detail(frame)),
        ]);
    }
    table
}

/// One-line description of a frame.
pub fn frame_detail(frame: &ViewFrame) -> String {
    match frame {
        ViewFrame::Pending => "waiting for data".to_string(),
        ViewFrame::Empty { reason } => reason.clone(),
        ViewFrame::Butterfly(frame) => format!(
            "{} records, {} scale up to {}",
            frame.records, frame.scale_mode, frame.scale_max
        ),
        ViewFrame::Line(frame) => format!(
            "{} records, {}..{} F{}",
            frame.records,
            frame.x_domain.0,
            frame.x_domain.1,
            if frame.zoomed { " (zoomed)" } else { "" }
        ),
        ViewFrame::Map(frame) => format!(
            "{} of {} shown, {} selected",
            frame.shown, frame.total, frame.selected
        ),
    }
}

pub fn butterfly_table(frame: &ButterflyFrame) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Activity"),
        header_cell("AM"),
        header_cell("PM"),
        header_cell("Emphasis"),
        header_cell("Opacity"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let (mut am, mut pm) = (0u64, 0u64);
    for bar in &frame.bars {
        am += u64::from(bar.am);
        pm += u64::from(bar.pm);
        table.add_row(vec![
            activity_cell(bar.activity),
            Cell::new(bar.am),
            Cell::new(bar.pm),
            emphasis_cell(bar.emphasis),
            Cell::new(format!("{:.2}", bar.opacity)),
        ]);
    }
    table.add_row(vec![
        total_cell(),
        Cell::new(am).add_attribute(Attribute::Bold),
        Cell::new(pm).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table
}

pub fn line_table(frame: &LineFrame) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Activity"),
        header_cell("Points"),
        header_cell("Sightings"),
        header_cell("Peak"),
        header_cell("Emphasis"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for series in &frame.series {
        let total: u64 = series.points.iter().map(|point| u64::from(point.count)).sum();
        let peak = series
            .points
            .iter()
            .filter(|point| point.count > 0)
            .max_by_key(|point| point.count)
            .map_or_else(
                || dim_cell("-"),
                |point| Cell::new(format!("{} @ {} F", point.count, point.temperature)),
            );
        table.add_row(vec![
            activity_cell(series.activity),
            Cell::new(series.points.len()),
            Cell::new(total),
            peak,
            emphasis_cell(series.emphasis),
        ]);
    }
    table
}

pub fn map_table(frame: &MapFrame) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Fur color"),
        header_cell("Shown"),
        header_cell("Selected"),
        header_cell("Dimmed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for color in FurColor::ALL {
        let points: Vec<_> = frame
            .points
            .iter()
            .filter(|point| point.fur_color == color)
            .collect();
        let with = |emphasis: PointEmphasis| {
            points
                .iter()
                .filter(|point| point.emphasis == emphasis)
                .count()
        };
        table.add_row(vec![
            swatch_cell(color.as_str(), fur_color(color)),
            Cell::new(points.len()),
            count_cell(with(PointEmphasis::Selected), Color::Green),
            count_cell(with(PointEmphasis::Dimmed), Color::DarkGrey),
        ]);
    }
    table.add_row(vec![
        total_cell(),
        Cell::new(frame.shown).add_attribute(Attribute::Bold),
        Cell::new(frame.selected).add_attribute(Attribute::Bold),
        dim_cell(format!("of {}", frame.total)),
    ]);
    table
}

pub fn activities_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Activity"),
        header_cell("Color"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for activity in Activity::ALL {
        table.add_row(vec![
            Cell::new(activity.index() + 1),
            activity_cell(activity),
            Cell::new(activity_color(activity)),
        ]);
    }
    table
}

pub fn replay_table(steps: &[ReplayStep]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Action"),
        header_cell("Filters"),
        header_cell("Selected"),
        header_cell("Renders"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for step in steps {
        table.add_row(vec![
            Cell::new(step.step),
            Cell::new(&step.action),
            Cell::new(step.status.filters.to_string()),
            Cell::new(step.status.selected),
            Cell::new(step.status.render_passes),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn total_cell() -> Cell {
    Cell::new("TOTAL")
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn activity_cell(activity: Activity) -> Cell {
    swatch_cell(activity.as_str(), activity_color(activity))
}

fn swatch_cell(label: &str, hex: &str) -> Cell {
    let cell = Cell::new(label);
    match hex_color(hex) {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

fn emphasis_cell(emphasis: Emphasis) -> Cell {
    match emphasis {
        Emphasis::Highlighted => Cell::new("highlighted").add_attribute(Attribute::Bold),
        Emphasis::Neutral => Cell::new("neutral"),
        Emphasis::Dimmed => dim_cell("dimmed"),
    }
}

/// `#rrggbb` to a terminal color.
fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_palette_hex() {
        assert_eq!(
            hex_color("#1f77b4"),
            Some(Color::Rgb {
                r: 0x1f,
                g: 0x77,
                b: 0xb4
            })
        );
        assert_eq!(hex_color("1f77b4"), None);
        assert_eq!(hex_color("#1f77"), None);
        assert_eq!(hex_color("#zz77b4"), None);
    }

    #[test]
    fn details_describe_pending_and_empty_frames() {
        assert_eq!(frame_detail(&ViewFrame::Pending), "waiting for data");
        assert_eq!(
            frame_detail(&ViewFrame::empty("no sightings match")),
            "no sightings match"
        );
    }
}
