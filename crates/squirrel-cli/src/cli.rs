//! CLI argument definitions for the squirrel census dashboard.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use squirrel_dashboard::{Rect, ScaleMode};
use squirrel_model::{Activity, AgeGroup, FurColor};

#[derive(Parser)]
#[command(
    name = "squirrel-dash",
    version,
    about = "Explore the Central Park squirrel census from the terminal",
    long_about = "Load the census sightings and the GeoJSON layer, apply the dashboard's\n\
                  filters, brush and zoom interactions, and print every view."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the data, apply the given interactions, and print every view.
    Inspect(InspectArgs),

    /// Replay an interaction script against the dashboard.
    Replay(ReplayArgs),

    /// List the twelve activities with their palette colors.
    Activities,
}

/// Inputs and output settings shared by every data command.
#[derive(Args)]
pub struct SessionArgs {
    /// Sightings dataset (JSON array, or `;`-separated CSV).
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Sightings GeoJSON layer for the map view.
    #[arg(long = "geojson", value_name = "PATH")]
    pub geojson: Option<PathBuf>,

    /// Dashboard settings file (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Require an activity (repeatable; all must be observed).
    #[arg(long = "behavior", value_name = "ACTIVITY")]
    pub behaviors: Vec<Activity>,

    /// Accept an age group (repeatable).
    #[arg(long = "age", value_name = "AGE")]
    pub ages: Vec<AgeGroup>,

    /// Accept a fur color (repeatable).
    #[arg(long = "fur-color", value_name = "COLOR")]
    pub colors: Vec<FurColor>,

    /// Only sightings in hectares where dogs were seen.
    #[arg(long = "dogs")]
    pub dogs: bool,

    /// Brush the map in screen coordinates.
    #[arg(long = "brush", value_name = "X0,Y0,X1,Y1", value_parser = parse_rect)]
    pub brush: Option<Rect>,

    /// Zoom the line chart to a temperature range.
    #[arg(long = "zoom", value_name = "LO,HI", value_parser = parse_range)]
    pub zoom: Option<(f64, f64)>,

    /// Butterfly chart scale (overrides the config file).
    #[arg(long = "scale", value_enum)]
    pub scale: Option<ScaleArg>,
}

#[derive(Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Script with one action per line.
    #[arg(long = "script", value_name = "PATH")]
    pub script: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScaleArg {
    Fixed,
    Dynamic,
}

impl From<ScaleArg> for ScaleMode {
    fn from(value: ScaleArg) -> Self {
        match value {
            ScaleArg::Fixed => ScaleMode::Fixed,
            ScaleArg::Dynamic => ScaleMode::Dynamic,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_numbers<const N: usize>(raw: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got {}", parts.len()));
    }
    let mut values = [0.0; N];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| format!("'{part}' is not a finite number"))?;
    }
    Ok(values)
}

fn parse_rect(raw: &str) -> Result<Rect, String> {
    let [x0, y0, x1, y1] = parse_numbers::<4>(raw)?;
    Ok(Rect::new(x0, y0, x1, y1))
}

fn parse_range(raw: &str) -> Result<(f64, f64), String> {
    let [lo, hi] = parse_numbers::<2>(raw)?;
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fur_color_filter_and_output_color_coexist() {
        let cli = Cli::try_parse_from([
            "squirrel-dash",
            "inspect",
            "records.json",
            "--fur-color",
            "Black",
            "--color",
            "never",
        ])
        .expect("valid arguments");
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.colors, vec![FurColor::Black]);
    }

    #[test]
    fn parses_brush_and_zoom_lists() {
        assert_eq!(
            parse_rect("10, 20,0,5"),
            Ok(Rect::new(0.0, 5.0, 10.0, 20.0))
        );
        assert_eq!(parse_range("50,70"), Ok((50.0, 70.0)));
        assert!(parse_range("50").is_err());
        assert!(parse_range("50,inf").is_err());
    }

    #[test]
    fn inspect_accepts_repeated_filters() {
        let cli = Cli::try_parse_from([
            "squirrel-dash",
            "inspect",
            "records.json",
            "--behavior",
            "Tail flags",
            "--behavior",
            "Running",
            "--age",
            "Adult",
            "--dogs",
            "--zoom",
            "55,65",
        ])
        .expect("valid arguments");
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(
            args.behaviors,
            vec![Activity::TailFlags, Activity::Running]
        );
        assert_eq!(args.ages, vec![AgeGroup::Adult]);
        assert!(args.dogs);
        assert_eq!(args.zoom, Some((55.0, 65.0)));
    }

    #[test]
    fn replay_requires_a_script() {
        assert!(Cli::try_parse_from(["squirrel-dash", "replay", "records.json"]).is_err());
    }
}
