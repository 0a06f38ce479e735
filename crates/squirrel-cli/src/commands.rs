use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use squirrel_cli::report::{
    InspectReport, ReplayReport, activities_table, print_dashboard, replay_table, to_json,
};
use squirrel_cli::session::{Inputs, LoadSummary, load_into, read_script, replay};
use squirrel_dashboard::{Dashboard, DashboardConfig, ScaleMode};

use crate::cli::{InspectArgs, OutputFormatArg, ReplayArgs, SessionArgs};

/// Outcome of a data command; failed loads map to a non-zero exit.
pub struct RunOutcome {
    pub has_errors: bool,
}

pub fn run_activities() -> Result<()> {
    println!("{}", activities_table());
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<RunOutcome> {
    let span = info_span!("inspect", records = %args.session.records.display());
    let _guard = span.enter();

    let config = load_config(args.session.config.as_deref(), args.scale.map(ScaleMode::from))?;
    let mut dashboard = Dashboard::new(config);
    let load = load_into(&mut dashboard, &inputs(&args.session));

    for &activity in &args.behaviors {
        dashboard.toggle_behavior(activity);
    }
    for &age in &args.ages {
        dashboard.toggle_age(age);
    }
    for &color in &args.colors {
        dashboard.toggle_color(color);
    }
    if args.dogs {
        dashboard.toggle_dogs();
    }
    if let Some(rect) = args.brush {
        let hits = dashboard.brush(rect);
        info!(hits, "brushed map");
    }
    if let Some((lo, hi)) = args.zoom {
        dashboard.zoom(lo, hi);
    }

    match args.session.format {
        OutputFormatArg::Table => {
            print_dashboard(&load, &dashboard.status(), dashboard.frames());
        }
        OutputFormatArg::Json => {
            let report = InspectReport {
                load: &load,
                status: dashboard.status(),
                frames: dashboard.frames(),
            };
            println!("{}", to_json(&report).context("serialize report")?);
        }
    }
    Ok(outcome(&load))
}

pub fn run_replay(args: &ReplayArgs) -> Result<RunOutcome> {
    let span = info_span!("replay", script = %args.script.display());
    let _guard = span.enter();

    // Parse first so a broken script fails before any loading.
    let actions = read_script(&args.script)?;
    let config = load_config(args.session.config.as_deref(), None)?;
    let mut dashboard = Dashboard::new(config);
    let load = load_into(&mut dashboard, &inputs(&args.session));
    let steps = replay(&mut dashboard, &actions);
    info!(steps = steps.len(), "replay finished");

    match args.session.format {
        OutputFormatArg::Table => {
            println!("{}", replay_table(&steps));
            print_dashboard(&load, &dashboard.status(), dashboard.frames());
        }
        OutputFormatArg::Json => {
            let report = ReplayReport {
                load: &load,
                steps: &steps,
                frames: dashboard.frames(),
            };
            println!("{}", to_json(&report).context("serialize report")?);
        }
    }
    Ok(outcome(&load))
}

/// Settings file (or defaults) with CLI overrides applied.
fn load_config(path: Option<&Path>, scale: Option<ScaleMode>) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(scale) = scale {
        config.scale_mode = scale;
    }
    Ok(config)
}

fn inputs(args: &SessionArgs) -> Inputs {
    Inputs {
        records: args.records.clone(),
        geojson: args.geojson.clone(),
    }
}

fn outcome(load: &LoadSummary) -> RunOutcome {
    RunOutcome {
        has_errors: load.has_failures(),
    }
}
