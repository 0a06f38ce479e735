//! Concurrent loading of both inputs into a dashboard.
//!
//! The records file and the GeoJSON layer are read on scoped worker threads.
//! Results are handed to the dashboard on the calling thread in the order the
//! loads finish, so either one may arrive first.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info_span, warn};

use squirrel_dashboard::{Action, Dashboard, DashboardStatus, DataSource, parse_script};
use squirrel_ingest::{IngestError, LoadReport, load_features, load_records};
use squirrel_model::{Record, SightingFeature};

/// Input files for one session.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub records: PathBuf,
    pub geojson: Option<PathBuf>,
}

/// How one source fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Loaded { items: usize, skipped: usize },
    Failed { error: String },
    NotRequested,
}

impl SourceOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SourceOutcome::Failed { .. })
    }
}

/// Load outcome of both sources plus their arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub records: SourceOutcome,
    pub features: SourceOutcome,
    pub arrival: Vec<&'static str>,
}

impl LoadSummary {
    pub fn has_failures(&self) -> bool {
        self.records.is_failed() || self.features.is_failed()
    }
}

enum Loaded {
    Records(Result<LoadReport<Record>, IngestError>),
    Features(Result<LoadReport<SightingFeature>, IngestError>),
}

/// Load `inputs` concurrently and deliver each result to `dashboard` as it
/// arrives. A failed source is reported to the dashboard and leaves its views
/// pending.
pub fn load_into(dashboard: &mut Dashboard, inputs: &Inputs) -> LoadSummary {
    let span = info_span!("load", records = %inputs.records.display());
    let _guard = span.enter();

    let mut summary = LoadSummary {
        records: SourceOutcome::NotRequested,
        features: SourceOutcome::NotRequested,
        arrival: Vec::new(),
    };

    thread::scope(|scope| {
        let (sender, receiver) = mpsc::channel();

        let records_sender = sender.clone();
        let records_path = inputs.records.as_path();
        scope.spawn(move || {
            // The receiver outlives both workers; a send only fails if the
            // caller panicked.
            let _ = records_sender.send(Loaded::Records(load_records(records_path)));
        });

        if let Some(geojson) = inputs.geojson.as_deref() {
            let features_sender = sender.clone();
            scope.spawn(move || {
                let _ = features_sender.send(Loaded::Features(load_features(geojson)));
            });
        }
        drop(sender);

        for loaded in receiver {
            match loaded {
                Loaded::Records(result) => {
                    summary.arrival.push(DataSource::Records.as_str());
                    summary.records = deliver(dashboard, DataSource::Records, result, |d, items| {
                        d.records_loaded(items)
                    });
                }
                Loaded::Features(result) => {
                    summary.arrival.push(DataSource::Features.as_str());
                    summary.features =
                        deliver(dashboard, DataSource::Features, result, |d, items| {
                            d.features_loaded(items)
                        });
                }
            }
        }
    });

    debug!(arrival = ?summary.arrival, "loads finished");
    summary
}

fn deliver<T>(
    dashboard: &mut Dashboard,
    source: DataSource,
    result: Result<LoadReport<T>, IngestError>,
    accept: impl FnOnce(&mut Dashboard, Vec<T>),
) -> SourceOutcome {
    match result {
        Ok(report) => {
            let outcome = SourceOutcome::Loaded {
                items: report.items.len(),
                skipped: report.skipped.len(),
            };
            if !report.skipped.is_empty() {
                warn!(
                    source = source.as_str(),
                    skipped = report.skipped.len(),
                    "some entries were skipped"
                );
            }
            accept(dashboard, report.items);
            outcome
        }
        Err(error) => {
            dashboard.load_failed(source, &error);
            SourceOutcome::Failed {
                error: error.to_string(),
            }
        }
    }
}

/// Dashboard status after one replayed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayStep {
    pub step: usize,
    pub action: String,
    pub status: DashboardStatus,
}

/// Apply `actions` in order, capturing the status after each one.
pub fn replay(dashboard: &mut Dashboard, actions: &[Action]) -> Vec<ReplayStep> {
    actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            debug!(step = index + 1, %action, "replaying");
            dashboard.apply(action);
            ReplayStep {
                step: index + 1,
                action: action.to_string(),
                status: dashboard.status(),
            }
        })
        .collect()
}

/// Read a script file, naming the path on failure.
pub fn read_script(path: &Path) -> anyhow::Result<Vec<Action>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("parse script {}", path.display()))
}
