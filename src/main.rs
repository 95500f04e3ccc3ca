//! `bubbles` replay tool: runs a recorded scenario through the canvas engine.
//!
//! A scenario is a JSON document with the viewport, the task list and a
//! timeline of host events. The engine is driven in virtual time, so a
//! replay is deterministic and instant. The host notifications and the
//! final bubble positions are printed as JSON on stdout; logs go to stderr.


use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;

use bubbles::camera::{Point, Size};
use bubbles::config::{CanvasConfig, ConfigError};
use bubbles::driver::HostEvent;
use bubbles::engine::{Action, EngineCore};
use bubbles::sizing::Theme;
use bubbles::task::{Task, TaskStatus};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum ScenarioError {
    #[error("cannot read scenario {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "bubbles", about = "Replay a bubble canvas scenario in virtual time")]
struct Cli {
    /// Scenario JSON file.
    scenario: PathBuf,

    /// Virtual time to keep simulating after the last event.
    #[arg(long, env = "BUBBLES_SETTLE_MS", default_value_t = 1000.0)]
    settle_ms: f64,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    /// Overrides the environment-derived config when present.
    #[serde(default)]
    config: Option<CanvasConfig>,
    viewport: Size,
    #[serde(default)]
    theme: Theme,
    tasks: Vec<Task>,
    #[serde(default)]
    events: Vec<TimedEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedEvent {
    at_ms: f64,
    event: HostEvent,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Notification {
    Selected { at_ms: f64, id: String },
    StatusCycle { at_ms: f64, id: String, next: Option<TaskStatus> },
}

#[derive(Debug, Serialize)]
struct Placed {
    id: String,
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct Report {
    notifications: Vec<Notification>,
    positions: Vec<Placed>,
    pan: Point,
    scale: f64,
    end_ms: f64,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, ScenarioError> {
    let path = cli.scenario.display().to_string();
    let raw = std::fs::read_to_string(&cli.scenario).map_err(|source| ScenarioError::Read { path: path.clone(), source })?;
    let scenario: Scenario = serde_json::from_str(&raw)?;
    let config = match scenario.config {
        Some(config) => config,
        None => CanvasConfig::from_env()?,
    };

    info!(%path, tasks = scenario.tasks.len(), events = scenario.events.len(), "replaying scenario");
    let report = replay(scenario, config, cli.settle_ms)?;
    info!(notifications = report.notifications.len(), end_ms = report.end_ms, "replay finished");

    let out = if cli.pretty { serde_json::to_string_pretty(&report)? } else { serde_json::to_string(&report)? };
    Ok(out)
}

fn replay(scenario: Scenario, config: CanvasConfig, settle_ms: f64) -> Result<Report, ConfigError> {
    let mut core = EngineCore::new(config)?;
    core.set_theme(scenario.theme);
    let mut notifications = Vec::new();

    let actions = core.set_viewport(0.0, scenario.viewport.width, scenario.viewport.height);
    record(&core, 0.0, actions, &mut notifications);
    let actions = core.set_tasks(0.0, scenario.tasks);
    record(&core, 0.0, actions, &mut notifications);

    let mut events = scenario.events;
    events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));

    let mut clock = 0.0_f64;
    for TimedEvent { at_ms, event } in events {
        let at_ms = at_ms.max(clock);
        advance_to(&mut core, at_ms, &mut notifications);
        clock = at_ms;
        match event.deliver(&mut core, at_ms) {
            ControlFlow::Continue(actions) => record(&core, at_ms, actions, &mut notifications),
            ControlFlow::Break(()) => break,
        }
    }

    let end_ms = clock + settle_ms.max(0.0);
    advance_to(&mut core, end_ms, &mut notifications);

    let camera = core.camera();
    Ok(Report {
        notifications,
        positions: core
            .positions()
            .into_iter()
            .map(|(id, p)| Placed { id, x: p.x, y: p.y })
            .collect(),
        pan: camera.pan(),
        scale: camera.scale,
        end_ms,
    })
}

/// Fire every engine deadline up to and including `until`.
fn advance_to(core: &mut EngineCore, until: f64, out: &mut Vec<Notification>) {
    while let Some(deadline) = core.next_deadline()
        && deadline <= until
    {
        let actions = core.advance(deadline);
        record(core, deadline, actions, out);
    }
}

fn record(core: &EngineCore, at_ms: f64, actions: Vec<Action>, out: &mut Vec<Notification>) {
    for action in actions {
        match action {
            Action::Selected(id) => out.push(Notification::Selected { at_ms, id }),
            Action::StatusCycle(id) => {
                let next = core.next_status(&id);
                out.push(Notification::StatusCycle { at_ms, id, next });
            }
            Action::RenderNeeded => {}
        }
    }
}
