//! Replay a scenario tick by tick and report every decision.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use console::style;
use serde_json::{Value, json};

use behavior_tree::Status;
use runtime::{RecordingSink, RotationEngine, RotationSpec, TickReport, load_config};

use crate::scenario::{Scenario, ScriptedProvider};

/// Replay a scenario through its rotation
#[derive(Parser)]
pub struct Run {
    /// Scenario file (RON)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Rotation file overriding the scenario's inline rotation
    #[arg(short, long, value_name = "FILE")]
    rotation: Option<PathBuf>,

    /// Runtime config file overriding the scenario's config
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "list")]
    format: OutputFormat,

    /// Limit number of ticks to replay (0 = unlimited)
    #[arg(short, long, default_value = "0")]
    limit: usize,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Totals only
    Summary,
    /// One line per tick
    List,
    /// Full JSON output
    Json,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let scenario = Scenario::load(&self.scenario)?;

        let rotation = match &self.rotation {
            Some(path) => RotationSpec::load(path)
                .with_context(|| format!("Failed to load rotation: {}", path.display()))?,
            None => scenario.rotation.clone().ok_or_else(|| {
                anyhow!("Scenario has no inline rotation; pass one with --rotation")
            })?,
        };
        let config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => scenario.config.clone(),
        };

        let ticks = match self.limit {
            0 => scenario.ticks.len(),
            n => n.min(scenario.ticks.len()),
        };
        tracing::info!(rotation = %rotation.name, ticks, "replaying scenario");

        let sink = RecordingSink::new();
        let mut provider = ScriptedProvider::new(scenario.ticks, sink.clone());
        let mut engine = RotationEngine::from_config(rotation.build(), Box::new(sink), &config);

        let reports: Vec<TickReport> = (0..ticks)
            .map(|_| engine.tick_from(&mut provider))
            .collect();

        match self.format {
            OutputFormat::Summary => {
                print_header(&self.scenario, &rotation.name, ticks);
                print_summary(&reports);
            }
            OutputFormat::List => {
                print_header(&self.scenario, &rotation.name, ticks);
                print_list(&reports);
                println!();
                print_summary(&reports);
            }
            OutputFormat::Json => print_json(&reports)?,
        }

        Ok(())
    }
}

fn print_header(path: &std::path::Path, rotation: &str, ticks: usize) {
    println!("{} {}", style("Scenario:").bold().cyan(), path.display());
    println!("{} {}", style("Rotation:").bold().cyan(), rotation);
    println!("{} {}", style("Ticks:").bold().cyan(), ticks);
    println!();
}

fn print_list(reports: &[TickReport]) {
    for report in reports {
        let status = match report.status {
            Status::Success => style("success").green(),
            Status::Failure => style("failure").red(),
            Status::Running => style("running").yellow(),
        };
        let decision = match (&report.fault, report.committed) {
            (Some(fault), _) => format!("skipped ({fault})"),
            (None, Some(attempt)) => match attempt.target {
                Some(target) => format!("{} -> {}", attempt.ability, target),
                None => attempt.ability.to_string(),
            },
            (None, None) => "-".to_owned(),
        };
        let rejected = report.attempts.iter().filter(|a| !a.executed).count();

        println!(
            "{:>4} t={:<7.2} {:<8} {:<28} {}",
            style(report.epoch).dim(),
            report.time,
            status,
            decision,
            style(format!(
                "nodes={} cache={}/{} rejected={}",
                report.nodes_visited,
                report.cache.hits,
                report.cache.lookups(),
                rejected
            ))
            .dim()
        );
    }
}

fn print_summary(reports: &[TickReport]) {
    let acted = reports.iter().filter(|r| r.acted()).count();
    let held = reports
        .iter()
        .filter(|r| r.status == Status::Running)
        .count();
    let degraded = reports.iter().filter(|r| r.is_degraded()).count();
    let rejected: usize = reports
        .iter()
        .map(|r| r.attempts.iter().filter(|a| !a.executed).count())
        .sum();

    println!("{}", style("Summary").bold().underlined());
    println!("  {} {}", style("Acted:").bold(), acted);
    println!("  {} {}", style("Held (casting):").bold(), held);
    println!("  {} {}", style("Idle:").bold(), reports.len() - acted - held);
    println!("  {} {}", style("Rejected commits:").bold(), rejected);
    if degraded > 0 {
        println!("  {} {}", style("Degraded ticks:").bold().red(), degraded);
    }
}

fn print_json(reports: &[TickReport]) -> Result<()> {
    let ticks: Vec<Value> = reports.iter().map(report_json).collect();
    println!("{}", serde_json::to_string_pretty(&ticks)?);
    Ok(())
}

fn report_json(report: &TickReport) -> Value {
    let attempts: Vec<Value> = report
        .attempts
        .iter()
        .map(|a| {
            json!({
                "ability": a.ability.0,
                "target": a.target.map(|t| t.0),
                "executed": a.executed,
            })
        })
        .collect();
    let auxiliary: Vec<Value> = report
        .auxiliary
        .iter()
        .map(|set| {
            json!({
                "label": set.label,
                "entities": set.entities.iter().map(|e| e.0).collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "epoch": report.epoch,
        "time": report.time,
        "status": format!("{:?}", report.status),
        "committed": report.committed.map(|a| a.ability.0),
        "attempts": attempts,
        "primary_target": report.primary_target.map(|t| t.0),
        "nodes_visited": report.nodes_visited,
        "cache": { "hits": report.cache.hits, "misses": report.cache.misses },
        "auxiliary": auxiliary,
        "fault": report.fault.as_ref().map(|f| f.to_string()),
    })
}
