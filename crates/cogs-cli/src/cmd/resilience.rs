//! `cogs failure`, `cogs collapse`, `cogs cascade`: disruption scenarios.

use std::io::Write;

use clap::Args;
use cogs_core::ErrorCode;
use cogs_graph::metrics::top_critical_parts;
use cogs_graph::resilience::{CascadeTrace, part_failure, simulate_cascade, supplier_collapse};
use serde::Serialize;

use super::Inputs;
use crate::output::{CliError, OutputMode, percent, pretty_kv, pretty_section, render_mode, text_kv};

/// Arguments for `cogs failure`.
#[derive(Args, Debug)]
pub struct FailureArgs {
    /// Part whose supply stops.
    pub part: String,
}

/// Arguments for `cogs collapse`.
#[derive(Args, Debug)]
pub struct CollapseArgs {
    /// Parts removed at the same time.
    #[arg(required = true)]
    pub parts: Vec<String>,
}

/// Arguments for `cogs cascade`.
#[derive(Args, Debug, Default)]
pub struct CascadeArgs {
    /// Fail the N most critical parts (defaults to `cascade_depth`).
    #[arg(long, conflicts_with = "parts")]
    pub depth: Option<usize>,

    /// Fail these parts in order instead of the most critical ones.
    pub parts: Vec<String>,
}

// ---------------------------------------------------------------------------
// failure
// ---------------------------------------------------------------------------

/// Execute `cogs failure`.
pub fn run_failure(args: &FailureArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let bipartite = inputs.bipartite()?;
    let Some(failure) = part_failure(&bipartite, &args.part) else {
        return Err(
            CliError::coded(ErrorCode::PartNotFound, format!("unknown part '{}'", args.part)).into(),
        );
    };

    render_mode(
        output,
        &failure,
        |f, w| {
            writeln!(w, "part\tvehicle")?;
            for vehicle in &f.affected {
                writeln!(w, "{}\t{vehicle}", f.part)?;
            }
            Ok(())
        },
        |f, w| {
            pretty_section(w, &format!("Failure of {}", f.part))?;
            pretty_kv(w, "Vehicles stopped", f.affected.len().to_string())?;
            pretty_kv(w, "Severity", percent(Some(f.severity)))?;
            for vehicle in &f.affected {
                writeln!(w, "  - {vehicle}")?;
            }
            Ok(())
        },
    )
}

// ---------------------------------------------------------------------------
// collapse
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CollapseOutput {
    removed: Vec<String>,
    ignored: Vec<String>,
    vehicles_remaining: usize,
    component_count: usize,
    giant_component: usize,
    components: Vec<Vec<String>>,
}

/// Execute `cogs collapse`.
pub fn run_collapse(args: &CollapseArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let bipartite = inputs.bipartite()?;
    let impact = supplier_collapse(&bipartite, &args.parts);

    let ignored = args
        .parts
        .iter()
        .filter(|p| !impact.removed.contains(*p))
        .cloned()
        .collect();
    let payload = CollapseOutput {
        vehicles_remaining: impact.projection.vehicle_count(),
        components: impact.projection.components(),
        removed: impact.removed,
        ignored,
        component_count: impact.component_count,
        giant_component: impact.giant_component,
    };

    render_mode(
        output,
        &payload,
        |c, w| {
            for part in &c.removed {
                text_kv(w, "removed", part)?;
            }
            for part in &c.ignored {
                text_kv(w, "ignored", part)?;
            }
            text_kv(w, "vehicles_remaining", c.vehicles_remaining)?;
            text_kv(w, "component_count", c.component_count)?;
            text_kv(w, "giant_component", c.giant_component)
        },
        |c, w| {
            pretty_section(w, "Supplier collapse")?;
            pretty_kv(w, "Parts removed", c.removed.join(", "))?;
            if !c.ignored.is_empty() {
                pretty_kv(w, "Unknown parts", c.ignored.join(", "))?;
            }
            pretty_kv(w, "Vehicles linked", c.vehicles_remaining.to_string())?;
            pretty_kv(w, "Components", c.component_count.to_string())?;
            pretty_kv(w, "Giant component", c.giant_component.to_string())
        },
    )
}

// ---------------------------------------------------------------------------
// cascade
// ---------------------------------------------------------------------------

/// Execute `cogs cascade`.
pub fn run_cascade(args: &CascadeArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let config = inputs.config_with(|c| {
        if let Some(depth) = args.depth {
            c.cascade_depth = depth;
        }
    })?;
    let bipartite = inputs.bipartite()?;

    let parts = if args.parts.is_empty() {
        top_critical_parts(&bipartite, config.cascade_depth)
    } else {
        args.parts.clone()
    };
    let trace = simulate_cascade(&bipartite, &parts);

    render_mode(
        output,
        &trace,
        |t, w| write_cascade_text(w, t),
        |t, w| write_cascade(w, t),
    )
}

/// The part whose failure produced step `i`; `None` for the baseline.
fn failed_at(trace: &CascadeTrace, i: usize) -> Option<&str> {
    i.checked_sub(1)
        .and_then(|j| trace.failed.get(j))
        .map(String::as_str)
}

/// One tab-separated row per cascade step. The baseline row has an empty part.
fn write_cascade_text(w: &mut dyn Write, trace: &CascadeTrace) -> std::io::Result<()> {
    writeln!(w, "parts_failed\tvehicles_remaining\tgiant_component\tpart")?;
    for (i, step) in trace.steps.iter().enumerate() {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            step.parts_failed,
            step.vehicles_remaining,
            step.giant_component,
            failed_at(trace, i).unwrap_or_default()
        )?;
    }
    Ok(())
}

/// Pretty block for a cascade run.
pub fn write_cascade(w: &mut dyn Write, trace: &CascadeTrace) -> std::io::Result<()> {
    pretty_section(w, "Cascade")?;
    writeln!(w, "{:>5}  {:>9}  {:>5}  PART", "STEP", "VEHICLES", "GIANT")?;
    for (i, step) in trace.steps.iter().enumerate() {
        let part = failed_at(trace, i).unwrap_or("(baseline)");
        writeln!(
            w,
            "{:>5}  {:>9}  {:>5}  {part}",
            step.parts_failed, step.vehicles_remaining, step.giant_component
        )?;
    }
    if !trace.skipped.is_empty() {
        pretty_kv(w, "Skipped", trace.skipped.join(", "))?;
    }
    pretty_kv(w, "Giant loss", percent(trace.giant_component_loss()))
}
