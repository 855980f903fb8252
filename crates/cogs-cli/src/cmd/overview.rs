//! `cogs summary`, `cogs degrees`, `cogs hubs`: size and ranking views.

use std::io::Write;

use clap::Args;
use cogs_graph::metrics::{GraphSummary, part_criticality, unused_parts, vehicle_degrees};
use serde::Serialize;

use super::Inputs;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, text_kv};

/// Arguments for `cogs summary`.
#[derive(Args, Debug, Default)]
pub struct SummaryArgs {}

/// Arguments for `cogs degrees`.
#[derive(Args, Debug, Default)]
pub struct DegreesArgs {
    /// Show only the N best-connected vehicles.
    #[arg(long)]
    pub top: Option<usize>,
}

/// Arguments for `cogs hubs`.
#[derive(Args, Debug)]
pub struct HubsArgs {
    /// Number of parts to show.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Show every part, including unused ones.
    #[arg(long, conflicts_with = "top")]
    pub all: bool,
}

#[derive(Debug, Serialize)]
struct SummaryOutput {
    content_hash: String,
    vehicles: usize,
    parts: usize,
    usages: usize,
    bipartite: GraphSummary,
    projection: GraphSummary,
    total_weight: usize,
    unused_parts: Vec<String>,
}

/// Execute `cogs summary`.
pub fn run_summary(_args: &SummaryArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let (bipartite, projection) = inputs.graphs()?;

    let payload = SummaryOutput {
        content_hash: bipartite.content_hash.clone(),
        vehicles: bipartite.vehicle_count(),
        parts: bipartite.part_count(),
        usages: bipartite.edge_count(),
        bipartite: GraphSummary::of_bipartite(&bipartite),
        projection: GraphSummary::of_projection(&projection),
        total_weight: projection.total_weight(),
        unused_parts: unused_parts(&bipartite),
    };

    render_mode(
        output,
        &payload,
        |s, w| {
            text_kv(w, "content_hash", &s.content_hash)?;
            text_kv(w, "vehicles", s.vehicles)?;
            text_kv(w, "parts", s.parts)?;
            text_kv(w, "usages", s.usages)?;
            text_kv(w, "unused_parts", s.unused_parts.len())?;
            write_summary_text(w, "bipartite", &s.bipartite)?;
            write_summary_text(w, "projection", &s.projection)?;
            text_kv(w, "projection.total_weight", s.total_weight)
        },
        |s, w| {
            pretty_section(w, "Catalog")?;
            pretty_kv(w, "Vehicles", s.vehicles.to_string())?;
            pretty_kv(w, "Parts", s.parts.to_string())?;
            pretty_kv(w, "Usages", s.usages.to_string())?;
            pretty_kv(w, "Unused parts", s.unused_parts.len().to_string())?;
            pretty_kv(w, "Content hash", &s.content_hash)?;
            writeln!(w)?;
            write_summary(w, "Bipartite graph", &s.bipartite)?;
            writeln!(w)?;
            write_summary(w, "Vehicle projection", &s.projection)?;
            pretty_kv(w, "Total weight", s.total_weight.to_string())
        },
    )
}

/// Pretty block for one [`GraphSummary`].
pub fn write_summary(w: &mut dyn Write, heading: &str, s: &GraphSummary) -> std::io::Result<()> {
    pretty_section(w, heading)?;
    pretty_kv(w, "Nodes", s.node_count.to_string())?;
    pretty_kv(w, "Edges", s.edge_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", s.density))?;
    pretty_kv(w, "Connected", if s.connected { "yes" } else { "no" })?;
    pretty_kv(w, "Components", s.component_count.to_string())?;
    pretty_kv(w, "Isolated nodes", s.isolated_node_count.to_string())?;
    if let Some(diameter) = s.diameter {
        pretty_kv(w, "Diameter", diameter.to_string())?;
        pretty_kv(w, "Center size", s.center.len().to_string())?;
    }
    if let Some(apl) = s.average_path_length {
        pretty_kv(w, "Avg path length", format!("{apl:.4}"))?;
    }
    Ok(())
}

/// `key=value` lines for one [`GraphSummary`], keys prefixed with `prefix.`.
pub fn write_summary_text(w: &mut dyn Write, prefix: &str, s: &GraphSummary) -> std::io::Result<()> {
    text_kv(w, &format!("{prefix}.nodes"), s.node_count)?;
    text_kv(w, &format!("{prefix}.edges"), s.edge_count)?;
    text_kv(w, &format!("{prefix}.density"), format!("{:.4}", s.density))?;
    text_kv(w, &format!("{prefix}.connected"), s.connected)?;
    text_kv(w, &format!("{prefix}.components"), s.component_count)?;
    if let Some(diameter) = s.diameter {
        text_kv(w, &format!("{prefix}.diameter"), diameter)?;
    }
    if let Some(apl) = s.average_path_length {
        text_kv(w, &format!("{prefix}.avg_path_length"), format!("{apl:.4}"))?;
    }
    Ok(())
}

/// Execute `cogs degrees`.
pub fn run_degrees(args: &DegreesArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let (_, projection) = inputs.graphs()?;
    let mut degrees = vehicle_degrees(&projection);
    if let Some(top) = args.top {
        degrees.truncate(top);
    }

    render_mode(
        output,
        &degrees,
        |rows, w| {
            writeln!(w, "vehicle\tdegree\tstrength")?;
            for d in rows {
                writeln!(w, "{}\t{}\t{}", d.vehicle, d.degree, d.strength)?;
            }
            Ok(())
        },
        |rows, w| {
            pretty_section(w, "Vehicle connectivity")?;
            let width = rows.iter().map(|d| d.vehicle.len()).max().unwrap_or(7);
            writeln!(w, "{:<width$}  {:>6}  {:>8}", "VEHICLE", "DEGREE", "STRENGTH")?;
            for d in rows {
                writeln!(w, "{:<width$}  {:>6}  {:>8}", d.vehicle, d.degree, d.strength)?;
            }
            Ok(())
        },
    )
}

/// Execute `cogs hubs`.
pub fn run_hubs(args: &HubsArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let bipartite = inputs.bipartite()?;
    let mut ranked = part_criticality(&bipartite);
    if !args.all {
        ranked.truncate(args.top);
    }

    render_mode(
        output,
        &ranked,
        |rows, w| {
            writeln!(w, "part\tvehicles")?;
            for p in rows {
                writeln!(w, "{}\t{}", p.part, p.vehicles)?;
            }
            Ok(())
        },
        |rows, w| {
            pretty_section(w, "Critical parts")?;
            for (rank, p) in rows.iter().enumerate() {
                writeln!(w, "{:>3}. {:<40} {:>3} vehicles", rank + 1, p.part, p.vehicles)?;
            }
            Ok(())
        },
    )
}
