//! `cogs report`: every analysis in one run.


use clap::Args;
use cogs_graph::analyze;

use super::Inputs;
use super::economics::ratio_text;
use super::overview::{write_summary, write_summary_text};
use super::resilience::write_cascade;
use crate::output::{OutputMode, percent, pretty_kv, pretty_section, render_mode, text_kv};

/// Arguments for `cogs report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Number of ranked entries shown per table in pretty output.
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

/// Execute `cogs report`.
pub fn run_report(args: &ReportArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let config = inputs.config_with(|_| {})?;
    let report = analyze(&inputs.catalog, &config)?;

    render_mode(
        output,
        &report,
        |r, w| {
            text_kv(w, "content_hash", &r.content_hash)?;
            write_summary_text(w, "projection", &r.projection)?;
            for (rank, p) in r.criticality.iter().take(args.top).enumerate() {
                text_kv(w, &format!("critical_part.{}", rank + 1), &p.part)?;
            }
            text_kv(w, "communities", r.communities.len())?;
            text_kv(w, "k_max", r.k_core.k_max)?;
            text_kv(w, "core_size", r.k_core.max_core.vehicle_count())?;
            match (r.assortativity.coefficient(), r.assortativity.verdict()) {
                (Some(c), Some(verdict)) => {
                    text_kv(w, "assortativity", format!("{c:.4}"))?;
                    text_kv(w, "verdict", verdict.as_str())?;
                }
                _ => text_kv(w, "assortativity", "undefined")?,
            }
            text_kv(w, "backbone_weight", r.backbone.total_weight())?;
            text_kv(w, "bridges", r.cuts.bridges.len())?;
            if let Some(last) = r.cascade.final_step() {
                text_kv(w, "cascade.giant_component", last.giant_component)?;
            }
            text_kv(w, "stock.reduction_factor", ratio_text(r.stock.reduction_factor))?;
            text_kv(w, "demand.suggestions", r.demand.suggestion_count())
        },
        |r, w| {
            write_summary(w, "Vehicle projection", &r.projection)?;

            writeln!(w)?;
            pretty_section(w, "Critical parts")?;
            for p in r.criticality.iter().take(args.top) {
                writeln!(w, "  {:>3}  {}", p.vehicles, p.part)?;
            }

            writeln!(w)?;
            pretty_section(w, "Best-connected vehicles")?;
            for d in r.degrees.iter().take(args.top) {
                writeln!(w, "  {:>3}  {}", d.degree, d.vehicle)?;
            }

            writeln!(w)?;
            pretty_section(w, "Structure")?;
            pretty_kv(w, "Communities", r.communities.len().to_string())?;
            pretty_kv(w, "k_max", r.k_core.k_max.to_string())?;
            pretty_kv(w, "Core size", r.k_core.max_core.vehicle_count().to_string())?;
            let mixing = match (r.assortativity.coefficient(), r.assortativity.verdict()) {
                (Some(c), Some(verdict)) => format!("{c:.4} ({})", verdict.as_str()),
                _ => "undefined".to_string(),
            };
            pretty_kv(w, "Assortativity", mixing)?;
            pretty_kv(w, "Backbone weight", r.backbone.total_weight().to_string())?;
            pretty_kv(w, "Bridges", r.cuts.bridges.len().to_string())?;

            writeln!(w)?;
            write_cascade(w, &r.cascade)?;

            writeln!(w)?;
            pretty_section(w, "Economics")?;
            pretty_kv(w, "Stock reduction", percent(r.stock.reduction_factor))?;
            pretty_kv(w, "Demand gaps", r.demand.suggestion_count().to_string())
        },
    )
}
