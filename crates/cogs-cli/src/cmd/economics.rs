//! `cogs stock`, `cogs demand`: inventory consolidation and demand gaps.

use std::collections::BTreeMap;

use clap::Args;
use cogs_graph::community::detect_communities;
use cogs_graph::demand::predict_demand;
use cogs_graph::metrics::stock_savings;
use serde::Serialize;

use super::Inputs;
use crate::output::{OutputMode, percent, pretty_kv, pretty_section, render_mode, text_kv};

/// Arguments for `cogs stock`.
#[derive(Args, Debug, Default)]
pub struct StockArgs {}

/// Arguments for `cogs demand`.
#[derive(Args, Debug, Default)]
pub struct DemandArgs {
    /// Share of a community that must use a part for it to become standard.
    #[arg(long)]
    pub threshold: Option<f64>,
}

/// Execute `cogs stock`.
pub fn run_stock(_args: &StockArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let bipartite = inputs.bipartite()?;
    let savings = stock_savings(&bipartite);

    render_mode(
        output,
        &savings,
        |s, w| {
            text_kv(w, "total_demand", s.total_demand)?;
            text_kv(w, "unique_inventory", s.unique_inventory)?;
            text_kv(w, "reduction_factor", ratio_text(s.reduction_factor))
        },
        |s, w| {
            pretty_section(w, "Stock consolidation")?;
            pretty_kv(w, "Total demand", s.total_demand.to_string())?;
            pretty_kv(w, "Unique inventory", s.unique_inventory.to_string())?;
            pretty_kv(w, "Reduction", percent(s.reduction_factor))
        },
    )
}

/// A ratio with four decimals, `n/a` when undefined.
pub fn ratio_text(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |r| format!("{r:.4}"))
}

#[derive(Debug, Serialize)]
struct DemandOutput {
    threshold: f64,
    standards: BTreeMap<usize, Vec<String>>,
    suggestions: BTreeMap<String, Vec<String>>,
    suggestion_count: usize,
}

/// Execute `cogs demand`.
pub fn run_demand(args: &DemandArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let config = inputs.config_with(|c| {
        if let Some(threshold) = args.threshold {
            c.demand_threshold = threshold;
        }
    })?;
    let (bipartite, projection) = inputs.graphs()?;
    let partition = detect_communities(&projection);
    let forecast = predict_demand(&bipartite, &partition, config.demand_threshold);

    let payload = DemandOutput {
        threshold: config.demand_threshold,
        suggestion_count: forecast.suggestion_count(),
        standards: forecast.standards,
        suggestions: forecast.suggestions,
    };

    render_mode(
        output,
        &payload,
        |d, w| {
            writeln!(w, "vehicle\tmissing_part")?;
            for (vehicle, parts) in &d.suggestions {
                for part in parts {
                    writeln!(w, "{vehicle}\t{part}")?;
                }
            }
            Ok(())
        },
        |d, w| {
            pretty_section(w, "Demand forecast")?;
            pretty_kv(w, "Threshold", percent(Some(d.threshold)))?;
            pretty_kv(w, "Suggestions", d.suggestion_count.to_string())?;

            writeln!(w, "\nCommunity standards:")?;
            for (index, parts) in &d.standards {
                if parts.is_empty() {
                    writeln!(w, "  [{index}] (none)")?;
                } else {
                    writeln!(w, "  [{index}] {}", parts.join(", "))?;
                }
            }

            writeln!(w, "\nMissing standard parts:")?;
            for (vehicle, parts) in &d.suggestions {
                writeln!(w, "  {vehicle}: {}", parts.join(", "))?;
            }
            Ok(())
        },
    )
}
