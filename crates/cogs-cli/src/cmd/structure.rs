//! `cogs communities`, `cogs kcore`, `cogs assortativity`, `cogs backbone`,
//! `cogs cuts`: structural views of the vehicle projection.

use std::collections::BTreeMap;
use std::io::Write;

use clap::Args;
use cogs_core::{Segment, SegmentClassifier};
use cogs_graph::ProjectedEdge;
use cogs_graph::backbone::maximum_spanning_forest;
use cogs_graph::community::detect_communities;
use cogs_graph::metrics::{
    Assortativity, MixingMatrix, UndefinedReason, cut_structure, k_core_decomposition, segment_assortativity,
};
use serde::Serialize;

use super::Inputs;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, text_kv};

/// Arguments for `cogs communities`.
#[derive(Args, Debug)]
pub struct CommunitiesArgs {
    /// Hide communities smaller than this.
    #[arg(long, default_value_t = 1)]
    pub min_size: usize,
}

/// Arguments for `cogs kcore`.
#[derive(Args, Debug, Default)]
pub struct KCoreArgs {}

/// Arguments for `cogs assortativity`.
#[derive(Args, Debug, Default)]
pub struct AssortativityArgs {
    /// Coefficient above which the market counts as stratified.
    #[arg(long)]
    pub cutoff: Option<f64>,
}

/// Arguments for `cogs backbone`.
#[derive(Args, Debug, Default)]
pub struct BackboneArgs {}

/// Arguments for `cogs cuts`.
#[derive(Args, Debug, Default)]
pub struct CutsArgs {}

// ---------------------------------------------------------------------------
// communities
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CommunityOutput {
    index: usize,
    size: usize,
    members: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CommunitiesOutput {
    total: usize,
    modularity: Option<f64>,
    communities: Vec<CommunityOutput>,
}

/// Execute `cogs communities`.
pub fn run_communities(
    args: &CommunitiesArgs,
    output: OutputMode,
    inputs: &Inputs,
) -> anyhow::Result<()> {
    let (_, projection) = inputs.graphs()?;
    let partition = detect_communities(&projection);

    let payload = CommunitiesOutput {
        total: partition.len(),
        modularity: partition.modularity,
        communities: partition
            .with_min_size(args.min_size)
            .map(|(index, members)| CommunityOutput {
                index,
                size: members.len(),
                members: members.to_vec(),
            })
            .collect(),
    };

    render_mode(
        output,
        &payload,
        |p, w| {
            writeln!(w, "community\tsize\tvehicle")?;
            for c in &p.communities {
                for member in &c.members {
                    writeln!(w, "{}\t{}\t{member}", c.index, c.size)?;
                }
            }
            Ok(())
        },
        |p, w| {
            pretty_section(w, "Platform communities")?;
            pretty_kv(w, "Communities", p.total.to_string())?;
            pretty_kv(
                w,
                "Modularity",
                p.modularity.map_or_else(|| "n/a".to_string(), |q| format!("{q:.4}")),
            )?;
            for c in &p.communities {
                writeln!(w, "\n[{}] {} vehicles", c.index, c.size)?;
                for member in &c.members {
                    writeln!(w, "  - {member}")?;
                }
            }
            Ok(())
        },
    )
}

// ---------------------------------------------------------------------------
// kcore
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct KCoreOutput {
    k_max: usize,
    max_core: Vec<String>,
    shells: BTreeMap<usize, Vec<String>>,
    core_numbers: BTreeMap<String, usize>,
}

/// Execute `cogs kcore`.
pub fn run_kcore(_args: &KCoreArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let (_, projection) = inputs.graphs()?;
    let result = k_core_decomposition(&projection);

    let payload = KCoreOutput {
        k_max: result.k_max,
        max_core: result.max_core.vehicles().map(str::to_string).collect(),
        shells: result.shells,
        core_numbers: result.core_numbers,
    };

    render_mode(
        output,
        &payload,
        |p, w| {
            writeln!(w, "core\tvehicle")?;
            for (k, members) in p.shells.iter().rev() {
                for member in members {
                    writeln!(w, "{k}\t{member}")?;
                }
            }
            Ok(())
        },
        |p, w| {
            pretty_section(w, "Dense core")?;
            pretty_kv(w, "k_max", p.k_max.to_string())?;
            pretty_kv(w, "Core size", p.max_core.len().to_string())?;
            writeln!(w)?;
            for (k, members) in p.shells.iter().rev() {
                writeln!(w, "shell {k:>3}: {}", members.join(", "))?;
            }
            Ok(())
        },
    )
}

// ---------------------------------------------------------------------------
// assortativity
// ---------------------------------------------------------------------------

/// Execute `cogs assortativity`.
pub fn run_assortativity(
    args: &AssortativityArgs,
    output: OutputMode,
    inputs: &Inputs,
) -> anyhow::Result<()> {
    let config = inputs.config_with(|c| {
        if let Some(cutoff) = args.cutoff {
            c.stratification_cutoff = cutoff;
        }
    })?;
    let (_, projection) = inputs.graphs()?;
    let segments = SegmentClassifier::from_config(&config.segments).classify_catalog(&inputs.catalog);
    let result = segment_assortativity(&projection, &segments, config.stratification_cutoff);

    render_mode(
        output,
        &result,
        |r, w| {
            match r {
                Assortativity::Defined {
                    coefficient,
                    verdict,
                    ..
                } => {
                    text_kv(w, "coefficient", format!("{coefficient:.4}"))?;
                    text_kv(w, "verdict", verdict.as_str())?;
                }
                Assortativity::Undefined { reason, .. } => {
                    text_kv(w, "coefficient", "undefined")?;
                    text_kv(w, "reason", describe_reason(reason))?;
                }
            }
            write_mixing_text(w, r.mixing())
        },
        |r, w| {
            pretty_section(w, "Segment assortativity")?;
            match r {
                Assortativity::Defined {
                    coefficient,
                    verdict,
                    ..
                } => {
                    pretty_kv(w, "Coefficient", format!("{coefficient:.4}"))?;
                    pretty_kv(w, "Verdict", verdict.as_str())?;
                }
                Assortativity::Undefined { reason, .. } => {
                    pretty_kv(w, "Coefficient", "undefined")?;
                    pretty_kv(w, "Reason", describe_reason(reason))?;
                }
            }
            let mixing = r.mixing();
            writeln!(w, "\nMixing mass:")?;
            for row in Segment::ALL {
                let cells: Vec<String> = Segment::ALL
                    .iter()
                    .map(|&col| format!("{:>6}", mixing.get(row, col)))
                    .collect();
                writeln!(w, "  {:<8} {}", row.as_str(), cells.join(" "))?;
            }
            Ok(())
        },
    )
}

fn describe_reason(reason: &UndefinedReason) -> String {
    match reason {
        UndefinedReason::NoEdges => "no shared parts".to_string(),
        UndefinedReason::SingleSegment => "all shared parts in one segment".to_string(),
        UndefinedReason::UnlabeledVehicle { vehicle } => format!("no segment for '{vehicle}'"),
    }
}

/// One `mixing.<row>.<col>=<mass>` line per cell.
fn write_mixing_text(w: &mut dyn Write, mixing: &MixingMatrix) -> std::io::Result<()> {
    for row in Segment::ALL {
        for col in Segment::ALL {
            text_kv(
                w,
                &format!("mixing.{}.{}", row.as_str(), col.as_str()),
                mixing.get(row, col),
            )?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// backbone
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct BackboneOutput {
    vehicles: usize,
    edge_count: usize,
    total_weight: usize,
    edges: Vec<ProjectedEdge>,
}

/// Execute `cogs backbone`.
pub fn run_backbone(_args: &BackboneArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let (_, projection) = inputs.graphs()?;
    let forest = maximum_spanning_forest(&projection);

    let payload = BackboneOutput {
        vehicles: forest.vehicle_count(),
        edge_count: forest.edge_count(),
        total_weight: forest.total_weight(),
        edges: forest.edges(),
    };

    render_mode(
        output,
        &payload,
        |p, w| {
            writeln!(w, "weight\tvehicle_a\tvehicle_b")?;
            for e in &p.edges {
                writeln!(w, "{}\t{}\t{}", e.weight, e.a, e.b)?;
            }
            Ok(())
        },
        |p, w| {
            pretty_section(w, "Industry backbone")?;
            pretty_kv(w, "Vehicles", p.vehicles.to_string())?;
            pretty_kv(w, "Links", p.edge_count.to_string())?;
            pretty_kv(w, "Total weight", p.total_weight.to_string())?;
            writeln!(w)?;
            for e in &p.edges {
                writeln!(w, "{:>3}  {} <-> {}", e.weight, e.a, e.b)?;
            }
            Ok(())
        },
    )
}

// ---------------------------------------------------------------------------
// cuts
// ---------------------------------------------------------------------------

/// Execute `cogs cuts`.
pub fn run_cuts(_args: &CutsArgs, output: OutputMode, inputs: &Inputs) -> anyhow::Result<()> {
    let (_, projection) = inputs.graphs()?;
    let cuts = cut_structure(&projection);

    render_mode(
        output,
        &cuts,
        |c, w| {
            writeln!(w, "kind\tvehicle\tpeer")?;
            for (a, b) in &c.bridges {
                writeln!(w, "bridge\t{a}\t{b}")?;
            }
            for vehicle in &c.articulation_points {
                writeln!(w, "articulation\t{vehicle}\t")?;
            }
            Ok(())
        },
        |c, w| {
            pretty_section(w, "Single points of failure")?;
            pretty_kv(w, "Bridges", c.bridges.len().to_string())?;
            for (a, b) in &c.bridges {
                writeln!(w, "  {a} <-> {b}")?;
            }
            pretty_kv(w, "Articulation pts", c.articulation_points.len().to_string())?;
            for vehicle in &c.articulation_points {
                writeln!(w, "  {vehicle}")?;
            }
            Ok(())
        },
    )
}
