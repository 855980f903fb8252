#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::Inputs;
use output::{CliError, OutputMode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cogs: supply-chain graph analytics for vehicle/part catalogs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides `--json` and `COGS_FORMAT`).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Catalog TOML file. Defaults to the built-in reference fleet.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Analysis config TOML file. Defaults to `cogs.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Overview",
        about = "Graph sizes, density and distances",
        after_help = "EXAMPLES:\n    # Summarize the reference fleet\n    cogs summary\n\n    # Summarize your own catalog\n    cogs --catalog fleet.toml summary"
    )]
    Summary(cmd::overview::SummaryArgs),

    #[command(
        next_help_heading = "Overview",
        about = "Vehicles ranked by shared-part links",
        after_help = "EXAMPLES:\n    # Top 5 vehicles\n    cogs degrees --top 5\n\n    # Tab-separated for scripts\n    cogs --format text degrees"
    )]
    Degrees(cmd::overview::DegreesArgs),

    #[command(
        next_help_heading = "Overview",
        about = "Parts ranked by dependent vehicles",
        after_help = "EXAMPLES:\n    # The 10 most critical parts\n    cogs hubs\n\n    # Every part, including unused ones\n    cogs hubs --all --json"
    )]
    Hubs(cmd::overview::HubsArgs),

    #[command(
        next_help_heading = "Structure",
        about = "Platform families by greedy modularity",
        after_help = "EXAMPLES:\n    # All communities\n    cogs communities\n\n    # Only families of 3 or more vehicles\n    cogs communities --min-size 3"
    )]
    Communities(cmd::structure::CommunitiesArgs),

    #[command(
        next_help_heading = "Structure",
        about = "Core numbers and the densest core",
        after_help = "EXAMPLES:\n    cogs kcore --json"
    )]
    Kcore(cmd::structure::KCoreArgs),

    #[command(
        next_help_heading = "Structure",
        about = "Premium/economy part-sharing preference",
        after_help = "EXAMPLES:\n    # Default cutoff from config\n    cogs assortativity\n\n    # Stricter stratification cutoff\n    cogs assortativity --cutoff 0.3"
    )]
    Assortativity(cmd::structure::AssortativityArgs),

    #[command(
        next_help_heading = "Structure",
        about = "Maximum-weight spanning forest",
        after_help = "EXAMPLES:\n    cogs backbone"
    )]
    Backbone(cmd::structure::BackboneArgs),

    #[command(
        next_help_heading = "Structure",
        about = "Bridges and articulation vehicles",
        after_help = "EXAMPLES:\n    cogs cuts --json"
    )]
    Cuts(cmd::structure::CutsArgs),

    #[command(
        next_help_heading = "Resilience",
        about = "Vehicles stopped by one part",
        after_help = "EXAMPLES:\n    cogs failure \"Sistema ABS Bosch\""
    )]
    Failure(cmd::resilience::FailureArgs),

    #[command(
        next_help_heading = "Resilience",
        about = "Remove several parts at once",
        after_help = "EXAMPLES:\n    cogs collapse \"Sistema ABS Bosch\" \"Turbocompressor KKK\""
    )]
    Collapse(cmd::resilience::CollapseArgs),

    #[command(
        next_help_heading = "Resilience",
        about = "Fail parts one after another",
        after_help = "EXAMPLES:\n    # The configured number of most critical parts\n    cogs cascade\n\n    # The 3 most critical parts\n    cogs cascade --depth 3\n\n    # A chosen sequence\n    cogs cascade \"Sistema ABS Bosch\" \"Suspensão Multilink\""
    )]
    Cascade(cmd::resilience::CascadeArgs),

    #[command(
        next_help_heading = "Economics",
        about = "Inventory saved by shared parts",
        after_help = "EXAMPLES:\n    cogs stock"
    )]
    Stock(cmd::economics::StockArgs),

    #[command(
        next_help_heading = "Economics",
        about = "Missing community-standard parts",
        after_help = "EXAMPLES:\n    # Default threshold from config\n    cogs demand\n\n    # Require 90% of a family to use a part\n    cogs demand --threshold 0.9"
    )]
    Demand(cmd::economics::DemandArgs),

    #[command(
        next_help_heading = "Overview",
        about = "Every analysis in one run",
        after_help = "EXAMPLES:\n    # Human-readable overview\n    cogs report\n\n    # Full machine-readable report\n    cogs report --json"
    )]
    Report(cmd::report::ReportArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COGS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cogs=debug,info"
        } else {
            "cogs=info,warn"
        })
    });

    let format = env::var("COGS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let inputs = Inputs::load(cli.catalog.as_deref(), cli.config.as_deref())?;

    match &cli.command {
        Commands::Summary(args) => cmd::overview::run_summary(args, output, &inputs),
        Commands::Degrees(args) => cmd::overview::run_degrees(args, output, &inputs),
        Commands::Hubs(args) => cmd::overview::run_hubs(args, output, &inputs),
        Commands::Communities(args) => cmd::structure::run_communities(args, output, &inputs),
        Commands::Kcore(args) => cmd::structure::run_kcore(args, output, &inputs),
        Commands::Assortativity(args) => cmd::structure::run_assortativity(args, output, &inputs),
        Commands::Backbone(args) => cmd::structure::run_backbone(args, output, &inputs),
        Commands::Cuts(args) => cmd::structure::run_cuts(args, output, &inputs),
        Commands::Failure(args) => cmd::resilience::run_failure(args, output, &inputs),
        Commands::Collapse(args) => cmd::resilience::run_collapse(args, output, &inputs),
        Commands::Cascade(args) => cmd::resilience::run_cascade(args, output, &inputs),
        Commands::Stock(args) => cmd::economics::run_stock(args, output, &inputs),
        Commands::Demand(args) => cmd::economics::run_demand(args, output, &inputs),
        Commands::Report(args) => cmd::report::run_report(args, output, &inputs),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    debug!(?output, command = ?cli.command, "dispatching");

    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if output::render_error(output, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
