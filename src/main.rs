mod cli;
mod core;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::cli::analyze_cmd::{self, AnalyzeArgs};
use crate::cli::output::{detect_color, OutputFormat, OutputOptions};
use crate::core::analysis::dispatcher::AnalysisMode;
use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "costwatch",
    about = "Analyze daily cloud costs by group, tag or subscription and flag anomalies",
    version
)]
struct Cli {
    /// Prefix of the subscriptions to analyze
    subscription_prefix: String,

    /// Type of analysis
    #[arg(value_parser = ["group", "tag", "subscription"])]
    analysis_type: String,

    /// Grouping key (e.g., ServiceName, Projeto); not needed for subscription analysis
    grouping_key: Option<String>,

    /// Only report groups whose analysis-date cost is anomalous
    #[arg(long)]
    alert: bool,

    /// Save results to an .xlsx workbook
    #[arg(long)]
    save: bool,

    /// Analysis date in YYYY-MM-DD format (default: yesterday, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<String>,

    /// Number of days for the analysis period
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    period: Option<u32>,

    /// Directory the workbook is written to
    #[arg(long, env = "COSTWATCH_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Output format (text|json)
    #[arg(short, long)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,costwatch={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load()
        .with_context(|| format!("Failed to load {}", AppConfig::config_path().display()))?;
    if let Some(period) = cli.period {
        config.analysis.period_days = period;
    }
    config.ensure_valid()?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        let name = cli.format.as_deref().unwrap_or(&config.settings.default_format);
        OutputFormat::from_name(name)
            .with_context(|| format!("Unknown output format '{}' (expected text or json)", name))?
    };
    let output_opts = OutputOptions {
        format,
        pretty: cli.pretty,
        use_color: detect_color(&config.settings.color, !cli.no_color),
    };

    let mode = AnalysisMode::from_args(&cli.analysis_type, cli.grouping_key.as_deref())
        .with_context(|| format!("A grouping key is required for '{}' analysis", cli.analysis_type))?;

    let args = AnalyzeArgs {
        subscription_prefix: cli.subscription_prefix,
        mode,
        alert_only: cli.alert,
        save: cli.save,
        date: cli.date,
        output_dir: cli.output_dir,
    };
    analyze_cmd::run(args, &config, &output_opts).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("An error occurred: {:#}", e);
        std::process::exit(1);
    }
}
