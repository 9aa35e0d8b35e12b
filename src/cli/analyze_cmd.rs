use anyhow::Result;
use std::path::PathBuf;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::analysis::classifier::AlertRule;
use crate::core::analysis::dispatcher::AnalysisMode;
use crate::core::analysis::merger::merge;
use crate::core::analysis::runner::{analyze_subscriptions, RunOptions};
use crate::core::analysis::timeframe::resolve_window;
use crate::core::auth::get_access_token;
use crate::core::billing::client::BillingClient;
use crate::core::billing::counter::RequestCounter;
use crate::core::config::AppConfig;
use crate::core::export::save_report;
use crate::core::models::report::{CombinedReport, SubscriptionReport};
use crate::core::subscriptions::{find_common_prefix, list_subscriptions};

#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub subscription_prefix: String,
    pub mode: AnalysisMode,
    pub alert_only: bool,
    pub save: bool,
    pub date: Option<String>,
    pub output_dir: Option<PathBuf>,
}

pub async fn run(args: AnalyzeArgs, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let window = resolve_window(args.date.as_deref(), config.analysis.period_days)?;
    tracing::info!(
        mode = args.mode.group_label(),
        from = %window.start_date,
        to = %window.end_date,
        "Resolved analysis window"
    );

    let mut counter = RequestCounter::new();
    let access_token = get_access_token(&mut counter).await?;
    let subscriptions = list_subscriptions(&args.subscription_prefix, &mut counter).await?;
    let names: Vec<&str> = subscriptions.iter().map(|s| s.name.as_str()).collect();
    let common_prefix = find_common_prefix(&names);

    let mut client = BillingClient::new(&config.billing, access_token, counter)?;
    let run_opts = RunOptions {
        mode: args.mode.clone(),
        window,
        rule: AlertRule::new(config.analysis.alert_margin),
        subscription_pause: config.billing.subscription_pause(),
    };
    let reports = analyze_subscriptions(&mut client, &subscriptions, &run_opts).await?;
    tracing::info!(
        subscriptions = reports.len(),
        requests = client.counter().count(),
        "Analysis complete"
    );

    let combined = merge(
        &reports,
        args.mode.group_label(),
        &window,
        &common_prefix,
        args.alert_only,
    );
    print_report(&reports, &combined, &args, opts)?;

    if args.save {
        persist(&combined, &args, config, &common_prefix);
    }
    Ok(())
}

fn print_report(
    reports: &[SubscriptionReport],
    combined: &CombinedReport,
    args: &AnalyzeArgs,
    opts: &OutputOptions,
) -> Result<()> {
    match opts.format {
        OutputFormat::Text => {
            let sections: Vec<String> = reports
                .iter()
                .map(|report| {
                    renderer::render_subscription(
                        report,
                        args.mode.group_label(),
                        args.alert_only,
                        opts.use_color,
                    )
                })
                .collect();
            println!("{}", sections.join("\n\n"));
        }
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(combined)?
            } else {
                serde_json::to_string(combined)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}

/// Save the workbook; a failure here is logged but does not fail the run.
fn persist(combined: &CombinedReport, args: &AnalyzeArgs, config: &AppConfig, common_prefix: &str) {
    if combined.is_empty() {
        tracing::info!("No rows to save");
        return;
    }
    let directory = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.directory.clone());
    let grouping_key = args.mode.group_label();
    match save_report(combined, &directory, common_prefix, grouping_key) {
        Ok(path) => tracing::info!("Results saved to {}", path.display()),
        Err(e) => tracing::error!("{}", e),
    }
}
