use std::time::Duration;

use crate::core::analysis::classifier::AlertRule;
use crate::core::analysis::dispatcher::{analyze_subscription, AnalysisMode};
use crate::core::billing::CostQuery;
use crate::core::error::AnalysisError;
use crate::core::models::report::SubscriptionReport;
use crate::core::models::window::AnalysisWindow;
use crate::core::subscriptions::Subscription;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: AnalysisMode,
    pub window: AnalysisWindow,
    pub rule: AlertRule,
    /// Pause after each subscription, keeping under the API's rate quota
    pub subscription_pause: Duration,
}

/// Analyse subscriptions one at a time, in order.
///
/// The first query error aborts the whole run.
pub async fn analyze_subscriptions<Q: CostQuery>(
    query: &mut Q,
    subscriptions: &[Subscription],
    opts: &RunOptions,
) -> Result<Vec<SubscriptionReport>, AnalysisError> {
    let mut reports = Vec::with_capacity(subscriptions.len());
    for subscription in subscriptions {
        tracing::info!(
            subscription = %subscription.name,
            id = %subscription.id,
            "Analyzing subscription"
        );
        let rows = query
            .query_costs(&subscription.name, &subscription.id, &opts.mode, &opts.window)
            .await?;
        reports.push(analyze_subscription(
            &opts.mode,
            &subscription.name,
            &subscription.id,
            rows.as_deref(),
            &opts.window,
            &opts.rule,
        ));
        tokio::time::sleep(opts.subscription_pause).await;
    }
    Ok(reports)
}
