use serde::Deserialize;
use std::time::Duration;

use crate::core::billing::counter::RequestCounter;
use crate::core::error::AnalysisError;
use crate::core::process::run_command;

const AZ_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subscription {
    pub name: String,
    pub id: String,
}

/// List subscriptions visible to the signed-in `az` account whose name
/// starts with `prefix`.
pub async fn list_subscriptions(
    prefix: &str,
    counter: &mut RequestCounter,
) -> Result<Vec<Subscription>, AnalysisError> {
    let stdout = run_command("az", &["account", "list", "--output", "json"], AZ_TIMEOUT)
        .await
        .map_err(|e| AnalysisError::SubscriptionDiscoveryFailure(format!("{:#}", e)))?;
    counter.record("az account list");
    let subscriptions = parse_subscription_list(&stdout)?;
    filter_by_prefix(subscriptions, prefix)
}

fn parse_subscription_list(json: &str) -> Result<Vec<Subscription>, AnalysisError> {
    serde_json::from_str(json).map_err(|e| {
        AnalysisError::SubscriptionDiscoveryFailure(format!("Failed to parse `az account list` output: {}", e))
    })
}

fn filter_by_prefix(
    subscriptions: Vec<Subscription>,
    prefix: &str,
) -> Result<Vec<Subscription>, AnalysisError> {
    let matching: Vec<Subscription> = subscriptions
        .into_iter()
        .filter(|s| s.name.starts_with(prefix))
        .collect();
    if matching.is_empty() {
        return Err(AnalysisError::SubscriptionDiscoveryFailure(format!(
            "No subscriptions found with prefix '{}'",
            prefix
        )));
    }
    Ok(matching)
}

/// Longest character-wise prefix shared by every name.
pub fn find_common_prefix<S: AsRef<str>>(names: &[S]) -> String {
    let Some(first) = names.first() else {
        return String::new();
    };
    let mut prefix: Vec<char> = first.as_ref().chars().collect();
    for name in &names[1..] {
        let shared = prefix
            .iter()
            .zip(name.as_ref().chars())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(shared);
    }
    prefix.into_iter().collect()
}

/// Name with the common prefix removed, or the full name if nothing remains.
pub fn short_name(name: &str, common_prefix: &str) -> String {
    let short = name.strip_prefix(common_prefix).unwrap_or(name).trim();
    if short.is_empty() {
        name.to_string()
    } else {
        short.to_string()
    }
}
