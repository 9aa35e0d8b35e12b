use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Authentication failed: {0}")]
    AuthFailure(String),
    #[error("Subscription discovery failed: {0}")]
    SubscriptionDiscoveryFailure(String),
    #[error("Invalid date '{input}' (expected YYYY-MM-DD): {source}")]
    InvalidDateFormat {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Invalid period: must be at least 1 day and stay within the calendar range")]
    InvalidPeriod,
    #[error("Malformed billing response for '{subscription}': {message}")]
    MalformedBillingResponse {
        subscription: String,
        message: String,
    },
    #[error("Failed to retrieve cost data for subscription '{subscription}': {message}")]
    NetworkFailure {
        subscription: String,
        message: String,
    },
    #[error("Failed to save results to {}: {message}", path.display())]
    PersistenceFailure { path: PathBuf, message: String },
}
