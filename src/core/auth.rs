use serde::Deserialize;
use std::time::Duration;

use crate::core::billing::counter::RequestCounter;
use crate::core::error::AnalysisError;
use crate::core::process::run_command;

const TOKEN_ENV: &str = "AZURE_ACCESS_TOKEN";
const MANAGEMENT_RESOURCE: &str = "--resource=https://management.azure.com/";
const AZ_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct AzAccessToken {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

/// Bearer token for the management API.
///
/// Uses AZURE_ACCESS_TOKEN when set, otherwise asks the `az` CLI.
pub async fn get_access_token(counter: &mut RequestCounter) -> Result<String, AnalysisError> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            tracing::debug!("Using access token from {}", TOKEN_ENV);
            return Ok(token.trim().to_string());
        }
    }

    let stdout = run_command("az", &["account", "get-access-token", MANAGEMENT_RESOURCE], AZ_TIMEOUT)
        .await
        .map_err(|e| AnalysisError::AuthFailure(format!("{:#}", e)))?;
    counter.record("az account get-access-token");
    parse_access_token(&stdout)
}

fn parse_access_token(json: &str) -> Result<String, AnalysisError> {
    let parsed: AzAccessToken = serde_json::from_str(json).map_err(|e| {
        AnalysisError::AuthFailure(format!("Failed to parse access token JSON: {}", e))
    })?;
    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        Some(_) => Err(AnalysisError::AuthFailure("Empty access token".to_string())),
        None => Err(AnalysisError::AuthFailure(
            "Missing 'accessToken' in az output".to_string(),
        )),
    }
}
