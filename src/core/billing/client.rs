use anyhow::{Context, Result};
use std::time::Duration;

use crate::core::analysis::dispatcher::AnalysisMode;
use crate::core::billing::counter::RequestCounter;
use crate::core::billing::query::QueryDefinition;
use crate::core::billing::response::{parse_rows, BillingRow, QueryResponse};
use crate::core::billing::CostQuery;
use crate::core::config::BillingConfig;
use crate::core::error::AnalysisError;
use crate::core::models::window::AnalysisWindow;

/// Validate that a resolved endpoint URL uses HTTPS.
///
/// The bearer token is sent with every query, so plain HTTP or other schemes
/// are refused.
pub fn validate_endpoint(url: &str) -> Result<()> {
    if !url.starts_with("https://") {
        anyhow::bail!("Billing endpoint must use HTTPS, got: {}", url);
    }
    Ok(())
}

/// Cost-management query client for a single run.
pub struct BillingClient {
    http: reqwest::Client,
    endpoint: String,
    api_version: String,
    cost_type: String,
    access_token: String,
    request_pause: Duration,
    counter: RequestCounter,
}

impl BillingClient {
    pub fn new(config: &BillingConfig, access_token: String, counter: RequestCounter) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            cost_type: config.cost_type.clone(),
            access_token,
            request_pause: config.request_pause(),
            counter,
        })
    }

    pub fn counter(&self) -> &RequestCounter {
        &self.counter
    }

    fn query_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.CostManagement/query",
            self.endpoint, subscription_id
        )
    }
}

impl CostQuery for BillingClient {
    async fn query_costs(
        &mut self,
        subscription_name: &str,
        subscription_id: &str,
        mode: &AnalysisMode,
        window: &AnalysisWindow,
    ) -> Result<Option<Vec<BillingRow>>, AnalysisError> {
        let network = |message: String| AnalysisError::NetworkFailure {
            subscription: subscription_name.to_string(),
            message,
        };

        let body = QueryDefinition::new(&self.cost_type, mode, window);
        tracing::debug!(
            subscription = subscription_id,
            payload = %serde_json::to_string(&body).unwrap_or_default(),
            "Sending cost query"
        );

        let response = self
            .http
            .post(self.query_url(subscription_id))
            .query(&[("api-version", self.api_version.as_str())])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| network(e.to_string()))?;
        self.counter.record("Cost query");

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(network(format!("HTTP {}: {}", status.as_u16(), text.trim())));
        }
        let text = response.text().await.map_err(|e| network(e.to_string()))?;
        tokio::time::sleep(self.request_pause).await;

        let parsed: QueryResponse =
            serde_json::from_str(&text).map_err(|e| AnalysisError::MalformedBillingResponse {
                subscription: subscription_name.to_string(),
                message: e.to_string(),
            })?;
        match parsed.into_rows() {
            Some(raw) => {
                tracing::debug!(subscription = subscription_name, rows = raw.len(), "Received cost rows");
                Ok(Some(parse_rows(subscription_name, &raw)))
            }
            None => {
                tracing::info!(subscription = subscription_name, "No cost found in the response data");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn window() -> AnalysisWindow {
        AnalysisWindow::new(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), 31).unwrap()
    }

    fn client_for(server: &MockServer) -> BillingClient {
        let config = BillingConfig {
            endpoint: format!("{}/", server.uri()),
            request_pause_ms: 0,
            ..BillingConfig::default()
        };
        BillingClient::new(&config, "tok_abc".to_string(), RequestCounter::new()).unwrap()
    }

    #[test]
    fn validate_endpoint_accepts_https() {
        assert!(validate_endpoint("https://management.azure.com").is_ok());
    }

    #[test]
    fn validate_endpoint_rejects_http() {
        let err = validate_endpoint("http://evil.com").unwrap_err();
        assert!(err.to_string().contains("must use HTTPS"));
    }

    #[test]
    fn validate_endpoint_rejects_no_scheme() {
        assert!(validate_endpoint("management.azure.com").is_err());
    }

    #[tokio::test]
    async fn query_returns_parsed_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/subscriptions/sub-1/providers/Microsoft.CostManagement/query"))
            .and(query_param("api-version", "2021-10-01"))
            .and(header("authorization", "Bearer tok_abc"))
            .and(body_partial_json(json!({
                "timePeriod": {"from": "2024-04-09", "to": "2024-05-10"},
                "dataset": {"grouping": [{"type": "Dimension", "name": "ServiceName"}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {
                    "rows": [
                        [10.0, 20240509, "Storage", "USD"],
                        [12.5, 20240510, "Storage", "USD"]
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let mode = AnalysisMode::Dimension("ServiceName".to_string());
        let rows = client
            .query_costs("Contoso Prod", "sub-1", &mode, &window())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].dimension.as_deref(), Some("Storage"));
        assert_eq!(client.counter().count(), 1);
    }

    #[tokio::test]
    async fn query_without_rows_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"properties": {}})))
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let result = client
            .query_costs("Contoso Prod", "sub-1", &AnalysisMode::Subscription, &window())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn http_error_is_network_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let err = client
            .query_costs("Contoso Prod", "sub-1", &AnalysisMode::Subscription, &window())
            .await
            .unwrap_err();
        match err {
            AnalysisError::NetworkFailure { subscription, message } => {
                assert_eq!(subscription, "Contoso Prod");
                assert!(message.contains("429"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        let err = client
            .query_costs("Contoso Prod", "sub-1", &AnalysisMode::Subscription, &window())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedBillingResponse { .. }));
    }
}
