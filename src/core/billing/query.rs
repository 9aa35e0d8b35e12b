use serde::Serialize;

use crate::core::analysis::dispatcher::AnalysisMode;
use crate::core::models::window::AnalysisWindow;

/// Body of a cost-management query: daily summed cost over a custom period.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefinition {
    #[serde(rename = "type")]
    pub cost_type: String,
    pub timeframe: &'static str,
    pub time_period: TimePeriod,
    pub dataset: Dataset,
}

#[derive(Debug, Serialize)]
pub struct TimePeriod {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct Dataset {
    pub granularity: &'static str,
    pub aggregation: Aggregation,
    pub grouping: Vec<Grouping>,
}

#[derive(Debug, Serialize)]
pub struct Aggregation {
    #[serde(rename = "totalCost")]
    pub total_cost: AggregationField,
}

#[derive(Debug, Serialize)]
pub struct AggregationField {
    pub name: &'static str,
    pub function: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Grouping {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
}

impl QueryDefinition {
    pub fn new(cost_type: &str, mode: &AnalysisMode, window: &AnalysisWindow) -> Self {
        let grouping: Vec<Grouping> = mode
            .grouping()
            .map(|(kind, name)| Grouping {
                kind,
                name: name.to_string(),
            })
            .into_iter()
            .collect();
        Self {
            cost_type: cost_type.to_string(),
            timeframe: "Custom",
            time_period: TimePeriod {
                from: window.start_date.format("%Y-%m-%d").to_string(),
                to: window.end_date.format("%Y-%m-%d").to_string(),
            },
            dataset: Dataset {
                granularity: "Daily",
                aggregation: Aggregation {
                    total_cost: AggregationField {
                        name: "Cost",
                        function: "Sum",
                    },
                },
                grouping,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> AnalysisWindow {
        AnalysisWindow::new(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), 31).unwrap()
    }

    #[test]
    fn dimension_query_shape() {
        let mode = AnalysisMode::Dimension("ServiceName".to_string());
        let body = serde_json::to_value(QueryDefinition::new("ActualCost", &mode, &window())).unwrap();
        assert_eq!(body["type"], "ActualCost");
        assert_eq!(body["timeframe"], "Custom");
        assert_eq!(body["timePeriod"]["from"], "2024-04-09");
        assert_eq!(body["timePeriod"]["to"], "2024-05-10");
        assert_eq!(body["dataset"]["granularity"], "Daily");
        assert_eq!(body["dataset"]["aggregation"]["totalCost"]["function"], "Sum");
        assert_eq!(body["dataset"]["grouping"][0]["type"], "Dimension");
        assert_eq!(body["dataset"]["grouping"][0]["name"], "ServiceName");
    }

    #[test]
    fn tag_query_groups_by_tag_key() {
        let mode = AnalysisMode::Tag("Project".to_string());
        let body = serde_json::to_value(QueryDefinition::new("ActualCost", &mode, &window())).unwrap();
        assert_eq!(body["dataset"]["grouping"][0]["type"], "TagKey");
        assert_eq!(body["dataset"]["grouping"][0]["name"], "Project");
    }

    #[test]
    fn subscription_query_has_no_grouping() {
        let body =
            serde_json::to_value(QueryDefinition::new("ActualCost", &AnalysisMode::Subscription, &window()))
                .unwrap();
        assert_eq!(body["dataset"]["grouping"], serde_json::json!([]));
    }
}
