use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// Column 2 of a grouped row.
const DIMENSION_COLUMN: usize = 2;
/// Column 3 of a tag-grouped row.
const TAG_VALUE_COLUMN: usize = 3;

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub properties: Option<QueryProperties>,
}

#[derive(Debug, Deserialize)]
pub struct QueryProperties {
    pub rows: Option<Vec<Vec<Value>>>,
}

impl QueryResponse {
    /// Raw rows, or `None` when the response carries no `properties.rows`.
    pub fn into_rows(self) -> Option<Vec<Vec<Value>>> {
        self.properties.and_then(|p| p.rows)
    }
}

/// One daily cost row as returned by the billing API.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingRow {
    pub amount: f64,
    pub date: NaiveDate,
    pub dimension: Option<String>,
    pub tag_value: Option<String>,
}

impl BillingRow {
    /// Parse `[amount, YYYYMMDD, group_or_tag_key, tag_value_or_null, ...]`.
    pub fn from_values(values: &[Value]) -> Option<Self> {
        let amount = parse_amount(values.first()?)?;
        let date = parse_date(values.get(1)?)?;
        Some(Self {
            amount,
            date,
            dimension: values.get(DIMENSION_COLUMN).and_then(parse_text),
            tag_value: values.get(TAG_VALUE_COLUMN).and_then(parse_text),
        })
    }
}

/// Parse every row, skipping (and logging) rows without a usable amount or date.
pub fn parse_rows(subscription_name: &str, raw: &[Vec<Value>]) -> Vec<BillingRow> {
    raw.iter()
        .filter_map(|values| {
            let row = BillingRow::from_values(values);
            if row.is_none() {
                let raw_row = Value::Array(values.clone());
                tracing::warn!(
                    subscription = subscription_name,
                    row = %raw_row,
                    "Skipping unparseable cost row"
                );
            }
            row
        })
        .collect()
}

fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    let digits = match value {
        Value::Number(n) => n.as_u64()?.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    NaiveDate::parse_from_str(&digits, "%Y%m%d").ok()
}

fn parse_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_response_with_rows() {
        let body = json!({
            "properties": {
                "columns": [{"name": "Cost", "type": "Number"}],
                "rows": [[12.5, 20240510, "Virtual Machines", "USD"]]
            }
        });
        let resp: QueryResponse = serde_json::from_value(body).unwrap();
        let rows = resp.into_rows().unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn deserialize_response_without_rows() {
        let resp: QueryResponse = serde_json::from_value(json!({"properties": {}})).unwrap();
        assert!(resp.into_rows().is_none());
        let resp: QueryResponse = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert!(resp.into_rows().is_none());
    }

    #[test]
    fn parse_dimension_row() {
        let row = BillingRow::from_values(&[json!(12.5), json!(20240510), json!("Storage"), json!("USD")])
            .unwrap();
        assert!((row.amount - 12.5).abs() < 1e-12);
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(row.dimension.as_deref(), Some("Storage"));
        assert_eq!(row.tag_value.as_deref(), Some("USD"));
    }

    #[test]
    fn parse_tag_row_with_null_value() {
        let row = BillingRow::from_values(&[json!(1), json!(20240510), json!("project"), Value::Null])
            .unwrap();
        assert_eq!(row.dimension.as_deref(), Some("project"));
        assert!(row.tag_value.is_none());
    }

    #[test]
    fn parse_string_amount_and_date() {
        let row = BillingRow::from_values(&[json!("3.25"), json!("20240229")]).unwrap();
        assert!((row.amount - 3.25).abs() < 1e-12);
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(row.dimension.is_none());
    }

    #[test]
    fn parse_rows_skips_malformed() {
        let raw = vec![
            vec![json!(1.0), json!(20240510), json!("A")],
            vec![json!("n/a"), json!(20240510), json!("A")],
            vec![json!(1.0), json!(20241340), json!("A")],
            vec![json!(1.0)],
        ];
        let rows = parse_rows("Contoso", &raw);
        assert_eq!(rows.len(), 1);
    }
}
