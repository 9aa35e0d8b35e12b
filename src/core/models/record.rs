use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One parsed billing row: a day's cost attributed to a group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub date: NaiveDate,
    pub amount: f64,
    pub group_key: String,
}
