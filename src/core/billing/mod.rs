pub mod client;
pub mod counter;
pub mod query;
pub mod response;

use crate::core::analysis::dispatcher::AnalysisMode;
use crate::core::billing::response::BillingRow;
use crate::core::error::AnalysisError;
use crate::core::models::window::AnalysisWindow;

/// Source of daily cost rows for one subscription.
///
/// `Ok(None)` means the service answered without any cost rows.
pub trait CostQuery {
    async fn query_costs(
        &mut self,
        subscription_name: &str,
        subscription_id: &str,
        mode: &AnalysisMode,
        window: &AnalysisWindow,
    ) -> Result<Option<Vec<BillingRow>>, AnalysisError>;
}
