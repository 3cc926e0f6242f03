use crate::errors::Result;
use crate::forecast::forecast_model::MonthlyForecastBucket;

/// Trait for the cash-flow projection service
pub trait ForecastServiceTrait: Send + Sync {
    /// One bucket per month starting with the current month; read-only.
    fn project_cash_flow(&self, months_ahead: u32) -> Result<Vec<MonthlyForecastBucket>>;
}
