use num_traits::Zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cash-flow categories a month's outflow is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForecastCategory {
    /// Planned budget items not yet materialized
    Budget,
    /// Explicit pending schedule entries
    Scheduled,
    /// Outstanding balance of non-recurring open obligations
    Estimated,
    /// Outstanding balance of recurring open obligations
    Recurring,
    /// Settlements recorded in their obligation's own due month
    PaidInMonth,
    /// Late settlements carried over from an earlier due month
    PaidCarriedOver,
}

/// One traceable contribution to a bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastLineItem {
    pub category: ForecastCategory,
    pub source_id: String,
    pub name: String,
    pub amount: Decimal,
}

/// Per-month aggregation of projected and settled cash flow.
///
/// Category subtotals are exposed independently; consumers pick which ones to
/// sum. Not persisted, recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyForecastBucket {
    pub month: String,
    pub budget: Decimal,
    pub scheduled: Decimal,
    pub estimated: Decimal,
    pub recurring: Decimal,
    pub paid_in_month: Decimal,
    pub paid_carried_over: Decimal,
    pub line_items: Vec<ForecastLineItem>,
}

impl MonthlyForecastBucket {
    pub fn new(month: String) -> Self {
        MonthlyForecastBucket {
            month,
            budget: Decimal::zero(),
            scheduled: Decimal::zero(),
            estimated: Decimal::zero(),
            recurring: Decimal::zero(),
            paid_in_month: Decimal::zero(),
            paid_carried_over: Decimal::zero(),
            line_items: Vec::new(),
        }
    }

    pub fn add(
        &mut self,
        category: ForecastCategory,
        source_id: &str,
        name: &str,
        amount: Decimal,
    ) {
        match category {
            ForecastCategory::Budget => self.budget += amount,
            ForecastCategory::Scheduled => self.scheduled += amount,
            ForecastCategory::Estimated => self.estimated += amount,
            ForecastCategory::Recurring => self.recurring += amount,
            ForecastCategory::PaidInMonth => self.paid_in_month += amount,
            ForecastCategory::PaidCarriedOver => self.paid_carried_over += amount,
        }

        self.line_items.push(ForecastLineItem {
            category,
            source_id: source_id.to_string(),
            name: name.to_string(),
            amount,
        });
    }

    /// Forward-looking outflow; settled categories are reported, not summed
    pub fn total_outflow(&self) -> Decimal {
        self.budget + self.scheduled + self.estimated + self.recurring
    }
}
