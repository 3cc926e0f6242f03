use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::obligations::ObligationError;
use crate::utils::money;
use crate::utils::time_utils::add_months_clamped;

/// One generated period of an installment group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPeriod {
    pub period_no: u32,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

/// Splits a total across monthly periods with exact-remainder accounting.
///
/// Each period gets the floored equal share; the first period absorbs the
/// whole remainder so the amounts re-sum to `total` to the smallest currency
/// unit. Due dates advance month by month from `start_date`, clamping the day
/// into shorter months.
pub fn split_total(
    total: Decimal,
    periods: u32,
    start_date: NaiveDate,
) -> Result<Vec<InstallmentPeriod>, ObligationError> {
    if periods < 1 {
        return Err(ObligationError::InvalidData(
            "Period count must be at least 1".to_string(),
        ));
    }
    if total < Decimal::ZERO {
        return Err(ObligationError::InvalidData(
            "Total amount cannot be negative".to_string(),
        ));
    }

    let period_count = Decimal::from(periods);
    let base = money::floor_to_unit(total / period_count);
    let remainder = total - base * period_count;

    let mut result = Vec::with_capacity(periods as usize);
    for k in 0..periods {
        let amount = if k == 0 { base + remainder } else { base };
        result.push(InstallmentPeriod {
            period_no: k + 1,
            due_date: add_months_clamped(start_date, k),
            amount,
        });
    }

    let distributed: Decimal = result.iter().map(|p| p.amount).sum();
    if distributed != total {
        return Err(ObligationError::InvalidData(format!(
            "Installment amounts ({}) do not sum to total ({})",
            distributed, total
        )));
    }

    Ok(result)
}
