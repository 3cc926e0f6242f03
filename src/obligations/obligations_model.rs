use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::obligations::ObligationError;
use crate::payments::PaymentRecord;
use crate::schedules::ScheduleEntryView;
use crate::utils::money;

/// A trackable amount owed, carrying a derived lifecycle status.
///
/// `paid_amount` mirrors the sum of the obligation's payment records and
/// `status` is always the status calculator's output over the current sums;
/// both are maintained by the write paths, never by callers.
#[derive(
    Queryable,
    Insertable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::obligations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Obligation {
    pub id: String,
    pub name: String,
    pub total_amount: String,
    pub paid_amount: String,
    pub status: String,
    pub payment_type: String,
    pub start_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub period_no: Option<i32>,
    pub period_count: Option<i32>,
    pub project_id: Option<String>,
    pub category_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Obligation {
    pub fn total_amount_decimal(&self) -> Decimal {
        money::parse_amount_str(&self.total_amount)
    }

    pub fn paid_amount_decimal(&self) -> Decimal {
        money::parse_amount_str(&self.paid_amount)
    }

    /// Outstanding balance
    pub fn remaining_amount(&self) -> Decimal {
        self.total_amount_decimal() - self.paid_amount_decimal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObligationStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
}

impl ObligationStatus {
    pub fn as_str(&self) -> &'static str {
        use crate::obligations::obligations_constants::*;
        match self {
            ObligationStatus::Pending => OBLIGATION_STATUS_PENDING,
            ObligationStatus::Partial => OBLIGATION_STATUS_PARTIAL,
            ObligationStatus::Paid => OBLIGATION_STATUS_PAID,
            ObligationStatus::Overdue => OBLIGATION_STATUS_OVERDUE,
        }
    }
}

impl FromStr for ObligationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::obligations::obligations_constants::*;
        match s {
            s if s == OBLIGATION_STATUS_PENDING => Ok(ObligationStatus::Pending),
            s if s == OBLIGATION_STATUS_PARTIAL => Ok(ObligationStatus::Partial),
            s if s == OBLIGATION_STATUS_PAID => Ok(ObligationStatus::Paid),
            s if s == OBLIGATION_STATUS_OVERDUE => Ok(ObligationStatus::Overdue),
            _ => Err(format!("Unknown obligation status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Single,
    Installment,
    Recurring,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        use crate::obligations::obligations_constants::*;
        match self {
            PaymentType::Single => PAYMENT_TYPE_SINGLE,
            PaymentType::Installment => PAYMENT_TYPE_INSTALLMENT,
            PaymentType::Recurring => PAYMENT_TYPE_RECURRING,
        }
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::obligations::obligations_constants::*;
        match s {
            s if s == PAYMENT_TYPE_SINGLE => Ok(PaymentType::Single),
            s if s == PAYMENT_TYPE_INSTALLMENT => Ok(PaymentType::Installment),
            s if s == PAYMENT_TYPE_RECURRING => Ok(PaymentType::Recurring),
            _ => Err(format!("Unknown payment type: {}", s)),
        }
    }
}

/// Input model for creating a new obligation
///
/// An INSTALLMENT input with `period_count` N expands into N sibling rows
/// through the installment calculator.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewObligation {
    pub id: Option<String>,
    pub name: String,
    pub total_amount: String,
    pub payment_type: String,
    pub period_count: Option<i32>,
    pub start_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub category_id: Option<String>,
}

impl NewObligation {
    /// Validates the new obligation data
    pub fn validate(&self) -> Result<(), ObligationError> {
        if self.name.trim().is_empty() {
            return Err(ObligationError::InvalidData(
                "Obligation name cannot be empty".to_string(),
            ));
        }
        let payment_type = PaymentType::from_str(&self.payment_type)
            .map_err(ObligationError::InvalidData)?;

        if money::parse_amount_str(&self.total_amount) < Decimal::ZERO {
            return Err(ObligationError::InvalidData(
                "Total amount cannot be negative".to_string(),
            ));
        }

        if payment_type == PaymentType::Installment {
            match self.period_count {
                Some(count) if count >= 1 => {}
                _ => {
                    return Err(ObligationError::InvalidData(
                        "Installment obligations require a period count of at least 1"
                            .to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Input model for partially updating an existing obligation
///
/// `None` fields are left untouched. A change to `total_amount` re-derives the
/// status in the same write.
#[derive(AsChangeset, Serialize, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::obligations)]
#[serde(rename_all = "camelCase")]
pub struct ObligationUpdate {
    pub name: Option<String>,
    pub total_amount: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub project_id: Option<String>,
    pub category_id: Option<String>,
}

impl ObligationUpdate {
    pub fn validate(&self) -> Result<(), ObligationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ObligationError::InvalidData(
                    "Obligation name cannot be empty".to_string(),
                ));
            }
        }
        if let Some(total) = &self.total_amount {
            if money::parse_amount_str(total) < Decimal::ZERO {
                return Err(ObligationError::InvalidData(
                    "Total amount cannot be negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// An obligation merged with its own records and entries plus computed sums
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ObligationIntegratedView {
    pub obligation: Obligation,
    pub payment_records: Vec<PaymentRecord>,
    pub schedule_entries: Vec<ScheduleEntryView>,
    pub actual_paid: Decimal,
    pub scheduled_total: Decimal,
    pub pending_amount: Decimal,
}
