use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use num_traits::Zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payments::PaymentError;
use crate::utils::money;

/// An immutable settlement against an obligation.
///
/// Records are append-only; a correction is a new offsetting record, never a
/// mutation or delete.
#[derive(
    Queryable,
    Insertable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::payment_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    pub obligation_id: String,
    pub amount_paid: String,
    pub payment_date: NaiveDate,
    pub payment_method: Option<String>,
    pub created_at: NaiveDateTime,
}

impl PaymentRecord {
    pub fn amount_paid_decimal(&self) -> Decimal {
        money::parse_amount_str(&self.amount_paid)
    }
}

/// Input model for recording a payment
///
/// `schedule_entry_id` optionally names the planned settlement this payment
/// fulfils; the entry is completed in the same transaction.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentRecord {
    pub id: Option<String>,
    pub obligation_id: String,
    pub amount_paid: String,
    pub payment_date: NaiveDate,
    pub payment_method: Option<String>,
    pub schedule_entry_id: Option<String>,
}

impl NewPaymentRecord {
    /// Validates the new payment data
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.obligation_id.trim().is_empty() {
            return Err(PaymentError::InvalidData(
                "Obligation ID cannot be empty".to_string(),
            ));
        }
        if money::parse_amount_str(&self.amount_paid) <= Decimal::zero() {
            return Err(PaymentError::InvalidData(
                "Payment amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
