use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::budgets::BudgetError;
use crate::utils::money;

/// Budget item payment types
pub const BUDGET_PAYMENT_TYPE_SINGLE: &str = "SINGLE";
pub const BUDGET_PAYMENT_TYPE_MONTHLY: &str = "MONTHLY";
pub const BUDGET_PAYMENT_TYPE_INSTALLMENT: &str = "INSTALLMENT";

/// A forward-looking planned expenditure not yet materialized into a real
/// obligation.
///
/// Once converted (`is_converted`) the item drops out of the cash-flow
/// projection so the materialized obligation is not counted twice.
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
#[diesel(table_name = crate::schema::budget_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: String,
    pub budget_plan_id: String,
    pub name: String,
    pub planned_amount: String,
    pub payment_type: String,
    pub monthly_amount: Option<String>,
    pub month_count: Option<i32>,
    pub installment_amount: Option<String>,
    pub installment_count: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_converted: bool,
    pub converted_obligation_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BudgetItem {
    pub fn planned_amount_decimal(&self) -> Decimal {
        money::parse_amount_str(&self.planned_amount)
    }

    pub fn monthly_amount_decimal(&self) -> Decimal {
        money::parse_amount(self.monthly_amount.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetPaymentType {
    Single,
    Monthly,
    Installment,
}

impl BudgetPaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPaymentType::Single => BUDGET_PAYMENT_TYPE_SINGLE,
            BudgetPaymentType::Monthly => BUDGET_PAYMENT_TYPE_MONTHLY,
            BudgetPaymentType::Installment => BUDGET_PAYMENT_TYPE_INSTALLMENT,
        }
    }
}

impl FromStr for BudgetPaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s == BUDGET_PAYMENT_TYPE_SINGLE => Ok(BudgetPaymentType::Single),
            s if s == BUDGET_PAYMENT_TYPE_MONTHLY => Ok(BudgetPaymentType::Monthly),
            s if s == BUDGET_PAYMENT_TYPE_INSTALLMENT => Ok(BudgetPaymentType::Installment),
            _ => Err(format!("Unknown budget payment type: {}", s)),
        }
    }
}

/// Input model for creating a budget item
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetItem {
    pub id: Option<String>,
    pub budget_plan_id: String,
    pub name: String,
    pub planned_amount: String,
    pub payment_type: String,
    pub monthly_amount: Option<String>,
    pub month_count: Option<i32>,
    pub installment_amount: Option<String>,
    pub installment_count: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewBudgetItem {
    /// Validates the new budget item, including type-specific fields
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.budget_plan_id.trim().is_empty() {
            return Err(BudgetError::InvalidData(
                "Budget plan ID cannot be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(BudgetError::InvalidData(
                "Budget item name cannot be empty".to_string(),
            ));
        }
        if money::parse_amount_str(&self.planned_amount) < Decimal::ZERO {
            return Err(BudgetError::InvalidData(
                "Planned amount cannot be negative".to_string(),
            ));
        }

        let payment_type =
            BudgetPaymentType::from_str(&self.payment_type).map_err(BudgetError::InvalidData)?;

        match payment_type {
            BudgetPaymentType::Single => {}
            BudgetPaymentType::Monthly => {
                if self.monthly_amount.is_none() {
                    return Err(BudgetError::InvalidData(
                        "Monthly budget items require a monthly amount".to_string(),
                    ));
                }
                match self.month_count {
                    Some(count) if count >= 1 => {}
                    _ => {
                        return Err(BudgetError::InvalidData(
                            "Monthly budget items require a month count of at least 1"
                                .to_string(),
                        ));
                    }
                }
            }
            BudgetPaymentType::Installment => match self.installment_count {
                Some(count) if count >= 1 => {}
                _ => {
                    return Err(BudgetError::InvalidData(
                        "Installment budget items require an installment count of at least 1"
                            .to_string(),
                    ));
                }
            },
        }

        Ok(())
    }
}

/// Input model for partially updating a budget item
#[derive(AsChangeset, Serialize, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::budget_items)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItemUpdate {
    pub name: Option<String>,
    pub planned_amount: Option<String>,
    pub monthly_amount: Option<String>,
    pub month_count: Option<i32>,
    pub installment_amount: Option<String>,
    pub installment_count: Option<i32>,
    pub end_date: Option<NaiveDate>,
}
