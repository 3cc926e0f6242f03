use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::schedules::ScheduleError;
use crate::utils::money;

/// An explicit planned settlement date/amount, distinct from the obligation's
/// own due date.
///
/// A reschedule never moves the date in place: it inserts a replacement entry
/// and stamps this one SUPERSEDED with `superseded_by` pointing at it, keeping
/// the audit trail queryable.
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
#[diesel(table_name = crate::schema::schedule_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub obligation_id: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_amount: String,
    pub status: String,
    pub superseded_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ScheduleEntry {
    pub fn scheduled_amount_decimal(&self) -> Decimal {
        money::parse_amount_str(&self.scheduled_amount)
    }

    /// Overdue is derived, never stored
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        ScheduleStatus::from_str(&self.status) == Ok(ScheduleStatus::Pending)
            && self.scheduled_date < today
    }

    pub fn to_view(self, today: NaiveDate) -> ScheduleEntryView {
        let is_overdue = self.is_overdue(today);
        ScheduleEntryView {
            id: self.id,
            obligation_id: self.obligation_id,
            scheduled_date: self.scheduled_date,
            scheduled_amount: self.scheduled_amount,
            status: self.status,
            superseded_by: self.superseded_by,
            notes: self.notes,
            is_overdue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Pending,
    Completed,
    Superseded,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        use crate::schedules::schedules_constants::*;
        match self {
            ScheduleStatus::Pending => SCHEDULE_STATUS_PENDING,
            ScheduleStatus::Completed => SCHEDULE_STATUS_COMPLETED,
            ScheduleStatus::Superseded => SCHEDULE_STATUS_SUPERSEDED,
        }
    }
}

impl FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::schedules::schedules_constants::*;
        match s {
            s if s == SCHEDULE_STATUS_PENDING => Ok(ScheduleStatus::Pending),
            s if s == SCHEDULE_STATUS_COMPLETED => Ok(ScheduleStatus::Completed),
            s if s == SCHEDULE_STATUS_SUPERSEDED => Ok(ScheduleStatus::Superseded),
            _ => Err(format!("Unknown schedule status: {}", s)),
        }
    }
}

/// Input model for creating a schedule entry
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleEntry {
    pub id: Option<String>,
    pub obligation_id: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_amount: String,
    pub notes: Option<String>,
}

impl NewScheduleEntry {
    /// Validates the new entry data
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.obligation_id.trim().is_empty() {
            return Err(ScheduleError::InvalidData(
                "Obligation ID cannot be empty".to_string(),
            ));
        }
        if money::parse_amount_str(&self.scheduled_amount) <= Decimal::ZERO {
            return Err(ScheduleError::InvalidData(
                "Scheduled amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Schedule entry with derived overdue state, for callers
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntryView {
    pub id: String,
    pub obligation_id: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_amount: String,
    pub status: String,
    pub superseded_by: Option<String>,
    pub notes: Option<String>,
    pub is_overdue: bool,
}

/// Per-day and aggregate totals for one month, plus the system-wide overdue
/// count (not limited to the queried month).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub year: i32,
    pub month: u32,
    pub by_day: HashMap<String, Decimal>,
    pub total_scheduled: Decimal,
    pub entry_count: i32,
    pub overdue_count: i64,
}
