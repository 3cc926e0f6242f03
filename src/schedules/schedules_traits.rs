use chrono::NaiveDate;

use crate::errors::Result;
use crate::schedules::schedules_model::{
    NewScheduleEntry, ScheduleEntry, ScheduleEntryView, ScheduleStats,
};

/// Trait for schedule repository operations
pub trait ScheduleRepositoryTrait: Send + Sync {
    fn insert_entry(&self, new_entry: &NewScheduleEntry) -> Result<ScheduleEntry>;
    fn get_entry(&self, entry_id: &str) -> Result<ScheduleEntry>;
    fn get_entries_by_month(&self, year: i32, month: u32) -> Result<Vec<ScheduleEntry>>;
    fn get_entries_by_obligation(&self, obligation_id: &str) -> Result<Vec<ScheduleEntry>>;
    fn get_pending_entries(&self) -> Result<Vec<ScheduleEntry>>;
    fn count_overdue_entries(&self, today: NaiveDate) -> Result<i64>;

    /// Inserts the replacement and supersedes the original in one
    /// transaction, guarded on the original still being PENDING.
    fn supersede_entry(
        &self,
        entry_id: &str,
        replacement: &NewScheduleEntry,
    ) -> Result<ScheduleEntry>;

    fn complete_entry(&self, entry_id: &str) -> Result<ScheduleEntry>;
}

/// Trait for schedule service operations
pub trait ScheduleServiceTrait: Send + Sync {
    fn create_entry(&self, new_entry: NewScheduleEntry) -> Result<ScheduleEntry>;
    fn list_schedule(&self, year: i32, month: u32) -> Result<Vec<ScheduleEntryView>>;
    fn get_schedule_stats(&self, year: i32, month: u32) -> Result<ScheduleStats>;
    fn reschedule_entry(
        &self,
        entry_id: &str,
        new_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<ScheduleEntry>;
    fn complete_entry(&self, entry_id: &str) -> Result<ScheduleEntry>;
}
