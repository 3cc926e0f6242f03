use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::Result;
use crate::schedules::schedules_constants::{
    SCHEDULE_STATUS_COMPLETED, SCHEDULE_STATUS_PENDING, SCHEDULE_STATUS_SUPERSEDED,
};
use crate::schedules::schedules_errors::ScheduleError;
use crate::schedules::schedules_model::{NewScheduleEntry, ScheduleEntry};
use crate::schedules::schedules_traits::ScheduleRepositoryTrait;
use crate::schema::schedule_entries;
use crate::utils::time_utils::month_bounds;

pub struct ScheduleRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl ScheduleRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        ScheduleRepository { pool }
    }

    fn build_row(new_entry: &NewScheduleEntry) -> ScheduleEntry {
        let now = Utc::now().naive_utc();
        ScheduleEntry {
            id: new_entry
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            obligation_id: new_entry.obligation_id.clone(),
            scheduled_date: new_entry.scheduled_date,
            scheduled_amount: new_entry.scheduled_amount.clone(),
            status: SCHEDULE_STATUS_PENDING.to_string(),
            superseded_by: None,
            notes: new_entry.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl ScheduleRepositoryTrait for ScheduleRepository {
    fn insert_entry(&self, new_entry: &NewScheduleEntry) -> Result<ScheduleEntry> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        let row = Self::build_row(new_entry);

        Ok(diesel::insert_into(schedule_entries::table)
            .values(&row)
            .returning(schedule_entries::all_columns)
            .get_result(&mut conn)
            .map_err(ScheduleError::from)?)
    }

    fn get_entry(&self, entry_id: &str) -> Result<ScheduleEntry> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        schedule_entries::table
            .filter(schedule_entries::id.eq(entry_id))
            .first::<ScheduleEntry>(&mut conn)
            .optional()
            .map_err(ScheduleError::from)?
            .ok_or_else(|| {
                ScheduleError::NotFound(format!("Schedule entry {} not found", entry_id)).into()
            })
    }

    fn get_entries_by_month(&self, year: i32, month: u32) -> Result<Vec<ScheduleEntry>> {
        let (first, last) = month_bounds(year, month).ok_or_else(|| {
            ScheduleError::InvalidData(format!("Invalid year/month: {}-{}", year, month))
        })?;

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        Ok(schedule_entries::table
            .filter(schedule_entries::scheduled_date.ge(first))
            .filter(schedule_entries::scheduled_date.le(last))
            .order(schedule_entries::scheduled_date.asc())
            .load::<ScheduleEntry>(&mut conn)
            .map_err(ScheduleError::from)?)
    }

    fn get_entries_by_obligation(&self, obligation_id: &str) -> Result<Vec<ScheduleEntry>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        Ok(schedule_entries::table
            .filter(schedule_entries::obligation_id.eq(obligation_id))
            .order(schedule_entries::scheduled_date.asc())
            .load::<ScheduleEntry>(&mut conn)
            .map_err(ScheduleError::from)?)
    }

    fn get_pending_entries(&self) -> Result<Vec<ScheduleEntry>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        Ok(schedule_entries::table
            .filter(schedule_entries::status.eq(SCHEDULE_STATUS_PENDING))
            .order(schedule_entries::scheduled_date.asc())
            .load::<ScheduleEntry>(&mut conn)
            .map_err(ScheduleError::from)?)
    }

    fn count_overdue_entries(&self, today: NaiveDate) -> Result<i64> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;

        Ok(schedule_entries::table
            .filter(schedule_entries::status.eq(SCHEDULE_STATUS_PENDING))
            .filter(schedule_entries::scheduled_date.lt(today))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(ScheduleError::from)?)
    }

    fn supersede_entry(
        &self,
        entry_id: &str,
        replacement: &NewScheduleEntry,
    ) -> Result<ScheduleEntry> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;
        let now = Utc::now().naive_utc();

        let row = Self::build_row(replacement);

        let inserted = conn.transaction::<ScheduleEntry, ScheduleError, _>(|conn| {
            let inserted: ScheduleEntry = diesel::insert_into(schedule_entries::table)
                .values(&row)
                .returning(schedule_entries::all_columns)
                .get_result(conn)?;

            // Only a still-pending original can lose to the replacement; two
            // racing reschedules cannot both win against one entry.
            let affected = diesel::update(
                schedule_entries::table
                    .filter(schedule_entries::id.eq(entry_id))
                    .filter(schedule_entries::status.eq(SCHEDULE_STATUS_PENDING)),
            )
            .set((
                schedule_entries::status.eq(SCHEDULE_STATUS_SUPERSEDED),
                schedule_entries::superseded_by.eq(&inserted.id),
                schedule_entries::updated_at.eq(now),
            ))
            .execute(conn)?;

            if affected == 0 {
                return Err(ScheduleError::ConcurrentModification(format!(
                    "Schedule entry {} is no longer pending",
                    entry_id
                )));
            }

            Ok(inserted)
        })?;

        Ok(inserted)
    }

    fn complete_entry(&self, entry_id: &str) -> Result<ScheduleEntry> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ScheduleError::DatabaseError(e.to_string()))?;
        let now = Utc::now().naive_utc();

        // Existence first, so a missing id is NotFound rather than a
        // conflict
        let exists = schedule_entries::table
            .filter(schedule_entries::id.eq(entry_id))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(ScheduleError::from)?;
        if exists == 0 {
            return Err(
                ScheduleError::NotFound(format!("Schedule entry {} not found", entry_id)).into(),
            );
        }

        let affected = diesel::update(
            schedule_entries::table
                .filter(schedule_entries::id.eq(entry_id))
                .filter(schedule_entries::status.eq(SCHEDULE_STATUS_PENDING)),
        )
        .set((
            schedule_entries::status.eq(SCHEDULE_STATUS_COMPLETED),
            schedule_entries::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .map_err(ScheduleError::from)?;

        if affected == 0 {
            return Err(ScheduleError::ConcurrentModification(format!(
                "Schedule entry {} is no longer pending",
                entry_id
            ))
            .into());
        }

        self.get_entry(entry_id)
    }
}
