use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::Result;
use crate::obligations::obligations_errors::ObligationError;
use crate::obligations::obligations_model::{Obligation, ObligationUpdate};
use crate::obligations::obligations_traits::ObligationRepositoryTrait;
use crate::schema::obligations;

pub struct ObligationRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl ObligationRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        ObligationRepository { pool }
    }
}

impl ObligationRepositoryTrait for ObligationRepository {
    fn get_obligation(&self, obligation_id: &str) -> Result<Obligation> {
        let mut conn = get_connection(&self.pool)?;

        obligations::table
            .filter(obligations::id.eq(obligation_id))
            .filter(obligations::is_deleted.eq(false))
            .first::<Obligation>(&mut conn)
            .optional()
            .map_err(ObligationError::from)?
            .ok_or_else(|| {
                ObligationError::NotFound(format!("Obligation {} not found", obligation_id)).into()
            })
    }

    fn get_obligations(&self) -> Result<Vec<Obligation>> {
        let mut conn = get_connection(&self.pool)?;

        Ok(obligations::table
            .filter(obligations::is_deleted.eq(false))
            .order(obligations::start_date.asc())
            .load::<Obligation>(&mut conn)
            .map_err(ObligationError::from)?)
    }

    fn insert_obligations(&self, rows: Vec<Obligation>) -> Result<Vec<Obligation>> {
        let mut conn = get_connection(&self.pool)?;

        // Installment siblings land together or not at all.
        // SQLite does not support batch insert with RETURNING, so each row is
        // inserted individually within the same transaction, preserving the
        // all-or-nothing semantics and the returned ordering.
        let inserted = conn.transaction(|conn| {
            let mut inserted = Vec::with_capacity(rows.len());
            for row in &rows {
                let obligation = diesel::insert_into(obligations::table)
                    .values(row)
                    .get_result::<Obligation>(conn)?;
                inserted.push(obligation);
            }
            diesel::QueryResult::Ok(inserted)
        })?;

        Ok(inserted)
    }

    fn update_obligation(
        &self,
        obligation_id: &str,
        update: &ObligationUpdate,
        new_status: Option<String>,
        expected_paid: Option<String>,
    ) -> Result<Obligation> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        let affected = match (&new_status, &expected_paid) {
            (Some(status_value), Some(expected)) => diesel::update(
                obligations::table
                    .filter(obligations::id.eq(obligation_id))
                    .filter(obligations::is_deleted.eq(false))
                    .filter(obligations::paid_amount.eq(expected)),
            )
            .set((
                update,
                obligations::status.eq(status_value),
                obligations::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .map_err(ObligationError::from)?,
            (Some(status_value), None) => diesel::update(
                obligations::table
                    .filter(obligations::id.eq(obligation_id))
                    .filter(obligations::is_deleted.eq(false)),
            )
            .set((
                update,
                obligations::status.eq(status_value),
                obligations::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .map_err(ObligationError::from)?,
            (None, _) => diesel::update(
                obligations::table
                    .filter(obligations::id.eq(obligation_id))
                    .filter(obligations::is_deleted.eq(false)),
            )
            .set((update, obligations::updated_at.eq(now)))
            .execute(&mut conn)
            .map_err(ObligationError::from)?,
        };

        if affected == 0 {
            // Either the row is gone or the paid-amount guard missed
            let exists = obligations::table
                .filter(obligations::id.eq(obligation_id))
                .filter(obligations::is_deleted.eq(false))
                .count()
                .get_result::<i64>(&mut conn)
                .map_err(ObligationError::from)?;

            if exists == 0 {
                return Err(ObligationError::NotFound(format!(
                    "Obligation {} not found",
                    obligation_id
                ))
                .into());
            }
            return Err(ObligationError::ConcurrentModification(format!(
                "Obligation {} was modified concurrently",
                obligation_id
            ))
            .into());
        }

        self.get_obligation(obligation_id)
    }

    fn soft_delete_obligation(&self, obligation_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        let affected = diesel::update(
            obligations::table
                .filter(obligations::id.eq(obligation_id))
                .filter(obligations::is_deleted.eq(false)),
        )
        .set((
            obligations::is_deleted.eq(true),
            obligations::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .map_err(ObligationError::from)?;

        if affected == 0 {
            return Err(ObligationError::NotFound(format!(
                "Obligation {} not found",
                obligation_id
            ))
            .into());
        }

        Ok(affected)
    }
}
