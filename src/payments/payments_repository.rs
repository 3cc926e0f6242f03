use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::Result;
use crate::payments::payments_errors::PaymentError;
use crate::payments::payments_model::{NewPaymentRecord, PaymentRecord};
use crate::payments::payments_traits::PaymentRepositoryTrait;
use crate::obligations::Obligation;
use crate::schedules::{SCHEDULE_STATUS_COMPLETED, SCHEDULE_STATUS_PENDING};
use crate::schema::{obligations, payment_records, schedule_entries};

pub struct PaymentRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl PaymentRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        PaymentRepository { pool }
    }
}

impl PaymentRepositoryTrait for PaymentRepository {
    fn record_payment(
        &self,
        new_record: &NewPaymentRecord,
        expected_paid: &str,
        new_paid: &str,
        new_status: &str,
    ) -> Result<Obligation> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PaymentError::DatabaseError(e.to_string()))?;
        let now = Utc::now().naive_utc();

        let updated = conn.transaction::<Obligation, PaymentError, _>(|conn| {
            // Conditional update: misses when another writer moved the paid
            // amount after our read, rolling back the whole settlement.
            let affected = diesel::update(
                obligations::table
                    .filter(obligations::id.eq(&new_record.obligation_id))
                    .filter(obligations::is_deleted.eq(false))
                    .filter(obligations::paid_amount.eq(expected_paid)),
            )
            .set((
                obligations::paid_amount.eq(new_paid),
                obligations::status.eq(new_status),
                obligations::updated_at.eq(now),
            ))
            .execute(conn)?;

            if affected == 0 {
                return Err(PaymentError::ConcurrentModification(format!(
                    "Obligation {} was modified concurrently; retry the payment",
                    new_record.obligation_id
                )));
            }

            let record = PaymentRecord {
                id: new_record
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                obligation_id: new_record.obligation_id.clone(),
                amount_paid: new_record.amount_paid.clone(),
                payment_date: new_record.payment_date,
                payment_method: new_record.payment_method.clone(),
                created_at: now,
            };

            diesel::insert_into(payment_records::table)
                .values(&record)
                .execute(conn)?;

            if let Some(entry_id) = &new_record.schedule_entry_id {
                let completed = diesel::update(
                    schedule_entries::table
                        .filter(schedule_entries::id.eq(entry_id))
                        .filter(schedule_entries::obligation_id.eq(&new_record.obligation_id))
                        .filter(schedule_entries::status.eq(SCHEDULE_STATUS_PENDING)),
                )
                .set((
                    schedule_entries::status.eq(SCHEDULE_STATUS_COMPLETED),
                    schedule_entries::updated_at.eq(now),
                ))
                .execute(conn)?;

                if completed == 0 {
                    return Err(PaymentError::ConcurrentModification(format!(
                        "Schedule entry {} is no longer pending",
                        entry_id
                    )));
                }
            }

            obligations::table
                .filter(obligations::id.eq(&new_record.obligation_id))
                .first::<Obligation>(conn)
                .map_err(PaymentError::from)
        })?;

        Ok(updated)
    }

    fn get_payments_by_obligation(&self, obligation_id: &str) -> Result<Vec<PaymentRecord>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PaymentError::DatabaseError(e.to_string()))?;

        Ok(payment_records::table
            .filter(payment_records::obligation_id.eq(obligation_id))
            .order(payment_records::payment_date.asc())
            .load::<PaymentRecord>(&mut conn)
            .map_err(PaymentError::from)?)
    }

    fn get_payments_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PaymentRecord>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PaymentError::DatabaseError(e.to_string()))?;

        Ok(payment_records::table
            .filter(payment_records::payment_date.ge(start))
            .filter(payment_records::payment_date.le(end))
            .order(payment_records::payment_date.asc())
            .load::<PaymentRecord>(&mut conn)
            .map_err(PaymentError::from)?)
    }
}
