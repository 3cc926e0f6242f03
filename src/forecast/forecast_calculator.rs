use chrono::{Datelike, NaiveDate};
use log::error;
use std::collections::HashMap;
use std::str::FromStr;

use crate::budgets::{BudgetItem, BudgetPaymentType};
use crate::errors::{Result, ValidationError};
use crate::forecast::forecast_model::{ForecastCategory, MonthlyForecastBucket};
use crate::obligations::{split_total, Obligation, ObligationStatus, PaymentType};
use crate::payments::PaymentRecord;
use crate::schedules::{ScheduleEntry, ScheduleStatus};
use crate::utils::time_utils::{add_months_clamped, month_key, same_month};

/// Projects future cash outflow across a rolling window of months.
///
/// Pure and deterministic: identical inputs always yield identical buckets,
/// and nothing is written. `today` anchors the window (its month is bucket
/// zero) and is always passed in, never read from the clock.
///
/// Four differently-shaped sources land on one timeline:
/// - unconverted budget items, expanded by their own payment type;
/// - pending schedule entries, in their scheduled month;
/// - open obligations, their outstanding balance in their relevant month
///   (due date, else end date, else start date);
/// - payment records, split into on-time and carried-over against the owning
///   obligation's due month.
pub fn project(
    obligations: &[Obligation],
    budget_items: &[BudgetItem],
    schedule_entries: &[ScheduleEntry],
    payment_records: &[PaymentRecord],
    today: NaiveDate,
    months_ahead: u32,
) -> Result<Vec<MonthlyForecastBucket>> {
    if months_ahead < 1 {
        return Err(ValidationError::InvalidInput(
            "months_ahead must be at least 1".to_string(),
        )
        .into());
    }

    let window_start = today.with_day(1).unwrap_or(today);
    let mut buckets: Vec<MonthlyForecastBucket> = (0..months_ahead)
        .map(|offset| MonthlyForecastBucket::new(month_key(add_months_clamped(window_start, offset))))
        .collect();
    let bucket_index: HashMap<String, usize> = buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| (bucket.month.clone(), index))
        .collect();

    let add = |buckets: &mut Vec<MonthlyForecastBucket>,
                   date: NaiveDate,
                   category: ForecastCategory,
                   source_id: &str,
                   name: &str,
                   amount: rust_decimal::Decimal| {
        if let Some(index) = bucket_index.get(&month_key(date)) {
            buckets[*index].add(category, source_id, name, amount);
        }
    };

    // (a) budget items, replaying each item's own payment-type expansion
    for item in budget_items.iter().filter(|item| !item.is_converted) {
        match BudgetPaymentType::from_str(&item.payment_type) {
            Ok(BudgetPaymentType::Single) => {
                add(
                    &mut buckets,
                    item.start_date,
                    ForecastCategory::Budget,
                    &item.id,
                    &item.name,
                    item.planned_amount_decimal(),
                );
            }
            Ok(BudgetPaymentType::Monthly) => {
                let month_count = item.month_count.unwrap_or(0).max(0) as u32;
                let monthly = item.monthly_amount_decimal();
                for offset in 0..month_count {
                    add(
                        &mut buckets,
                        add_months_clamped(item.start_date, offset),
                        ForecastCategory::Budget,
                        &item.id,
                        &item.name,
                        monthly,
                    );
                }
            }
            Ok(BudgetPaymentType::Installment) => {
                let count = item.installment_count.unwrap_or(1).max(1) as u32;
                match split_total(item.planned_amount_decimal(), count, item.start_date) {
                    Ok(periods) => {
                        for period in periods {
                            add(
                                &mut buckets,
                                period.due_date,
                                ForecastCategory::Budget,
                                &item.id,
                                &item.name,
                                period.amount,
                            );
                        }
                    }
                    Err(e) => {
                        error!("Skipping unsplittable budget item {}: {}", item.id, e);
                    }
                }
            }
            Err(e) => {
                error!("Skipping budget item {}: {}", item.id, e);
            }
        }
    }

    // (b) explicit planned settlements still pending
    for entry in schedule_entries {
        if ScheduleStatus::from_str(&entry.status) == Ok(ScheduleStatus::Pending) {
            add(
                &mut buckets,
                entry.scheduled_date,
                ForecastCategory::Scheduled,
                &entry.id,
                &entry.obligation_id,
                entry.scheduled_amount_decimal(),
            );
        }
    }

    // (c) outstanding balances of open obligations
    for obligation in obligations.iter().filter(|o| !o.is_deleted) {
        if ObligationStatus::from_str(&obligation.status) == Ok(ObligationStatus::Paid) {
            continue;
        }

        let relevant_date = obligation
            .due_date
            .or(obligation.end_date)
            .unwrap_or(obligation.start_date);
        let category = match PaymentType::from_str(&obligation.payment_type) {
            Ok(PaymentType::Recurring) => ForecastCategory::Recurring,
            _ => ForecastCategory::Estimated,
        };

        add(
            &mut buckets,
            relevant_date,
            category,
            &obligation.id,
            &obligation.name,
            obligation.remaining_amount(),
        );
    }

    // (d) settlements, split by whether they landed in their due month
    let obligation_by_id: HashMap<&str, &Obligation> = obligations
        .iter()
        .map(|obligation| (obligation.id.as_str(), obligation))
        .collect();

    for record in payment_records {
        let owner = obligation_by_id.get(record.obligation_id.as_str());

        // No explicit due date means every settlement is on time
        let on_time = owner
            .and_then(|obligation| obligation.due_date)
            .map(|due| same_month(due, record.payment_date))
            .unwrap_or(true);

        let category = if on_time {
            ForecastCategory::PaidInMonth
        } else {
            ForecastCategory::PaidCarriedOver
        };
        let name = owner
            .map(|obligation| obligation.name.as_str())
            .unwrap_or(record.obligation_id.as_str());

        add(
            &mut buckets,
            record.payment_date,
            category,
            &record.id,
            name,
            record.amount_paid_decimal(),
        );
    }

    Ok(buckets)
}
