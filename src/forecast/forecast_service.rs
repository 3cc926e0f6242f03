use chrono::{Datelike, Utc};
use log::debug;
use std::sync::Arc;

use crate::budgets::BudgetRepositoryTrait;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::forecast::forecast_calculator::project;
use crate::forecast::forecast_model::MonthlyForecastBucket;
use crate::forecast::forecast_traits::ForecastServiceTrait;
use crate::obligations::ObligationRepositoryTrait;
use crate::payments::PaymentRepositoryTrait;
use crate::schedules::ScheduleRepositoryTrait;
use crate::utils::time_utils::add_months_clamped;

pub struct ForecastService {
    obligation_repo: Arc<dyn ObligationRepositoryTrait>,
    budget_repo: Arc<dyn BudgetRepositoryTrait>,
    schedule_repo: Arc<dyn ScheduleRepositoryTrait>,
    payment_repo: Arc<dyn PaymentRepositoryTrait>,
}

impl ForecastService {
    pub fn new(
        obligation_repo: Arc<dyn ObligationRepositoryTrait>,
        budget_repo: Arc<dyn BudgetRepositoryTrait>,
        schedule_repo: Arc<dyn ScheduleRepositoryTrait>,
        payment_repo: Arc<dyn PaymentRepositoryTrait>,
    ) -> Self {
        ForecastService {
            obligation_repo,
            budget_repo,
            schedule_repo,
            payment_repo,
        }
    }
}

impl ForecastServiceTrait for ForecastService {
    fn project_cash_flow(&self, months_ahead: u32) -> Result<Vec<MonthlyForecastBucket>> {
        debug!("Projecting cash flow {} months ahead", months_ahead);

        let today = Utc::now().date_naive();
        let window_start = today.with_day(1).unwrap_or(today);
        let window_end = add_months_clamped(window_start, months_ahead)
            .pred_opt()
            .unwrap_or(window_start);

        let obligations = self.obligation_repo.get_obligations()?;
        let budget_items = self.budget_repo.get_unconverted_items()?;
        let schedule_entries = self.schedule_repo.get_pending_entries()?;
        let payment_records = self
            .payment_repo
            .get_payments_between(window_start, window_end)?;

        let buckets = project(
            &obligations,
            &budget_items,
            &schedule_entries,
            &payment_records,
            today,
            months_ahead,
        )?;

        let rounded = buckets
            .into_iter()
            .map(|mut bucket| {
                bucket.budget = bucket.budget.round_dp(DISPLAY_DECIMAL_PRECISION);
                bucket.scheduled = bucket.scheduled.round_dp(DISPLAY_DECIMAL_PRECISION);
                bucket.estimated = bucket.estimated.round_dp(DISPLAY_DECIMAL_PRECISION);
                bucket.recurring = bucket.recurring.round_dp(DISPLAY_DECIMAL_PRECISION);
                bucket.paid_in_month = bucket.paid_in_month.round_dp(DISPLAY_DECIMAL_PRECISION);
                bucket.paid_carried_over =
                    bucket.paid_carried_over.round_dp(DISPLAY_DECIMAL_PRECISION);
                for line_item in bucket.line_items.iter_mut() {
                    line_item.amount = line_item.amount.round_dp(DISPLAY_DECIMAL_PRECISION);
                }
                bucket
            })
            .collect();

        Ok(rounded)
    }
}
