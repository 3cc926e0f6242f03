use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::budgets::budgets_errors::BudgetError;
use crate::budgets::budgets_model::{BudgetItem, BudgetItemUpdate, NewBudgetItem};
use crate::budgets::budgets_traits::BudgetRepositoryTrait;
use crate::db::get_connection;
use crate::errors::Result;
use crate::schema::budget_items;

pub struct BudgetRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl BudgetRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        BudgetRepository { pool }
    }
}

impl BudgetRepositoryTrait for BudgetRepository {
    fn insert_budget_item(&self, new_item: &NewBudgetItem) -> Result<BudgetItem> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| BudgetError::DatabaseError(e.to_string()))?;
        let now = Utc::now().naive_utc();

        let row = BudgetItem {
            id: new_item
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            budget_plan_id: new_item.budget_plan_id.clone(),
            name: new_item.name.clone(),
            planned_amount: new_item.planned_amount.clone(),
            payment_type: new_item.payment_type.clone(),
            monthly_amount: new_item.monthly_amount.clone(),
            month_count: new_item.month_count,
            installment_amount: new_item.installment_amount.clone(),
            installment_count: new_item.installment_count,
            start_date: new_item.start_date,
            end_date: new_item.end_date,
            is_converted: false,
            converted_obligation_id: None,
            created_at: now,
            updated_at: now,
        };

        Ok(diesel::insert_into(budget_items::table)
            .values(&row)
            .returning(budget_items::all_columns)
            .get_result(&mut conn)
            .map_err(BudgetError::from)?)
    }

    fn get_budget_item(&self, item_id: &str) -> Result<BudgetItem> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| BudgetError::DatabaseError(e.to_string()))?;

        budget_items::table
            .filter(budget_items::id.eq(item_id))
            .first::<BudgetItem>(&mut conn)
            .optional()
            .map_err(BudgetError::from)?
            .ok_or_else(|| {
                BudgetError::NotFound(format!("Budget item {} not found", item_id)).into()
            })
    }

    fn get_budget_items(&self) -> Result<Vec<BudgetItem>> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| BudgetError::DatabaseError(e.to_string()))?;

        Ok(budget_items::table
            .order(budget_items::start_date.asc())
            .load::<BudgetItem>(&mut conn)
            .map_err(BudgetError::from)?)
    }

    fn get_unconverted_items(&self) -> Result<Vec<BudgetItem>> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| BudgetError::DatabaseError(e.to_string()))?;

        Ok(budget_items::table
            .filter(budget_items::is_converted.eq(false))
            .order(budget_items::start_date.asc())
            .load::<BudgetItem>(&mut conn)
            .map_err(BudgetError::from)?)
    }

    fn update_budget_item(&self, item_id: &str, update: &BudgetItemUpdate) -> Result<BudgetItem> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| BudgetError::DatabaseError(e.to_string()))?;
        let now = Utc::now().naive_utc();

        let affected = diesel::update(budget_items::table.filter(budget_items::id.eq(item_id)))
            .set((update, budget_items::updated_at.eq(now)))
            .execute(&mut conn)
            .map_err(BudgetError::from)?;

        if affected == 0 {
            return Err(BudgetError::NotFound(format!("Budget item {} not found", item_id)).into());
        }

        self.get_budget_item(item_id)
    }

    fn delete_budget_item(&self, item_id: &str) -> Result<usize> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| BudgetError::DatabaseError(e.to_string()))?;

        let affected = diesel::delete(budget_items::table.filter(budget_items::id.eq(item_id)))
            .execute(&mut conn)
            .map_err(BudgetError::from)?;

        if affected == 0 {
            return Err(BudgetError::NotFound(format!("Budget item {} not found", item_id)).into());
        }

        Ok(affected)
    }

    fn mark_converted(&self, item_id: &str, obligation_id: &str) -> Result<BudgetItem> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| BudgetError::DatabaseError(e.to_string()))?;
        let now = Utc::now().naive_utc();

        let affected = diesel::update(
            budget_items::table
                .filter(budget_items::id.eq(item_id))
                .filter(budget_items::is_converted.eq(false)),
        )
        .set((
            budget_items::is_converted.eq(true),
            budget_items::converted_obligation_id.eq(obligation_id),
            budget_items::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .map_err(BudgetError::from)?;

        if affected == 0 {
            // Either missing or already converted by a racing caller
            let item = self.get_budget_item(item_id)?;
            if item.is_converted {
                return Err(BudgetError::AlreadyConverted(item_id.to_string()).into());
            }
            return Err(BudgetError::ConcurrentModification(format!(
                "Budget item {} could not be marked converted",
                item_id
            ))
            .into());
        }

        self.get_budget_item(item_id)
    }

    fn unmark_converted(&self, item_id: &str) -> Result<usize> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| BudgetError::DatabaseError(e.to_string()))?;
        let now = Utc::now().naive_utc();

        Ok(diesel::update(budget_items::table.filter(budget_items::id.eq(item_id)))
            .set((
                budget_items::is_converted.eq(false),
                budget_items::converted_obligation_id.eq(None::<String>),
                budget_items::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .map_err(BudgetError::from)?)
    }
}
