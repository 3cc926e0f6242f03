use log::{debug, error};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::budgets::budgets_errors::BudgetError;
use crate::budgets::budgets_model::{
    BudgetItem, BudgetItemUpdate, BudgetPaymentType, NewBudgetItem,
};
use crate::budgets::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::errors::Result;
use crate::obligations::{NewObligation, Obligation, ObligationServiceTrait, PaymentType};
use crate::utils::time_utils::add_months_clamped;

pub struct BudgetService {
    budget_repo: Arc<dyn BudgetRepositoryTrait>,
    obligation_service: Arc<dyn ObligationServiceTrait>,
}

impl BudgetService {
    pub fn new(
        budget_repo: Arc<dyn BudgetRepositoryTrait>,
        obligation_service: Arc<dyn ObligationServiceTrait>,
    ) -> Self {
        BudgetService {
            budget_repo,
            obligation_service,
        }
    }

    fn build_obligation_input(item: &BudgetItem, obligation_id: &str) -> Result<NewObligation> {
        let payment_type =
            BudgetPaymentType::from_str(&item.payment_type).map_err(BudgetError::InvalidData)?;

        let input = match payment_type {
            BudgetPaymentType::Single => NewObligation {
                id: Some(obligation_id.to_string()),
                name: item.name.clone(),
                total_amount: item.planned_amount.clone(),
                payment_type: PaymentType::Single.as_str().to_string(),
                period_count: None,
                start_date: item.start_date,
                due_date: Some(item.end_date.unwrap_or(item.start_date)),
                end_date: item.end_date,
                project_id: None,
                category_id: None,
            },
            BudgetPaymentType::Monthly => {
                let month_count = item.month_count.unwrap_or(1).max(1);
                let end_date = item
                    .end_date
                    .unwrap_or_else(|| add_months_clamped(item.start_date, month_count as u32 - 1));
                NewObligation {
                    id: Some(obligation_id.to_string()),
                    name: item.name.clone(),
                    total_amount: item.planned_amount.clone(),
                    payment_type: PaymentType::Recurring.as_str().to_string(),
                    period_count: None,
                    start_date: item.start_date,
                    due_date: None,
                    end_date: Some(end_date),
                    project_id: None,
                    category_id: None,
                }
            }
            BudgetPaymentType::Installment => NewObligation {
                // the splitter generates its own sibling ids
                id: None,
                name: item.name.clone(),
                total_amount: item.planned_amount.clone(),
                payment_type: PaymentType::Installment.as_str().to_string(),
                period_count: item.installment_count,
                start_date: item.start_date,
                due_date: None,
                end_date: None,
                project_id: None,
                category_id: None,
            },
        };

        Ok(input)
    }
}

impl BudgetServiceTrait for BudgetService {
    fn create_budget_item(&self, new_item: NewBudgetItem) -> Result<BudgetItem> {
        new_item.validate()?;
        self.budget_repo.insert_budget_item(&new_item)
    }

    fn get_budget_items(&self) -> Result<Vec<BudgetItem>> {
        self.budget_repo.get_budget_items()
    }

    fn update_budget_item(&self, item_id: &str, update: BudgetItemUpdate) -> Result<BudgetItem> {
        let item = self.budget_repo.get_budget_item(item_id)?;
        if item.is_converted {
            return Err(BudgetError::AlreadyConverted(item_id.to_string()).into());
        }
        self.budget_repo.update_budget_item(item_id, &update)
    }

    fn delete_budget_item(&self, item_id: &str) -> Result<()> {
        self.budget_repo.delete_budget_item(item_id)?;
        Ok(())
    }

    fn convert_to_obligation(&self, item_id: &str) -> Result<Vec<Obligation>> {
        let item = self.budget_repo.get_budget_item(item_id)?;
        if item.is_converted {
            return Err(BudgetError::AlreadyConverted(item_id.to_string()).into());
        }

        let obligation_id = Uuid::new_v4().to_string();
        let input = Self::build_obligation_input(&item, &obligation_id)?;

        // Claim the item before creating, so a racing conversion cannot
        // materialize the same item twice.
        self.budget_repo.mark_converted(item_id, &obligation_id)?;

        match self.obligation_service.create_obligation(input) {
            Ok(obligations) => {
                debug!(
                    "Converted budget item {} into {} obligation(s)",
                    item_id,
                    obligations.len()
                );
                Ok(obligations)
            }
            Err(e) => {
                error!(
                    "Obligation creation failed after claiming budget item {}: {}",
                    item_id, e
                );
                if let Err(revert_err) = self.budget_repo.unmark_converted(item_id) {
                    error!(
                        "Failed to release budget item {} after conversion error: {}",
                        item_id, revert_err
                    );
                }
                Err(e)
            }
        }
    }
}
