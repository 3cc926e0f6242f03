use crate::budgets::budgets_model::{BudgetItem, BudgetItemUpdate, NewBudgetItem};
use crate::errors::Result;
use crate::obligations::Obligation;

/// Trait for budget repository operations
pub trait BudgetRepositoryTrait: Send + Sync {
    fn insert_budget_item(&self, new_item: &NewBudgetItem) -> Result<BudgetItem>;
    fn get_budget_item(&self, item_id: &str) -> Result<BudgetItem>;
    fn get_budget_items(&self) -> Result<Vec<BudgetItem>>;
    fn get_unconverted_items(&self) -> Result<Vec<BudgetItem>>;
    fn update_budget_item(&self, item_id: &str, update: &BudgetItemUpdate) -> Result<BudgetItem>;
    fn delete_budget_item(&self, item_id: &str) -> Result<usize>;

    /// Flips `is_converted` guarded on it still being false, so an item can
    /// only materialize once.
    fn mark_converted(&self, item_id: &str, obligation_id: &str) -> Result<BudgetItem>;
    fn unmark_converted(&self, item_id: &str) -> Result<usize>;
}

/// Trait for budget service operations
pub trait BudgetServiceTrait: Send + Sync {
    fn create_budget_item(&self, new_item: NewBudgetItem) -> Result<BudgetItem>;
    fn get_budget_items(&self) -> Result<Vec<BudgetItem>>;
    fn update_budget_item(&self, item_id: &str, update: BudgetItemUpdate) -> Result<BudgetItem>;
    fn delete_budget_item(&self, item_id: &str) -> Result<()>;

    /// Materializes a budget item into one or more real obligations and
    /// excludes it from future projections.
    fn convert_to_obligation(&self, item_id: &str) -> Result<Vec<Obligation>>;
}
