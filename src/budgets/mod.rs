pub mod budgets_errors;
pub mod budgets_model;
pub mod budgets_repository;
pub mod budgets_service;
pub mod budgets_traits;

pub use budgets_errors::BudgetError;
pub use budgets_model::{
    BudgetItem, BudgetItemUpdate, BudgetPaymentType, NewBudgetItem,
    BUDGET_PAYMENT_TYPE_INSTALLMENT, BUDGET_PAYMENT_TYPE_MONTHLY, BUDGET_PAYMENT_TYPE_SINGLE,
};
pub use budgets_repository::BudgetRepository;
pub use budgets_service::BudgetService;
pub use budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
