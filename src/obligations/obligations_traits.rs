use crate::errors::Result;
use crate::obligations::obligations_model::{
    NewObligation, Obligation, ObligationIntegratedView, ObligationUpdate,
};

/// Trait for obligation repository operations
pub trait ObligationRepositoryTrait: Send + Sync {
    fn get_obligation(&self, obligation_id: &str) -> Result<Obligation>;
    fn get_obligations(&self) -> Result<Vec<Obligation>>;
    fn insert_obligations(&self, rows: Vec<Obligation>) -> Result<Vec<Obligation>>;

    /// Applies a partial update. When the caller re-derived the status it is
    /// written in the same statement, guarded by `expected_paid` so a racing
    /// payment cannot be overwritten with a stale derivation.
    fn update_obligation(
        &self,
        obligation_id: &str,
        update: &ObligationUpdate,
        new_status: Option<String>,
        expected_paid: Option<String>,
    ) -> Result<Obligation>;

    fn soft_delete_obligation(&self, obligation_id: &str) -> Result<usize>;
}

/// Trait for obligation service operations
pub trait ObligationServiceTrait: Send + Sync {
    /// Creates an obligation; an INSTALLMENT input returns the whole
    /// pre-generated sibling group.
    fn create_obligation(&self, new_obligation: NewObligation) -> Result<Vec<Obligation>>;
    fn get_obligation(&self, obligation_id: &str) -> Result<Obligation>;
    fn get_obligations(&self) -> Result<Vec<Obligation>>;
    fn update_obligation(&self, obligation_id: &str, update: ObligationUpdate)
        -> Result<Obligation>;
    fn delete_obligation(&self, obligation_id: &str) -> Result<()>;
    fn get_integrated_view(&self, obligation_id: &str) -> Result<ObligationIntegratedView>;
}
