use chrono::NaiveDate;

use crate::errors::Result;
use crate::obligations::Obligation;
use crate::payments::payments_model::{NewPaymentRecord, PaymentRecord};

/// Trait for payment repository operations
pub trait PaymentRepositoryTrait: Send + Sync {
    /// Records a payment as one transaction: inserts the immutable record,
    /// applies the pre-computed paid amount and status to the obligation
    /// guarded by `expected_paid` (the compare-and-swap that closes the
    /// concurrent-overpay race), and optionally completes the associated
    /// pending schedule entry. Returns the updated obligation.
    fn record_payment(
        &self,
        new_record: &NewPaymentRecord,
        expected_paid: &str,
        new_paid: &str,
        new_status: &str,
    ) -> Result<Obligation>;

    fn get_payments_by_obligation(&self, obligation_id: &str) -> Result<Vec<PaymentRecord>>;
    fn get_payments_between(&self, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<PaymentRecord>>;
}

/// Trait for payment service operations
pub trait PaymentServiceTrait: Send + Sync {
    fn record_payment(&self, input: NewPaymentRecord) -> Result<Obligation>;
    fn get_payments(&self, obligation_id: &str) -> Result<Vec<PaymentRecord>>;
}
