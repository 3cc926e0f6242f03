use chrono::Utc;
use log::debug;
use std::sync::Arc;

use crate::errors::Result;
use crate::obligations::{derive_status, Obligation, ObligationRepositoryTrait};
use crate::payments::payments_errors::PaymentError;
use crate::payments::payments_model::{NewPaymentRecord, PaymentRecord};
use crate::payments::payments_traits::{PaymentRepositoryTrait, PaymentServiceTrait};
use crate::utils::money;

pub struct PaymentService {
    payment_repo: Arc<dyn PaymentRepositoryTrait>,
    obligation_repo: Arc<dyn ObligationRepositoryTrait>,
}

impl PaymentService {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepositoryTrait>,
        obligation_repo: Arc<dyn ObligationRepositoryTrait>,
    ) -> Self {
        PaymentService {
            payment_repo,
            obligation_repo,
        }
    }
}

impl PaymentServiceTrait for PaymentService {
    fn record_payment(&self, input: NewPaymentRecord) -> Result<Obligation> {
        input.validate()?;

        let obligation = self.obligation_repo.get_obligation(&input.obligation_id)?;

        let amount = money::parse_amount_str(&input.amount_paid);
        let paid = obligation.paid_amount_decimal();
        let total = obligation.total_amount_decimal();

        if paid + amount > total {
            return Err(PaymentError::OverpaymentRejected {
                max_acceptable: total - paid,
            }
            .into());
        }

        let new_paid = paid + amount;
        let today = Utc::now().date_naive();
        let status = derive_status(new_paid, total, obligation.due_date, today);

        debug!(
            "Recording payment of {} against obligation {} ({} -> {})",
            amount, obligation.id, obligation.status, status.as_str()
        );

        // The repository re-checks our paid-amount read under the row lock;
        // a mismatch rolls everything back as ConcurrentModification.
        self.payment_repo.record_payment(
            &input,
            &obligation.paid_amount,
            &money::format_amount(new_paid),
            status.as_str(),
        )
    }

    fn get_payments(&self, obligation_id: &str) -> Result<Vec<PaymentRecord>> {
        self.payment_repo.get_payments_by_obligation(obligation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::obligations::{ObligationError, ObligationUpdate};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_obligation(total: &str, paid: &str, due: Option<NaiveDate>) -> Obligation {
        let now = Utc::now().naive_utc();
        Obligation {
            id: "ob-1".to_string(),
            name: "Office rent".to_string(),
            total_amount: total.to_string(),
            paid_amount: paid.to_string(),
            status: "PENDING".to_string(),
            payment_type: "SINGLE".to_string(),
            start_date: d(2026, 1, 1),
            due_date: due,
            end_date: None,
            period_no: None,
            period_count: None,
            project_id: None,
            category_id: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    // --- Mock repositories ---

    struct MockObligationRepository {
        obligation: Option<Obligation>,
    }

    impl ObligationRepositoryTrait for MockObligationRepository {
        fn get_obligation(&self, obligation_id: &str) -> Result<Obligation> {
            self.obligation.clone().ok_or_else(|| {
                ObligationError::NotFound(format!("Obligation {} not found", obligation_id))
                    .into()
            })
        }

        fn get_obligations(&self) -> Result<Vec<Obligation>> {
            Ok(self.obligation.clone().into_iter().collect())
        }

        fn insert_obligations(&self, _rows: Vec<Obligation>) -> Result<Vec<Obligation>> {
            unimplemented!("not exercised by payment tests")
        }

        fn update_obligation(
            &self,
            _obligation_id: &str,
            _update: &ObligationUpdate,
            _new_status: Option<String>,
            _expected_paid: Option<String>,
        ) -> Result<Obligation> {
            unimplemented!("not exercised by payment tests")
        }

        fn soft_delete_obligation(&self, _obligation_id: &str) -> Result<usize> {
            unimplemented!("not exercised by payment tests")
        }
    }

    #[derive(Default)]
    struct MockPaymentRepository {
        conflict: bool,
        // (expected_paid, new_paid, new_status) captured per call
        calls: Mutex<Vec<(String, String, String)>>,
    }

    impl PaymentRepositoryTrait for MockPaymentRepository {
        fn record_payment(
            &self,
            new_record: &NewPaymentRecord,
            expected_paid: &str,
            new_paid: &str,
            new_status: &str,
        ) -> Result<Obligation> {
            self.calls.lock().unwrap().push((
                expected_paid.to_string(),
                new_paid.to_string(),
                new_status.to_string(),
            ));

            if self.conflict {
                return Err(PaymentError::ConcurrentModification(
                    "stale paid amount".to_string(),
                )
                .into());
            }

            let mut obligation =
                sample_obligation("0", new_paid, None);
            obligation.id = new_record.obligation_id.clone();
            obligation.paid_amount = new_paid.to_string();
            obligation.status = new_status.to_string();
            Ok(obligation)
        }

        fn get_payments_by_obligation(&self, _obligation_id: &str) -> Result<Vec<PaymentRecord>> {
            Ok(Vec::new())
        }

        fn get_payments_between(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<PaymentRecord>> {
            Ok(Vec::new())
        }
    }

    fn new_payment(obligation_id: &str, amount: &str) -> NewPaymentRecord {
        NewPaymentRecord {
            id: None,
            obligation_id: obligation_id.to_string(),
            amount_paid: amount.to_string(),
            payment_date: d(2026, 6, 10),
            payment_method: Some("BANK_TRANSFER".to_string()),
            schedule_entry_id: None,
        }
    }

    fn service_with(
        obligation: Option<Obligation>,
        payment_repo: Arc<MockPaymentRepository>,
    ) -> PaymentService {
        PaymentService::new(
            payment_repo,
            Arc::new(MockObligationRepository { obligation }),
        )
    }

    #[test]
    fn test_overpayment_is_rejected_with_no_side_effect() {
        let payment_repo = Arc::new(MockPaymentRepository::default());
        let service = service_with(
            Some(sample_obligation("1000", "900", None)),
            payment_repo.clone(),
        );

        let result = service.record_payment(new_payment("ob-1", "200"));

        match result {
            Err(Error::Payment(PaymentError::OverpaymentRejected { max_acceptable })) => {
                assert_eq!(max_acceptable, dec!(100));
            }
            other => panic!("expected OverpaymentRejected, got {:?}", other.err()),
        }
        // nothing reached the repository
        assert!(payment_repo.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_exact_payoff_derives_paid_status() {
        let payment_repo = Arc::new(MockPaymentRepository::default());
        // overdue obligation, then settled in full
        let service = service_with(
            Some(sample_obligation("50000", "0", Some(d(2020, 1, 1)))),
            payment_repo.clone(),
        );

        let updated = service.record_payment(new_payment("ob-1", "50000")).unwrap();

        assert_eq!(updated.paid_amount, "50000");
        assert_eq!(updated.status, "PAID");

        let calls = payment_repo.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("0".to_string(), "50000".to_string(), "PAID".to_string()));
    }

    #[test]
    fn test_partial_payment_derives_partial_status() {
        let payment_repo = Arc::new(MockPaymentRepository::default());
        let service = service_with(
            Some(sample_obligation("50000", "0", None)),
            payment_repo.clone(),
        );

        let updated = service.record_payment(new_payment("ob-1", "20000")).unwrap();
        assert_eq!(updated.status, "PARTIAL");
    }

    #[test]
    fn test_non_positive_amount_is_rejected_before_any_read() {
        let payment_repo = Arc::new(MockPaymentRepository::default());
        let service = service_with(
            Some(sample_obligation("1000", "0", None)),
            payment_repo.clone(),
        );

        for amount in ["0", "-50", "", "abc"] {
            let result = service.record_payment(new_payment("ob-1", amount));
            assert!(
                matches!(
                    result,
                    Err(Error::Payment(PaymentError::InvalidData(_)))
                ),
                "amount {:?} should be invalid",
                amount
            );
        }
        assert!(payment_repo.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_obligation_is_not_found() {
        let service = service_with(None, Arc::new(MockPaymentRepository::default()));

        let result = service.record_payment(new_payment("ob-404", "100"));
        assert!(matches!(
            result,
            Err(Error::Obligation(ObligationError::NotFound(_)))
        ));
    }

    #[test]
    fn test_concurrent_modification_surfaces_to_caller() {
        let payment_repo = Arc::new(MockPaymentRepository {
            conflict: true,
            ..Default::default()
        });
        let service = service_with(
            Some(sample_obligation("1000", "0", None)),
            payment_repo,
        );

        let result = service.record_payment(new_payment("ob-1", "100"));
        assert!(matches!(
            result,
            Err(Error::Payment(PaymentError::ConcurrentModification(_)))
        ));
    }
}
