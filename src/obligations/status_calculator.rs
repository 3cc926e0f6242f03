use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::obligations::ObligationStatus;

/// Derives an obligation's lifecycle status from its sums and due date.
///
/// This is the single source of truth: every write path that changes
/// `paid_amount` or `total_amount` re-derives through here, so status and the
/// underlying sums never disagree. A fully covered obligation is PAID even
/// past its due date.
pub fn derive_status(
    paid: Decimal,
    total: Decimal,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> ObligationStatus {
    if paid >= total {
        return ObligationStatus::Paid;
    }

    if let Some(due) = due_date {
        if due < today {
            return ObligationStatus::Overdue;
        }
    }

    if paid > Decimal::ZERO {
        ObligationStatus::Partial
    } else {
        ObligationStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TODAY: fn() -> NaiveDate = || d(2026, 6, 15);

    #[test]
    fn test_pending_when_nothing_paid_and_not_due() {
        assert_eq!(
            derive_status(dec!(0), dec!(50000), None, TODAY()),
            ObligationStatus::Pending
        );
        assert_eq!(
            derive_status(dec!(0), dec!(50000), Some(d(2026, 6, 15)), TODAY()),
            ObligationStatus::Pending
        );
        assert_eq!(
            derive_status(dec!(0), dec!(50000), Some(d(2026, 7, 1)), TODAY()),
            ObligationStatus::Pending
        );
    }

    #[test]
    fn test_overdue_past_due_date() {
        assert_eq!(
            derive_status(dec!(0), dec!(50000), Some(d(2026, 6, 14)), TODAY()),
            ObligationStatus::Overdue
        );
        // partial payment does not clear an overdue balance
        assert_eq!(
            derive_status(dec!(20000), dec!(50000), Some(d(2026, 1, 1)), TODAY()),
            ObligationStatus::Overdue
        );
    }

    #[test]
    fn test_partial_when_some_paid_and_not_due() {
        assert_eq!(
            derive_status(dec!(100), dec!(50000), None, TODAY()),
            ObligationStatus::Partial
        );
        assert_eq!(
            derive_status(dec!(49999), dec!(50000), Some(d(2026, 12, 31)), TODAY()),
            ObligationStatus::Partial
        );
    }

    #[test]
    fn test_paid_when_fully_covered() {
        assert_eq!(
            derive_status(dec!(50000), dec!(50000), None, TODAY()),
            ObligationStatus::Paid
        );
        assert_eq!(
            derive_status(dec!(60000), dec!(50000), None, TODAY()),
            ObligationStatus::Paid
        );
    }

    #[test]
    fn test_paid_takes_priority_over_overdue() {
        assert_eq!(
            derive_status(dec!(50000), dec!(50000), Some(d(2020, 1, 1)), TODAY()),
            ObligationStatus::Paid
        );
    }

    #[test]
    fn test_total_correction_can_reopen_a_paid_obligation() {
        // paid in full against the old total...
        assert_eq!(
            derive_status(dec!(50000), dec!(50000), None, TODAY()),
            ObligationStatus::Paid
        );
        // ...then the total is corrected upward with paid unchanged
        assert_eq!(
            derive_status(dec!(50000), dec!(80000), None, TODAY()),
            ObligationStatus::Partial
        );
        assert_eq!(
            derive_status(dec!(50000), dec!(80000), Some(d(2026, 1, 1)), TODAY()),
            ObligationStatus::Overdue
        );
    }
}
