/// Obligation lifecycle statuses
///
/// The status column always holds one of these values; it is re-derived from
/// the underlying sums on every write that touches them.
/// No payment recorded yet and the due date (if any) has not passed.
pub const OBLIGATION_STATUS_PENDING: &str = "PENDING";

/// Partially settled: some amount paid, balance outstanding, not past due.
pub const OBLIGATION_STATUS_PARTIAL: &str = "PARTIAL";

/// Fully settled: paid amount covers the total.
pub const OBLIGATION_STATUS_PAID: &str = "PAID";

/// Balance outstanding past the due date.
pub const OBLIGATION_STATUS_OVERDUE: &str = "OVERDUE";

/// Payment types
/// One-off amount settled in any number of partial payments.
pub const PAYMENT_TYPE_SINGLE: &str = "SINGLE";

/// One period of a pre-generated installment group.
pub const PAYMENT_TYPE_INSTALLMENT: &str = "INSTALLMENT";

/// Repeating obligation such as rent or a subscription.
pub const PAYMENT_TYPE_RECURRING: &str = "RECURRING";
