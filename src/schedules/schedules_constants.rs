/// Schedule entry statuses
/// Planned settlement still waiting on a payment.
pub const SCHEDULE_STATUS_PENDING: &str = "PENDING";

/// Fulfilled by an associated settlement.
pub const SCHEDULE_STATUS_COMPLETED: &str = "COMPLETED";

/// Replaced by a newer entry; kept for the audit trail, never counted again.
pub const SCHEDULE_STATUS_SUPERSEDED: &str = "SUPERSEDED";
