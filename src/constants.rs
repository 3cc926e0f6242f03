/// Amounts are tracked in whole currency units; the installment splitter
/// floors to this scale so generated periods re-sum exactly.
pub const MONEY_UNIT_SCALE: u32 = 0;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Month key format used across schedule stats and forecast buckets
pub const MONTH_KEY_FORMAT: &str = "%Y-%m";
