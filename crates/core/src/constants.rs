/// Trading days used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Calendar days used to annualize returns
pub const DAYS_PER_YEAR: u32 = 365;

/// Maximum number of reference indices in a benchmark set
pub const MAX_BENCHMARKS: usize = 5;

/// Reference indices used when the caller does not name any
pub const DEFAULT_BENCHMARKS: [&str; MAX_BENCHMARKS] =
    ["RUPCI", "RUPMI", "RUPAI", "IMOEX", "RUCBTR3A3YNS"];

/// Growth is suppressed on days whose value, in whole thousands, exceeds this
pub const DEFAULT_SUPPRESSION_THRESHOLD_THOUSANDS: i64 = 10;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
