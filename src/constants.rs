use rust_decimal::Decimal;

pub const TRANSACTION_RECORDED: &str = "TRANSACTION_RECORDED";
pub const TRANSACTIONS_QUERIED: &str = "TRANSACTIONS_QUERIED";
pub const BALANCES_QUERIED: &str = "BALANCES_QUERIED";
pub const EXPOSURE_QUERIED: &str = "EXPOSURE_QUERIED";
pub const PAYMENT_RECORDED: &str = "PAYMENT_RECORDED";
pub const DEBT_CLEARED: &str = "DEBT_CLEARED";
pub const PENALTIES_APPLIED: &str = "PENALTIES_APPLIED";
pub const REMINDER_SENT: &str = "REMINDER_SENT";

/// Experience awarded to the creditor for each reminder sent.
pub const REMINDER_EXPERIENCE_REWARD: i64 = 5;
/// Trust deducted from the debtor for each reminder received.
pub const REMINDER_TRUST_PENALTY: i64 = 5;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PENALTY_GRACE_HOURS: i64 = 24;
/// 5%.
pub const DEFAULT_PENALTY_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
pub const DEFAULT_REMIND_INTERVAL_HOURS: i64 = 24;
pub const DEFAULT_BALANCE_CACHE_TTL_SECS: u64 = 3600;
