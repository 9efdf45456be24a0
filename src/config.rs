use crate::constants::{
    DEFAULT_BALANCE_CACHE_TTL_SECS, DEFAULT_PENALTY_GRACE_HOURS, DEFAULT_PENALTY_RATE, DEFAULT_PORT,
    DEFAULT_REMIND_INTERVAL_HOURS,
};
use crate::core::settlement::PenaltyPolicy;
use chrono::TimeDelta;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub penalty_grace_hours: i64,
    pub penalty_rate: Decimal,
    pub remind_interval_hours: i64,
    pub balance_cache_ttl_secs: u64,
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn hours_or_default(hours: i64, default_hours: i64) -> TimeDelta {
    TimeDelta::try_hours(hours)
        .or_else(|| TimeDelta::try_hours(default_hours))
        .unwrap_or_default()
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: parsed_var("PORT").unwrap_or(DEFAULT_PORT),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            penalty_grace_hours: parsed_var("PENALTY_GRACE_HOURS").unwrap_or(DEFAULT_PENALTY_GRACE_HOURS),
            penalty_rate: parsed_var("PENALTY_RATE").unwrap_or(DEFAULT_PENALTY_RATE),
            remind_interval_hours: parsed_var("REMIND_INTERVAL_HOURS").unwrap_or(DEFAULT_REMIND_INTERVAL_HOURS),
            balance_cache_ttl_secs: parsed_var("BALANCE_CACHE_TTL_SECS").unwrap_or(DEFAULT_BALANCE_CACHE_TTL_SECS),
        }
    }

    /// Hour counts outside chrono's range fall back to the defaults.
    pub fn policy(&self) -> PenaltyPolicy {
        PenaltyPolicy {
            grace_period: hours_or_default(self.penalty_grace_hours, DEFAULT_PENALTY_GRACE_HOURS),
            penalty_rate: self.penalty_rate,
            remind_interval: hours_or_default(self.remind_interval_hours, DEFAULT_REMIND_INTERVAL_HOURS),
        }
    }

    pub fn balance_cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.balance_cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            penalty_grace_hours: DEFAULT_PENALTY_GRACE_HOURS,
            penalty_rate: DEFAULT_PENALTY_RATE,
            remind_interval_hours: DEFAULT_REMIND_INTERVAL_HOURS,
            balance_cache_ttl_secs: DEFAULT_BALANCE_CACHE_TTL_SECS,
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
