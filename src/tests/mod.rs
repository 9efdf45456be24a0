
use crate::core::services::DebtService;
use crate::core::settlement::PenaltyPolicy;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::reputation::in_memory::InMemoryReputation;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use rust_decimal_macros::dec;

pub type TestService = DebtService<InMemoryLogging, InMemoryStorage, InMemoryCache, InMemoryReputation>;

pub fn test_policy() -> PenaltyPolicy {
    PenaltyPolicy {
        grace_period: chrono::Duration::hours(24),
        penalty_rate: dec!(0.05),
        remind_interval: chrono::Duration::hours(24),
    }
}

/// Service plus handles on the adapters it shares state with.
pub fn create_test_service() -> (TestService, InMemoryStorage, InMemoryReputation) {
    let _ = env_logger::try_init();
    let storage = InMemoryStorage::new();
    let reputation = InMemoryReputation::new();
    let service = DebtService::new(
        storage.clone(),
        InMemoryLogging::new(),
        InMemoryCache::new(),
        reputation.clone(),
        test_policy(),
        std::time::Duration::from_secs(3600),
    );
    (service, storage, reputation)
}
