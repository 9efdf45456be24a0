pub mod aggregator;
pub mod derivation;
pub mod errors;
pub mod models;
pub mod reputation;
pub mod services;
pub mod settlement;
