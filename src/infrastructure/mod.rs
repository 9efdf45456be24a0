pub mod cache;
pub mod logging;
pub mod reputation;
pub mod storage;
