pub mod common;
pub mod error_log;
pub mod logger;
