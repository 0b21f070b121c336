pub mod config;
pub mod error;
pub mod recruitment;
pub mod telemetry;
