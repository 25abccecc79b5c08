//! Foreclosure-auction screening: listing storage seams, liquidity
//! aggregation from transaction history, the six-stage filter pipeline and
//! the HTTP surface over them.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
