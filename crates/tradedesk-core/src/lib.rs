//! # tradedesk-core
//!
//! Core crate for the TradeDesk client. Contains configuration schemas,
//! the unified error system, pagination parameters and the list-envelope
//! type used at the REST boundary.
//!
//! This crate has **no** internal dependencies on other TradeDesk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
