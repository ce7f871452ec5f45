//! # tradedesk-entity
//!
//! Domain entity models for the TradeDesk client. Every struct in this
//! crate is either a value received from the REST/push APIs or the
//! canonical shape produced from one. All entities derive `Debug`,
//! `Clone`, `Serialize` and `Deserialize`.

pub mod notification;
pub mod offer;
pub mod raw;
pub mod service_request;
pub mod wire;
