//! Push channel message types and parsing.

pub mod types;
pub mod validator;

pub use types::{ServerMessage, parse_push};
