//! Push channel connection lifecycle: state, backoff, URL and state machine.

pub mod backoff;
pub mod endpoint;
pub mod machine;
pub mod state;
