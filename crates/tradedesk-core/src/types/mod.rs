//! Shared value types used at the REST boundary.

pub mod envelope;
pub mod pagination;

pub use envelope::ListPayload;
pub use pagination::PageRequest;
