//! In-process record stores.

#[cfg(feature = "bounded")]
pub mod bounded;
#[cfg(feature = "memory")]
pub mod store;

#[cfg(feature = "bounded")]
pub use bounded::BoundedRecordStore;
#[cfg(feature = "memory")]
pub use store::MemoryRecordStore;
