//! # tradedesk-cache
//!
//! Read-through cache that resolves service request identifiers into
//! normalized records. The backend only offers two list endpoints (all
//! available requests, and requests by offer) with differently shaped
//! payloads; [`EntityResolutionCache`] hides both behind a single lookup
//! and keeps every record it sees so later lookups stay local.
//!
//! Storage is pluggable:
//!
//! - **memory**: unbounded map using [dashmap](https://crates.io/crates/dashmap)
//! - **bounded**: capacity-limited map using [moka](https://crates.io/crates/moka)

pub mod destination;
pub mod memory;
pub mod normalize;
pub mod provider;
pub mod resolver;
pub mod store;

pub use destination::{NOT_PROVIDED, derive_destination};
pub use resolver::{EntityResolutionCache, ResolvedServiceRequest};
pub use store::RecordStore;
