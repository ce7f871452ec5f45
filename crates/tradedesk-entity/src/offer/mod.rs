//! Offer domain entities.

pub mod model;

pub use model::OfferRecord;
