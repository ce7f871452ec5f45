//! Offer entity model.

use serde::{Deserialize, Serialize};

/// Canonical offer, joined to service requests by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRecord {
    /// Offer identifier.
    pub id: String,
    /// Product or listing title.
    pub title: String,
    /// Seller who owns the offer.
    pub seller_id: String,
    /// Seller-side incoterm code, uppercased.
    pub incoterm: String,
    /// Offered quantity with unit, as display text.
    pub quantity: String,
    /// Unit price, as display text.
    pub price: String,
    /// Price currency code.
    pub currency: String,
    /// Workflow status.
    pub status: String,
    /// Creation timestamp as sent by the backend.
    pub created_at: String,
}
