//! The kind of entity a notification points at.

use serde::{Deserialize, Serialize};

/// Entity referenced by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// A seller's offer.
    Offer,
    /// A buyer's logistics request against an offer.
    ServiceRequest,
    /// A provider's negotiated terms for a service request.
    PrivateOffer,
    /// A provider's costed submission for a private offer.
    Proposal,
    /// Any tag this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl EntityType {
    /// Return the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "OFFER",
            Self::ServiceRequest => "SERVICE_REQUEST",
            Self::PrivateOffer => "PRIVATE_OFFER",
            Self::Proposal => "PROPOSAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
