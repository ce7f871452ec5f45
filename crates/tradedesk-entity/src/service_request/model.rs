//! Service request entity model.

use serde::{Deserialize, Serialize};

/// Canonical, display-ready service request.
///
/// Every text field is present; values the backend did not send are empty
/// strings. Records are immutable snapshots once cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequestRecord {
    /// Service request identifier.
    pub id: String,
    /// Offer this request was raised against.
    pub offer_id: String,
    /// Buyer who raised the request.
    pub buyer_id: String,
    /// Buyer-side incoterm code, uppercased.
    pub incoterm: String,
    /// Free-text note from the buyer.
    pub note: String,
    /// Workflow status.
    pub status: String,
    /// Port of discharge (CFR/CIF).
    pub port_of_discharge: String,
    /// Destination country code.
    pub country_code: String,
    /// Warehouse delivery address (DAP/DDP).
    pub warehouse_address: String,
    /// Warehouse code (DAP/DDP).
    pub warehouse_code: String,
    /// Contact person name.
    pub contact_name: String,
    /// Contact phone number.
    pub contact_phone: String,
    /// Contact email.
    pub contact_email: String,
    /// Creation timestamp as sent by the backend.
    pub created_at: String,
    /// Last update timestamp as sent by the backend.
    pub updated_at: String,
    /// Display destination derived from the incoterm family.
    pub destination: String,
}
