//! Display destination of a service request.

use tradedesk_entity::service_request::{Incoterm, IncotermFamily, ServiceRequestRecord};

/// Shown when a request carries no usable destination field.
pub const NOT_PROVIDED: &str = "Not provided";

/// Pick the destination text for a record based on its incoterm family.
///
/// - CFR/CIF: port of discharge, then country code.
/// - Anything else: warehouse address, then warehouse code, then country code.
///
/// Blank values are skipped. Falls back to [`NOT_PROVIDED`].
pub fn derive_destination(record: &ServiceRequestRecord) -> String {
    let candidates: [&str; 3] = match Incoterm::parse(&record.incoterm).family() {
        IncotermFamily::PortBased => [
            record.port_of_discharge.as_str(),
            record.country_code.as_str(),
            "",
        ],
        IncotermFamily::Inland => [
            record.warehouse_address.as_str(),
            record.warehouse_code.as_str(),
            record.country_code.as_str(),
        ],
    };

    candidates
        .iter()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or(NOT_PROVIDED)
        .to_string()
}
