//! Mapping of raw list payloads onto canonical records.
//!
//! Both service request endpoints (and several backend versions) spell the
//! same field differently. Each canonical field lists its accepted spellings
//! in priority order; the first non-null value wins. Anything missing
//! becomes an empty string.

use serde_json::Value;
use tracing::debug;

use tradedesk_entity::offer::OfferRecord;
use tradedesk_entity::raw::RawRecord;
use tradedesk_entity::service_request::ServiceRequestRecord;
use tradedesk_entity::wire::scalar_text;

use crate::destination::derive_destination;

const SR_ID: &[&str] = &["id", "service_request_id", "request_id", "serviceRequestId"];
const SR_OFFER_ID: &[&str] = &["offer_id", "offerId", "related_offer_id", "offer"];
const SR_BUYER_ID: &[&str] = &["buyer_id", "buyerId", "buyer", "user_id"];
const SR_INCOTERM: &[&str] = &["buyer_incoterm", "incoterm_buyer", "incoterm", "incoterms"];
const SR_NOTE: &[&str] = &["note", "notes", "buyer_note", "message"];
const SR_STATUS: &[&str] = &["status", "request_status"];
const SR_PORT: &[&str] = &[
    "port_of_discharge",
    "pod",
    "discharge_port",
    "destination_port",
];
const SR_COUNTRY: &[&str] = &["country_code", "destination_country_code", "country"];
const SR_WAREHOUSE_ADDRESS: &[&str] = &["warehouse_address", "delivery_address", "warehouse_addr"];
const SR_WAREHOUSE_CODE: &[&str] = &["warehouse_code", "warehouse_id"];
const SR_CONTACT_NAME: &[&str] = &["contact_name", "contact_person", "contactName"];
const SR_CONTACT_PHONE: &[&str] = &["contact_phone", "contact_number", "phone"];
const SR_CONTACT_EMAIL: &[&str] = &["contact_email", "email"];
const CREATED_AT: &[&str] = &["created_at", "createdAt", "created"];
const UPDATED_AT: &[&str] = &["updated_at", "updatedAt", "updated"];

const OFFER_ID: &[&str] = &["id", "offer_id", "offerId"];
const OFFER_TITLE: &[&str] = &["title", "product_name", "name"];
const OFFER_SELLER_ID: &[&str] = &["seller_id", "sellerId", "seller", "user_id"];
const OFFER_INCOTERM: &[&str] = &["incoterm", "seller_incoterm", "incoterms"];
const OFFER_QUANTITY: &[&str] = &["quantity", "qty"];
const OFFER_PRICE: &[&str] = &["price", "unit_price"];
const OFFER_CURRENCY: &[&str] = &["currency", "currency_code"];
const OFFER_STATUS: &[&str] = &["status", "offer_status"];

/// Text of the first present alias.
///
/// A nested object (e.g. `"offer": {"id": 5}`) contributes its `id`.
fn text(raw: &RawRecord, keys: &[&str]) -> String {
    let Some(value) = raw.first_of(keys) else {
        return String::new();
    };
    match value {
        Value::Object(map) => map.get("id").and_then(scalar_text).unwrap_or_default(),
        other => scalar_text(other).unwrap_or_default(),
    }
}

/// Normalize one raw service request.
///
/// Returns `None` when no identifier can be found, since such a record
/// cannot be cached.
pub fn normalize_service_request(raw: &RawRecord) -> Option<ServiceRequestRecord> {
    let id = text(raw, SR_ID);
    if id.is_empty() {
        debug!("skipping service request without identifier");
        return None;
    }

    let mut record = ServiceRequestRecord {
        id,
        offer_id: text(raw, SR_OFFER_ID),
        buyer_id: text(raw, SR_BUYER_ID),
        incoterm: text(raw, SR_INCOTERM).trim().to_uppercase(),
        note: text(raw, SR_NOTE),
        status: text(raw, SR_STATUS),
        port_of_discharge: text(raw, SR_PORT),
        country_code: text(raw, SR_COUNTRY),
        warehouse_address: text(raw, SR_WAREHOUSE_ADDRESS),
        warehouse_code: text(raw, SR_WAREHOUSE_CODE),
        contact_name: text(raw, SR_CONTACT_NAME),
        contact_phone: text(raw, SR_CONTACT_PHONE),
        contact_email: text(raw, SR_CONTACT_EMAIL),
        created_at: text(raw, CREATED_AT),
        updated_at: text(raw, UPDATED_AT),
        destination: String::new(),
    };
    record.destination = derive_destination(&record);
    Some(record)
}

/// Normalize a batch, dropping records without an identifier.
pub fn normalize_service_requests<'a>(
    raws: impl IntoIterator<Item = &'a RawRecord>,
) -> Vec<ServiceRequestRecord> {
    raws.into_iter()
        .filter_map(normalize_service_request)
        .collect()
}

/// Normalize one raw offer.
pub fn normalize_offer(raw: &RawRecord) -> Option<OfferRecord> {
    let id = text(raw, OFFER_ID);
    if id.is_empty() {
        debug!("skipping offer without identifier");
        return None;
    }

    Some(OfferRecord {
        id,
        title: text(raw, OFFER_TITLE),
        seller_id: text(raw, OFFER_SELLER_ID),
        incoterm: text(raw, OFFER_INCOTERM).trim().to_uppercase(),
        quantity: text(raw, OFFER_QUANTITY),
        price: text(raw, OFFER_PRICE),
        currency: text(raw, OFFER_CURRENCY),
        status: text(raw, OFFER_STATUS),
        created_at: text(raw, CREATED_AT),
    })
}
