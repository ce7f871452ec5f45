//! Service request resolution command.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use tradedesk_cache::EntityResolutionCache;
use tradedesk_client::HttpApiClient;
use tradedesk_core::config::AppConfig;
use tradedesk_core::error::AppError;
use tradedesk_core::types::PageRequest;
use tradedesk_entity::service_request::ServiceRequestRecord;

/// Arguments for the resolve command
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Service request ID
    pub id: String,
    /// Offer the request belongs to, used when the global listing misses it
    #[arg(long)]
    pub offer: Option<String>,
    /// Page size of the global listing
    #[arg(long)]
    pub limit: Option<u32>,
    /// Page offset of the global listing
    #[arg(long)]
    pub offset: Option<u32>,
}

impl ResolveArgs {
    /// Explicit listing page, if either paging flag was given.
    fn listing_page(&self, default_limit: u32) -> Option<PageRequest> {
        if self.limit.is_none() && self.offset.is_none() {
            return None;
        }
        Some(PageRequest::new(
            self.limit.unwrap_or(default_limit),
            self.offset.unwrap_or(0),
        ))
    }
}

/// Service request display row
#[derive(Debug, Serialize, Tabled)]
struct ServiceRequestRow {
    /// Request ID
    id: String,
    /// Offer ID
    offer: String,
    /// Incoterm
    incoterm: String,
    /// Destination
    destination: String,
    /// Status
    status: String,
    /// Contact
    contact: String,
}

impl From<&ServiceRequestRecord> for ServiceRequestRow {
    fn from(r: &ServiceRequestRecord) -> Self {
        Self {
            id: r.id.clone(),
            offer: r.offer_id.clone(),
            incoterm: r.incoterm.clone(),
            destination: r.destination.clone(),
            status: r.status.clone(),
            contact: r.contact_name.clone(),
        }
    }
}

/// Execute the resolve command
pub async fn execute(
    args: &ResolveArgs,
    config: &AppConfig,
    api: Arc<HttpApiClient>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let cache = EntityResolutionCache::from_config(api, &config.cache)?;
    let page = args.listing_page(config.cache.default_page_limit);

    match cache
        .resolve_by_id(&args.id, args.offer.as_deref(), page)
        .await?
    {
        Some(record) => match format {
            OutputFormat::Table => {
                output::print_item(&ServiceRequestRow::from(&record), format);
                output::print_kv("Note", &record.note);
                output::print_kv("Buyer", &record.buyer_id);
            }
            OutputFormat::Json => output::print_json(&record),
        },
        None => {
            output::print_warning(&format!("Service request {} not found", args.id));
            output::print_kv("Cached", &cache.len().await.to_string());
        }
    }
    Ok(())
}
