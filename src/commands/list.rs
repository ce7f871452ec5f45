//! Notification listing command.

use std::sync::Arc;

use clap::Args;

use super::NotificationRow;
use crate::output::{self, OutputFormat};
use tradedesk_client::HttpApiClient;
use tradedesk_core::error::AppError;
use tradedesk_core::types::PageRequest;
use tradedesk_realtime::NotificationStore;

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page size
    #[arg(long, default_value_t = 20)]
    pub limit: u32,
    /// Page offset
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
    /// Only show unread notifications
    #[arg(long)]
    pub unread: bool,
}

/// Execute the list command
pub async fn execute(
    args: &ListArgs,
    api: Arc<HttpApiClient>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = NotificationStore::new(api);
    store
        .load_list(PageRequest::new(args.limit, args.offset))
        .await?;

    let rows: Vec<NotificationRow> = store
        .notifications()
        .iter()
        .filter(|n| !args.unread || n.is_unread())
        .map(NotificationRow::from)
        .collect();
    output::print_list(&rows, format);
    Ok(())
}
