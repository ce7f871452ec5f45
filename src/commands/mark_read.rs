//! Mark-read command.

use std::collections::HashSet;
use std::sync::Arc;

use clap::Args;
use serde_json::json;

use crate::output::{self, OutputFormat};
use tradedesk_client::{HttpApiClient, NotificationApi};
use tradedesk_core::error::AppError;
use tradedesk_core::types::PageRequest;
use tradedesk_realtime::NotificationStore;

/// Arguments for the mark-read command
#[derive(Debug, Args)]
pub struct MarkReadArgs {
    /// Notification IDs
    #[arg(required_unless_present = "all")]
    pub ids: Vec<String>,
    /// Mark every unread notification in the latest page
    #[arg(long, conflicts_with = "ids")]
    pub all: bool,
    /// Page size used to look up the current read state
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

/// Execute the mark-read command
pub async fn execute(
    args: &MarkReadArgs,
    api: Arc<HttpApiClient>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = NotificationStore::new(api.clone());
    store.load_list(PageRequest::new(args.limit, 0)).await?;
    store.refresh_unread_count().await;

    let ids = if args.all {
        store.unread_ids()
    } else {
        args.ids.clone()
    };
    if ids.is_empty() {
        output::print_warning("Nothing to mark as read");
        return Ok(());
    }

    let unread: HashSet<String> = store.unread_ids().into_iter().collect();
    if ids.iter().any(|id| unread.contains(id)) {
        store.mark_as_read(&ids).await?;
    } else {
        // The store would send this in the background; wait for it here.
        api.mark_read(&ids).await?;
    }

    match format {
        OutputFormat::Table => {
            output::print_success(&format!("Marked {} notification(s) as read", ids.len()));
            output::print_kv("Unread", &store.unread_count().to_string());
        }
        OutputFormat::Json => output::print_json_line(&json!({
            "marked": ids,
            "unread_count": store.unread_count(),
        })),
    }
    Ok(())
}
