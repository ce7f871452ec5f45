//! Unread count command.

use std::sync::Arc;

use serde_json::json;

use crate::output::{self, OutputFormat};
use tradedesk_client::{HttpApiClient, NotificationApi};
use tradedesk_core::error::AppError;

/// Execute the unread command
pub async fn execute(api: Arc<HttpApiClient>, format: OutputFormat) -> Result<(), AppError> {
    let count = api.unread_count().await?;
    match format {
        OutputFormat::Table => output::print_kv("Unread", &count.to_string()),
        OutputFormat::Json => output::print_json_line(&json!({ "unread_count": count })),
    }
    Ok(())
}
