//! Live notification stream command.

use std::collections::HashSet;
use std::sync::Arc;

use clap::Args;
use serde_json::json;
use tracing::{info, warn};

use super::NotificationRow;
use crate::output::{self, OutputFormat};
use tradedesk_client::HttpApiClient;
use tradedesk_core::config::AppConfig;
use tradedesk_core::error::AppError;
use tradedesk_core::types::PageRequest;
use tradedesk_realtime::{
    ConnectionState, NotificationSnapshot, NotificationStore, RealtimeNotificationClient,
    WsTransport,
};

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Number of recent notifications to load before streaming
    #[arg(long, default_value_t = 20)]
    pub limit: u32,
    /// Do not print the initial page
    #[arg(long)]
    pub quiet: bool,
}

/// Execute the watch command
pub async fn execute(
    args: &WatchArgs,
    config: &AppConfig,
    api: Arc<HttpApiClient>,
    token: String,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = Arc::new(NotificationStore::new(api.clone()));
    let client = RealtimeNotificationClient::spawn(
        &config.realtime,
        api.base_url().clone(),
        Arc::new(WsTransport::new()),
        Arc::clone(&store),
    );

    let mut updates = store.subscribe();
    let mut state = client.state();
    client.start_session(token).await?;

    let mut seen: HashSet<String> = HashSet::new();
    match store.load_list(PageRequest::new(args.limit, 0)).await {
        Ok(items) => {
            seen.extend(items.iter().map(|n| n.id.clone()));
            if !args.quiet {
                let rows: Vec<NotificationRow> = items.iter().map(NotificationRow::from).collect();
                output::print_list(&rows, format);
            }
        }
        Err(e) => warn!(error = %e, "initial notification page unavailable"),
    }
    updates.mark_unchanged();
    let mut last_unread = store.unread_count();
    print_badge(last_unread, format);

    info!("watching notifications, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                print_new(&snapshot, &mut seen, format);
                if snapshot.unread_count != last_unread {
                    last_unread = snapshot.unread_count;
                    print_badge(last_unread, format);
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *state.borrow_and_update();
                print_state(current, format);
            }
        }
    }

    client.shutdown().await;
    Ok(())
}

fn print_new(snapshot: &NotificationSnapshot, seen: &mut HashSet<String>, format: OutputFormat) {
    let fresh: Vec<NotificationRow> = snapshot
        .notifications
        .iter()
        .filter(|n| seen.insert(n.id.clone()))
        .map(NotificationRow::from)
        .collect();
    if fresh.is_empty() {
        return;
    }
    match format {
        OutputFormat::Table => output::print_list(&fresh, format),
        OutputFormat::Json => fresh.iter().for_each(output::print_json_line),
    }
}

fn print_badge(unread: u64, format: OutputFormat) {
    match format {
        OutputFormat::Table => output::print_kv("Unread", &unread.to_string()),
        OutputFormat::Json => output::print_json_line(&json!({ "unread_count": unread })),
    }
}

fn print_state(state: ConnectionState, format: OutputFormat) {
    match format {
        OutputFormat::Table => output::print_kv("Connection", state.as_str()),
        OutputFormat::Json => output::print_json_line(&json!({ "connection": state })),
    }
}
