//! CLI command definitions and dispatch.

pub mod list;
pub mod mark_read;
pub mod resolve;
pub mod unread;
pub mod watch;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use tradedesk_client::HttpApiClient;
use tradedesk_core::config::AppConfig;
use tradedesk_core::error::{AppError, ErrorKind};
use tradedesk_entity::notification::Notification;

/// TradeDesk notifications and service requests from the command line
#[derive(Debug, Parser)]
#[command(name = "tradedesk", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>.toml`
    #[arg(long, default_value = "development")]
    pub env: String,

    /// Session token (overrides `api.token`)
    #[arg(long)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stream notifications until interrupted
    Watch(watch::WatchArgs),
    /// Show the unread notification count
    Unread,
    /// List notifications
    List(list::ListArgs),
    /// Mark notifications as read
    MarkRead(mark_read::MarkReadArgs),
    /// Resolve a service request identifier
    Resolve(resolve::ResolveArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, mut config: AppConfig) -> Result<(), AppError> {
        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        let token = config.api.token.clone().filter(|t| !t.is_empty()).ok_or_else(|| {
            AppError::new(
                ErrorKind::Authentication,
                "no session token; pass --token or set TRADEDESK__API__TOKEN",
            )
        })?;
        let api = Arc::new(HttpApiClient::new(&config.api)?);

        match &self.command {
            Commands::Watch(args) => watch::execute(args, &config, api, token, self.format).await,
            Commands::Unread => unread::execute(api, self.format).await,
            Commands::List(args) => list::execute(args, api, self.format).await,
            Commands::MarkRead(args) => mark_read::execute(args, api, self.format).await,
            Commands::Resolve(args) => resolve::execute(args, &config, api, self.format).await,
        }
    }
}

/// Notification display row
#[derive(Debug, serde::Serialize, tabled::Tabled)]
pub struct NotificationRow {
    /// Notification ID
    id: String,
    /// Read state
    read: String,
    /// Entity type
    entity: String,
    /// Entity ID
    entity_id: String,
    /// Title
    title: String,
    /// Created
    created: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.clone(),
            read: if n.is_unread() { "●" } else { " " }.to_string(),
            entity: n
                .entity_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            entity_id: n.entity_id.clone().unwrap_or_default(),
            title: n.title.clone(),
            created: n
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}
