//! Inbound frame validation.

use tradedesk_core::error::AppError;

/// Maximum accepted push frame size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 65_536;

/// Validate a raw inbound frame before parsing.
pub fn validate_inbound(raw: &str) -> Result<(), AppError> {
    if raw.len() > MAX_MESSAGE_SIZE {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {} bytes",
            MAX_MESSAGE_SIZE
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}
