//! Push channel URL derived from the REST base address.

use url::Url;

use tradedesk_core::error::AppError;
use tradedesk_core::result::AppResult;

/// Derive the notifications push URL.
///
/// `http` becomes `ws` and `https` becomes `wss`; the path is replaced by
/// `path`, any query/fragment is dropped, and the bearer token is appended
/// as the `token` query parameter (URL-encoded).
pub fn push_channel_url(api_base: &Url, path: &str, token: &str) -> AppResult<Url> {
    let scheme = match api_base.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(AppError::configuration(format!(
                "cannot derive push channel from '{other}' base URL"
            )));
        }
    };

    let mut url = api_base.clone();
    url.set_scheme(scheme)
        .map_err(|_| AppError::configuration(format!("cannot switch base URL to {scheme}")))?;
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}
