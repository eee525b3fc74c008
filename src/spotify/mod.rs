//! # Spotify Integration Module
//!
//! This module is the outbound HTTP layer of the backend: everything that
//! leaves the process towards Spotify goes through here. It covers the two
//! external collaborators:
//!
//! - **Accounts server** ([`auth`]) - authorization-code exchange and
//!   refresh-token exchange against the token endpoint. Both grants use the
//!   confidential-client form (client id + client secret). Non-success
//!   responses are surfaced with their status and body; nothing is retried.
//! - **Web API** ([`client`]) - profile lookup, search, artist top-tracks,
//!   playlist creation/lookup and batched track appends. Responses are
//!   relayed as raw JSON: the proxy endpoints are transparent and do not
//!   reshape upstream bodies.
//!
//! ## Request discipline
//!
//! Every outbound call runs on a client with an explicit 10 second timeout;
//! the upstream imposes no other deadline. Track appends are batched at 100
//! URIs per call, which is a hard Web API constraint rather than a tuning
//! choice.
//!
//! ## Error Types
//!
//! - [`UpstreamError`] - transport failures and non-2xx upstream statuses,
//!   kept separate so handlers can attach upstream diagnostics to their
//!   error envelope.
//! - Token operations return `Result<_, String>` matching the
//!   [`crate::management::TokenExchange`] seam.

pub mod auth;
pub mod client;

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

pub use auth::SpotifyAuth;

/// Timeout applied to every outbound call.
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },
}

pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Converts a response into its JSON body, mapping non-success statuses to
/// [`UpstreamError::Status`] with the body kept for diagnostics.
pub(crate) async fn relay_json(res: reqwest::Response) -> Result<Value, UpstreamError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(res.json::<Value>().await?)
}
