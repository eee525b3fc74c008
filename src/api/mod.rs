//! # API Module
//!
//! HTTP endpoints exposed to the frontend. Every handler follows the same
//! proxy pattern: resolve the caller's session from the cookie jar, obtain
//! a valid bearer header (refreshing the access token inline when it is
//! close to expiry), forward exactly one call to the Spotify Web API, and
//! relay the JSON body. Failures of any kind are rendered through
//! [`ApiError`] as a uniform `{"error": ...}` envelope; nothing is retried
//! on behalf of the client.
//!
//! ## Endpoints
//!
//! - [`auth`] - OAuth login redirect, code-exchange callback, logout and
//!   the explicit refresh endpoint
//! - [`spotify`] - profile, search and artist top-tracks proxies
//! - [`playlist`] - playlist creation (with batched track appends and
//!   selection consumption), lookup and track addition
//! - [`selections`] - the pending-picks ledger: list, latest, and the
//!   add/remove/clear/new_search action dispatch
//! - [`health`] - health check with application version
//!
//! ## Related Modules
//!
//! - [`crate::management`] - session store, token lifecycle, ledger
//! - [`crate::spotify`] - outbound API calls

pub mod auth;
mod error;
pub mod health;
pub mod playlist;
pub mod selections;
pub mod spotify;

pub use error::ApiError;
