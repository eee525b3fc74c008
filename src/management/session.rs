use std::{collections::HashMap, future::Future, sync::Arc};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::types::{Session, TokenGrant};

/// Safety window before actual expiry within which a refresh is triggered,
/// absorbing clock skew and outbound-call latency.
pub const REFRESH_MARGIN_SECS: i64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No access token, or an expired token that cannot be renewed.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The refresh exchange was attempted and rejected upstream.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
}

/// Refresh-token exchange against the authorization server.
///
/// The seam exists so the token lifecycle can be exercised with a fake
/// exchange; the production implementation is [`crate::spotify::SpotifyAuth`].
pub trait TokenExchange: Send + Sync {
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<TokenGrant, String>> + Send;
}

/// Writes a token grant into the session.
///
/// `expires_at` becomes now + `expires_in`, epoch seconds UTC. The stored
/// refresh token is replaced only when the grant rotated one.
pub fn apply_grant(session: &mut Session, grant: &TokenGrant) {
    session.access_token = Some(grant.access_token.clone());
    session.expires_at = Some(Utc::now().timestamp() + grant.expires_in);
    if let Some(rotated) = &grant.refresh_token {
        session.refresh_token = Some(rotated.clone());
    }
}

/// Returns a `Bearer ...` header value for the session, refreshing the
/// access token inline when it is within `margin_secs` of expiry.
///
/// A session without an access token fails `Unauthenticated` without any
/// outbound call; so does a near-expiry session without a refresh token
/// (the token cannot be renewed). A rejected exchange fails `RefreshFailed`.
/// Neither is retried here; the browser must re-run the authorization flow.
pub async fn valid_bearer<E: TokenExchange>(
    session: &mut Session,
    exchange: &E,
    margin_secs: i64,
) -> Result<String, AuthError> {
    let Some(access_token) = session.access_token.clone() else {
        return Err(AuthError::Unauthenticated);
    };

    if let Some(expires_at) = session.expires_at {
        if Utc::now().timestamp() > expires_at - margin_secs {
            let Some(refresh_token) = session.refresh_token.clone() else {
                return Err(AuthError::Unauthenticated);
            };

            let grant = exchange
                .refresh(&refresh_token)
                .await
                .map_err(AuthError::RefreshFailed)?;
            apply_grant(session, &grant);
            return Ok(format!("Bearer {}", grant.access_token));
        }
    }

    Ok(format!("Bearer {}", access_token))
}

/// Keyed store of server-held sessions.
///
/// Each session is handed out as `Arc<Mutex<Session>>`; callers hold that
/// lock across the read-expiry, refresh, write-back sequence, so two
/// concurrent requests for the same session cannot both refresh and race on
/// the stored refresh token.
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.lock().await.get(id).cloned()
    }

    pub async fn insert(&self, id: String, session: Session) {
        self.sessions
            .lock()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
    }

    /// Destroys a session. All token fields go away together; there is no
    /// partial clear.
    pub async fn remove(&self, id: &str) {
        self.sessions.lock().await.remove(id);
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
