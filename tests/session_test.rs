use std::sync::Mutex;

use chrono::Utc;
use selectify::management::{
    AuthError, REFRESH_MARGIN_SECS, TokenExchange, apply_grant, valid_bearer,
};
use selectify::types::{Session, TokenGrant};

// Fake exchange that counts refresh calls and returns a canned result
struct FakeExchange {
    calls: Mutex<u32>,
    response: Result<TokenGrant, String>,
}

impl FakeExchange {
    fn returning(grant: TokenGrant) -> Self {
        Self {
            calls: Mutex::new(0),
            response: Ok(grant),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(0),
            response: Err(message.to_string()),
        }
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl TokenExchange for FakeExchange {
    async fn refresh(&self, _refresh_token: &str) -> Result<TokenGrant, String> {
        *self.calls.lock().unwrap() += 1;
        self.response.clone()
    }
}

fn grant(access: &str, refresh: Option<&str>, expires_in: i64) -> TokenGrant {
    TokenGrant {
        access_token: access.to_string(),
        refresh_token: refresh.map(|r| r.to_string()),
        scope: None,
        expires_in,
    }
}

fn session(access: Option<&str>, refresh: Option<&str>, expires_at: Option<i64>) -> Session {
    Session {
        access_token: access.map(|a| a.to_string()),
        refresh_token: refresh.map(|r| r.to_string()),
        expires_at,
        last_search_query: None,
    }
}

#[tokio::test]
async fn test_valid_token_is_returned_unchanged() {
    let far_future = Utc::now().timestamp() + 3600;
    let mut session = session(Some("tok"), Some("ref"), Some(far_future));
    let exchange = FakeExchange::returning(grant("never-used", None, 3600));

    let bearer = valid_bearer(&mut session, &exchange, REFRESH_MARGIN_SECS)
        .await
        .unwrap();

    assert_eq!(bearer, "Bearer tok");
    assert_eq!(exchange.calls(), 0);
    assert_eq!(session.access_token.as_deref(), Some("tok"));
    assert_eq!(session.expires_at, Some(far_future));
}

#[tokio::test]
async fn test_missing_access_token_is_unauthenticated() {
    let mut session = session(None, Some("ref"), None);
    let exchange = FakeExchange::returning(grant("never-used", None, 3600));

    let err = valid_bearer(&mut session, &exchange, REFRESH_MARGIN_SECS)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Unauthenticated));
    assert_eq!(exchange.calls(), 0);
}

#[tokio::test]
async fn test_near_expiry_refreshes_exactly_once() {
    let near = Utc::now().timestamp() + 60; // inside the 300s margin
    let mut session = session(Some("old"), Some("ref"), Some(near));
    let exchange = FakeExchange::returning(grant("fresh", None, 3600));

    let bearer = valid_bearer(&mut session, &exchange, REFRESH_MARGIN_SECS)
        .await
        .unwrap();

    assert_eq!(bearer, "Bearer fresh");
    assert_eq!(exchange.calls(), 1);
    assert_eq!(session.access_token.as_deref(), Some("fresh"));
    // expiry must move strictly forward on a successful refresh
    assert!(session.expires_at.unwrap() > near);
    // no rotation in the grant, so the stored refresh token stays
    assert_eq!(session.refresh_token.as_deref(), Some("ref"));
}

#[tokio::test]
async fn test_refresh_token_rotation_is_applied() {
    let expired = Utc::now().timestamp() - 10;
    let mut session = session(Some("old"), Some("ref-1"), Some(expired));
    let exchange = FakeExchange::returning(grant("fresh", Some("ref-2"), 3600));

    valid_bearer(&mut session, &exchange, REFRESH_MARGIN_SECS)
        .await
        .unwrap();

    assert_eq!(session.refresh_token.as_deref(), Some("ref-2"));
}

#[tokio::test]
async fn test_expired_without_refresh_token_is_unauthenticated() {
    let expired = Utc::now().timestamp() - 10;
    let mut session = session(Some("old"), None, Some(expired));
    let exchange = FakeExchange::returning(grant("never-used", None, 3600));

    let err = valid_bearer(&mut session, &exchange, REFRESH_MARGIN_SECS)
        .await
        .unwrap_err();

    // renewal is impossible, which is a plain 401 — not a refresh failure
    assert!(matches!(err, AuthError::Unauthenticated));
    assert_eq!(exchange.calls(), 0);
}

#[tokio::test]
async fn test_rejected_exchange_is_refresh_failed() {
    let expired = Utc::now().timestamp() - 10;
    let mut session = session(Some("old"), Some("ref"), Some(expired));
    let exchange = FakeExchange::failing("invalid_grant");

    let err = valid_bearer(&mut session, &exchange, REFRESH_MARGIN_SECS)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::RefreshFailed(_)));
    assert_eq!(exchange.calls(), 1);
    // the failed exchange must not clobber the stored token fields
    assert_eq!(session.access_token.as_deref(), Some("old"));
    assert_eq!(session.refresh_token.as_deref(), Some("ref"));
}

#[tokio::test]
async fn test_unknown_expiry_skips_refresh() {
    let mut session = session(Some("tok"), Some("ref"), None);
    let exchange = FakeExchange::returning(grant("never-used", None, 3600));

    let bearer = valid_bearer(&mut session, &exchange, REFRESH_MARGIN_SECS)
        .await
        .unwrap();

    assert_eq!(bearer, "Bearer tok");
    assert_eq!(exchange.calls(), 0);
}

#[test]
fn test_apply_grant_sets_expiry_from_now() {
    let mut session = Session::default();
    let before = Utc::now().timestamp();

    apply_grant(&mut session, &grant("tok", Some("ref"), 3600));

    let after = Utc::now().timestamp();
    let expires_at = session.expires_at.unwrap();
    assert!(expires_at >= before + 3600);
    assert!(expires_at <= after + 3600);
    assert_eq!(session.access_token.as_deref(), Some("tok"));
    assert_eq!(session.refresh_token.as_deref(), Some("ref"));
}
