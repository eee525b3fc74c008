use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension, Json,
    extract::Query,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::Mutex;

use crate::{
    api::ApiError,
    config,
    management::{self, AuthError, REFRESH_MARGIN_SECS, TokenExchange, apply_grant},
    server::AppState,
    types::{Session, TokenGrant},
    utils, warning,
};

pub const SESSION_COOKIE: &str = "selectify_session";

/// Redirects the browser to the accounts server's authorize page.
pub async fn login() -> Redirect {
    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
        auth_url = &config::spotify_apiauth_url(),
        client_id = &config::spotify_client_id(),
        redirect_uri = urlencoding::encode(&config::spotify_redirect_uri()),
        scope = urlencoding::encode(&config::spotify_scope()),
    );

    Redirect::to(&auth_url)
}

/// OAuth callback: exchanges the authorization code, creates the
/// server-side session and sends the browser on to the dashboard.
///
/// The session cookie is an opaque random id; all token material stays on
/// the server.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let code = params
        .get("code")
        .ok_or_else(|| ApiError::BadRequest("Missing authorization code".to_string()))?;

    let grant = match state.auth.exchange_code(code).await {
        Ok(grant) => grant,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return Err(ApiError::BadRequest("Failed to obtain token".to_string()));
        }
    };

    let mut session = Session::default();
    apply_grant(&mut session, &grant);

    let session_id = utils::generate_session_id();
    state.sessions.insert(session_id.clone(), session).await;

    let jar = jar.add(session_cookie(&session_id));
    let dashboard = format!("{}/dashboard", config::frontend_url());
    Ok((jar, Redirect::to(&dashboard)))
}

/// Destroys the session. All three token fields disappear together with
/// it; there is no partial logout.
pub async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value()).await;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Redirect::to(&config::frontend_url()))
}

/// Explicit refresh endpoint for the frontend.
///
/// Performs the refresh exchange, updates the session in place, and relays
/// the grant. A session without a refresh token (or a rejected exchange)
/// is a 401 — the browser must re-authorize.
pub async fn refresh_token(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<TokenGrant>, ApiError> {
    let session = current_session(&state, &jar)
        .await
        .ok_or(ApiError::Unauthenticated)?;
    let mut session = session.lock().await;

    let refresh_token = session
        .refresh_token
        .clone()
        .ok_or(ApiError::Unauthenticated)?;

    let grant = state
        .auth
        .refresh(&refresh_token)
        .await
        .map_err(|e| ApiError::from(AuthError::RefreshFailed(e)))?;
    apply_grant(&mut session, &grant);

    Ok(Json(grant))
}

/// Looks up the caller's session from the cookie jar.
pub(crate) async fn current_session(
    state: &AppState,
    jar: &CookieJar,
) -> Option<Arc<Mutex<Session>>> {
    let cookie = jar.get(SESSION_COOKIE)?;
    state.sessions.get(cookie.value()).await
}

/// Produces the `Authorization` header for a proxied call, refreshing the
/// access token first when needed.
///
/// The per-session lock is held across the whole check-refresh-store
/// sequence so concurrent requests cannot interleave their refreshes.
pub(crate) async fn bearer_for(state: &AppState, jar: &CookieJar) -> Result<String, ApiError> {
    let session = current_session(state, jar)
        .await
        .ok_or(ApiError::Unauthenticated)?;
    let mut session = session.lock().await;

    let bearer = management::valid_bearer(&mut session, &state.auth, REFRESH_MARGIN_SECS).await?;
    Ok(bearer)
}

fn session_cookie(session_id: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}
