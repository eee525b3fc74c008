use crate::{
    config,
    management::TokenExchange,
    spotify,
    types::TokenGrant,
};

/// Token-endpoint client for the confidential authorization-code flow.
///
/// Both grants present the client id and secret as form fields, the way the
/// accounts server expects them for a server-held client.
pub struct SpotifyAuth;

impl SpotifyAuth {
    /// Exchanges an authorization code for an access token.
    ///
    /// Completes the OAuth 2.0 code flow after the browser returns from the
    /// authorize URL. The code is single-use and short-lived, so the
    /// exchange happens directly in the callback handler.
    ///
    /// # Errors
    ///
    /// Returns an error string describing a transport failure, a non-success
    /// token-endpoint response (with status and body), or an unparsable
    /// grant payload.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant, String> {
        token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &config::spotify_redirect_uri()),
            ("client_id", &config::spotify_client_id()),
            ("client_secret", &config::spotify_client_secret()),
        ])
        .await
    }
}

impl TokenExchange for SpotifyAuth {
    /// Exchanges a refresh token for a fresh access token.
    ///
    /// The provider may or may not rotate the refresh token; the returned
    /// grant reflects exactly what the accounts server sent.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, String> {
        token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &config::spotify_client_id()),
            ("client_secret", &config::spotify_client_secret()),
        ])
        .await
    }
}

async fn token_request(form: &[(&str, &str)]) -> Result<TokenGrant, String> {
    let client = spotify::http_client();
    let res = client
        .post(&config::spotify_apitoken_url())
        .form(form)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(format!("token endpoint returned {}: {}", status, body));
    }

    res.json::<TokenGrant>().await.map_err(|e| e.to_string())
}
