use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::{
    api, config, error, info,
    management::{BestEffortMirror, HttpMirror, SelectionLedger, SessionManager},
    spotify::SpotifyAuth,
};

/// Shared state handed to every handler via `Extension`.
pub struct AppState {
    pub sessions: SessionManager,
    pub ledger: Mutex<SelectionLedger>,
    pub mirror: Option<BestEffortMirror<HttpMirror>>,
    pub auth: SpotifyAuth,
}

pub async fn start_api_server() {
    let ledger = SelectionLedger::load(SelectionLedger::default_path()).await;
    let mirror = config::selection_mirror_url().map(|url| BestEffortMirror::new(HttpMirror::new(url)));

    let state = Arc::new(AppState {
        sessions: SessionManager::new(),
        ledger: Mutex::new(ledger),
        mirror,
        auth: SpotifyAuth,
    });

    let frontend_origin = match HeaderValue::from_str(&config::frontend_url()) {
        Ok(origin) => origin,
        Err(e) => error!("Invalid frontend URL: {}", e),
    };
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    let app = Router::new()
        .route("/health", get(api::health::health))
        .route("/login", get(api::auth::login))
        .route("/callback", get(api::auth::callback))
        .route("/logout", get(api::auth::logout))
        .route("/api/spotify/refresh-token", post(api::auth::refresh_token))
        .route("/api/spotify/me", get(api::spotify::me))
        .route("/api/spotify/search", get(api::spotify::search))
        .route(
            "/api/spotify/artists/{artist_id}/top-tracks",
            get(api::spotify::top_tracks),
        )
        .route("/api/playlists/create", post(api::playlist::create))
        .route("/api/playlists/{playlist_id}", get(api::playlist::get))
        .route(
            "/api/playlists/{playlist_id}/tracks",
            put(api::playlist::add_tracks),
        )
        .route(
            "/api/selections",
            get(api::selections::list).post(api::selections::mutate),
        )
        .route("/api/selections/latest", get(api::selections::latest))
        .layer(cors)
        .layer(Extension(state));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
