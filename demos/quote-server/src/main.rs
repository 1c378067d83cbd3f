//! Demo quotation server
//!
//! A thin HTTP front over the engine, for local testing against the real
//! service or a mock:
//!
//!   # against production
//!   cargo run --package quote-server
//!
//!   # against a mock endpoint
//!   SSW_URL=http://localhost:9000 cargo run --package quote-server
//!
//! The engine itself stays host-agnostic; everything HTTP-specific lives
//! here.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use sswgate_core::NormalizeOptions;
use sswgate_http::{EngineOutcome, QuoteEngine, SswClient, DEFAULT_ENDPOINT};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Engine = Arc<QuoteEngine<SswClient>>;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    endpoint: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        endpoint: std::env::var("SSW_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
    })
}

async fn quote(State(engine): State<Engine>, Json(payload): Json<serde_json::Value>) -> EngineOutcome {
    engine.quote(&payload).await
}

async fn collect(
    State(engine): State<Engine>,
    Json(payload): Json<serde_json::Value>,
) -> EngineOutcome {
    engine.collect(&payload).await
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quote_server=debug,sswgate_http=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let endpoint = std::env::var("SSW_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
    tracing::info!("Forwarding quotations to {}", endpoint);

    let engine: Engine = Arc::new(QuoteEngine::with_options(
        SswClient::new(endpoint),
        NormalizeOptions::default(),
    ));

    // Build router
    let app = Router::new()
        .route("/api/cotacao", post(quote))
        .route("/api/coleta", post(collect))
        .route("/health", get(health))
        .with_state(engine)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
    tracing::info!("quote server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
