//! # mcc-mock-server
//!
//! A stand-in code generation endpoint for front-end development.
//!
//! | Route | Response |
//! |-------|----------|
//! | `POST /generate {prompt, language?}` | a random canned snippet, after a short delay |
//! | `GET /health` | `{"status": "ok", "message": "Mock API is running"}` |
//!
//! Selection is random and ignores the requested language; it is not the
//! per-language fallback table the generator uses. Set `MOCK_SEED` to make
//! the sequence reproducible.
//!
//! ```bash
//! PORT=3001 MOCK_SEED=42 cargo run -p mcc-mock-server
//! ```

pub mod config;
pub mod corpus;
pub mod routes;

use thiserror::Error;
use tracing::info;

pub use config::MockServerConfig;
pub use corpus::{MockSnippet, SnippetPicker, CORPUS};
pub use routes::{create_router, AppState, GenerateResponse, HealthResponse};

/// Build handler state from a config.
pub fn state_from_config(config: &MockServerConfig) -> AppState {
    let picker = match config.seed {
        Some(seed) => SnippetPicker::new(seed),
        None => SnippetPicker::from_entropy(),
    };
    AppState::new(picker, config.response_delay)
}

/// Bind and serve until Ctrl-C.
pub async fn run(config: MockServerConfig) -> Result<(), ServerError> {
    let state = state_from_config(&config);
    let seed = state.picker.seed();
    let app = create_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(%addr, seed, "Mock API server running");
    info!("POST to http://localhost:{}/generate with {{\"prompt\": \"your text\"}}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("Mock API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
