use crate::types::{ErrorBody, HealthResponse, RespondRequest};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use solo_core::{FormatError, Reply, Responder};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Shared state for the gateway server.
#[derive(Clone)]
struct AppState {
    /// Engine shared by every request. Read-only after startup.
    responder: Arc<dyn Responder>,
}

/// The character HTTP server.
///
/// - `POST /respond` — reply to a message
/// - `POST /reset` — clear conversation state (currently a no-op)
/// - `GET /health` — health check
pub struct GatewayServer {
    responder: Arc<dyn Responder>,
    /// Bind address.
    host: String,
    port: u16,
}

impl GatewayServer {
    /// Create a new gateway server around an already-loaded engine.
    pub fn new(responder: Arc<dyn Responder>, host: &str, port: u16) -> Self {
        Self {
            responder,
            host: host.to_string(),
            port,
        }
    }

    /// Build the router without binding a socket.
    pub fn router(&self) -> Router {
        router(self.responder.clone())
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| anyhow::anyhow!("Gateway failed to bind {}: {}", addr, e))?;
        tracing::info!("Gateway listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Assemble the routes over a shared responder.
pub fn router(responder: Arc<dyn Responder>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/respond", post(respond))
        .route("/reset", post(reset))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { responder })
}

// ============================================================================
// Errors
// ============================================================================

/// Request-scoped failure, rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<FormatError> for ApiError {
    fn from(e: FormatError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Route handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// POST /respond — one reply per message.
async fn respond(
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<Reply>, ApiError> {
    let request_id = Uuid::new_v4();
    let user = req.user_id.as_deref().unwrap_or("anonymous");

    match state.responder.respond(&req.message) {
        Ok(reply) => {
            tracing::info!(%request_id, user, mood = %reply.mood, "Replied");
            Ok(Json(reply))
        }
        Err(e) => {
            tracing::error!(%request_id, user, "Failed to render reply: {}", e);
            Err(e.into())
        }
    }
}

/// POST /reset — 204 with no body.
async fn reset(State(state): State<AppState>) -> StatusCode {
    state.responder.reset();
    StatusCode::NO_CONTENT
}
