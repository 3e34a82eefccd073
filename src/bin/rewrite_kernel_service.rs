//! Rewrite Kernel Service Binary
//!
//! Runs the Rewrite Kernel as a REST API service:
//! - Structured JSON logging
//! - Request tracing with correlation IDs
//! - Graceful shutdown handling
//! - Health check endpoints
//!
//! ## Configuration
//!
//! Environment variables:
//! - `OLLAMA_URL`: Model generate endpoint (default: http://localhost:11434/api/generate)
//! - `MODEL_NAME`: Model to request (default: qwen2.5:7b)
//! - `MODEL_TIMEOUT_SECS`: Model request timeout (default: 90)
//! - `MAX_NARRATIVE_CHARS`: Narrative length limit (default: 10000)
//! - `PORT`: Service port (default: 8002)
//! - `HOST`: Service host (default: 0.0.0.0)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! OLLAMA_URL=http://localhost:11434/api/generate cargo run --bin rewrite_kernel_service --features service
//! ```

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use rewrite_kernel::service::{create_router, metrics_middleware, AppState};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8002;

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rewrite_kernel_service=info,rewrite_kernel=info,tower_http=info".into());

    if log_format == "pretty" {
        // Human-readable output for local runs
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
            )
            .init();
    } else {
        // One JSON object per line, span fields flattened in
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true)
            )
            .init();
    }
}

/// Resolve the listen address from `HOST` and `PORT`.
fn bind_address() -> Result<SocketAddr, std::net::AddrParseError> {
    let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = match std::env::var("PORT") {
        Ok(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
            warn!(value = %raw, default = DEFAULT_PORT, "invalid PORT, using default");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };
    format!("{host}:{port}").parse()
}

/// Completes on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, draining in-flight rewrites"),
        _ = terminate => info!("Received SIGTERM, draining in-flight rewrites"),
    }
}

/// Request logging middleware that adds correlation ID and timing
async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    // Reuse the caller's request id so rewrites can be joined with upstream logs
    let request_id = request
        .headers()
        .get("X-Request-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    );

    let response = next.run(request).instrument(span.clone()).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    span.record("status", status);
    span.record("latency_ms", latency_ms);

    info!(
        target: "rewrite_kernel_service::access",
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        latency_ms,
        "request completed"
    );

    response
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    info!(
        version,
        build_sha = option_env!("BUILD_SHA").unwrap_or("dev"),
        "Starting Rewrite Kernel Service"
    );

    // Model backend, timeout and input limits all come from the environment
    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "Failed to initialize model client");
        e
    })?;

    let policy = state.engine.validator().policy();
    info!(
        model_url = %state.settings.ollama_url,
        model_name = %state.settings.model_name,
        model_timeout_secs = state.settings.model_timeout.as_secs(),
        max_narrative_chars = state.settings.max_narrative_chars,
        policy_id = %policy.policy_id(),
        policy_params_hash = %policy.params_hash(),
        "Rewrite engine initialized"
    );

    // Build router with middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = bind_address()?;
    let listener = TcpListener::bind(addr).await?;
    info!(address = %addr, version, "Rewrite Kernel Service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Rewrite Kernel Service shutdown complete");
    Ok(())
}
