//! Rewrite Kernel REST Service
//!
//! Exposes the rewrite pipeline as a REST API.
//!
//! ## Endpoints
//!
//! - `POST /api/rewrite` - Rewrite a narrative through the model, with provenance
//! - `POST /api/validate` - Validate model output obtained elsewhere
//! - `GET /api/policy` - Show the active drift policy
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, record_rewrite_metrics};
pub use routes::{create_router, AppState};
pub use state::ServiceState;
