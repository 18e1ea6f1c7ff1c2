//! API route handlers
//!
//! - `coffee`: the CoffeeResource CRUD handlers and image retrieval
//! - `form`: form/multipart body extraction shared by create and update
//! - `health`: liveness and readiness probes

pub mod coffee;
pub mod form;
pub mod health;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::RouteNotFound
}
