//! HTTP adapter for generated links.
//!
//! - `GET /shill/:id` - Generate a reply and 302 to the tweet composer
//! - `GET /health-check` - Liveness check

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{RedirectApiError, RedirectAppState};
pub use routes::redirect_router;
