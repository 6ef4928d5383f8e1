//! # showtime-api
//!
//! HTTP layer for the Showtime authentication gate built on Axum.
//!
//! Requests flow through admission control (per-client token buckets),
//! then the session gates, then the handlers in [`handlers`].

pub mod app;
pub mod carrier;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
