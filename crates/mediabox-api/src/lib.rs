//! Mediabox API Library
//!
//! This crate provides the HTTP handlers, the media service, authentication
//! and application setup.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod services;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::media::MediaService;
pub use state::AppState;
