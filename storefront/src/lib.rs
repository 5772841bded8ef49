// storefront/src/lib.rs

//! The storefront application layer over `marivor_core`.
//!
//! Configuration, the application error type, shared state, the registered
//! pipelines and the handlers a transport (HTTP, CLI, tests) calls into.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod pipelines;
pub mod state;
pub mod telemetry;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, ErrorResponse};
pub use crate::state::AppState;
