//! # API Shared
//!
//! Shared utilities and definitions for the triage APIs.
//!
//! Contains:
//! - Request/response types (`types` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//! - The API-key [`AccessGate`](triage_core::AccessGate) used by the REST server and the CLI

pub mod auth;
pub mod health;
pub mod types;

pub use auth::ApiKeyGate;
pub use health::HealthService;
pub use types::*;
