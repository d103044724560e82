//! # linkvault
//!
//! A short-link registry and redirect resolver built with Axum and SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link entity, repository port, reserved codes
//! - **Application Layer** ([`application`]) - Link registry, redirect resolver, API key check
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite pool, migrations, repository
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random or caller-chosen short codes
//! - One link per destination URL (creation is idempotent)
//! - Lossless click counting on every redirect
//! - API key authentication for management endpoints
//!
//! ## Quick Start
//!
//! ```bash
//! export API_KEY="change-me"
//! export DATABASE_URL="sqlite://linkvault.db?mode=rwc"  # Optional
//!
//! # Migrations are applied on startup
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AuthService, LinkService, RedirectService};
    pub use crate::domain::entities::{Link, NewLink};
    pub use crate::domain::repositories::{CreateOutcome, LinkRepository};
    pub use crate::domain::reserved_codes::ReservedCodes;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
    pub use crate::utils::code_generator::CodeAllocation;
}
