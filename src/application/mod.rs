//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link registry: create, list, look up, delete
//! - [`services::redirect_service::RedirectService`] - Public resolution with click counting
//! - [`services::auth_service::AuthService`] - API key authentication

pub mod services;
