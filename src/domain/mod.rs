//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`reserved_codes`] - Codes that must never shadow system routes
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])
//!
//! # Redirect Flow
//!
//! 1. HTTP handler receives `GET /{code}`
//! 2. [`crate::application::services::RedirectService`] rejects reserved codes
//! 3. The click counter is incremented in the same store statement that reads the destination
//! 4. Handler answers `307 Temporary Redirect`

pub mod entities;
pub mod repositories;
pub mod reserved_codes;
