//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into registry and resolver operations
//! and formats responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, CORS, and tracing middleware
//! - [`routes`] - Route configuration for the `/api` subtree

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
