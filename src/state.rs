//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, RedirectService};
use crate::infrastructure::persistence::SqliteLinkRepository;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<SqliteLinkRepository>>,
    pub redirect_service: Arc<RedirectService<SqliteLinkRepository>>,
    pub auth_service: Arc<AuthService>,
    /// Prefix for `short_url` in responses, without trailing slash.
    pub public_base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<SqliteLinkRepository>>,
        redirect_service: Arc<RedirectService<SqliteLinkRepository>>,
        auth_service: Arc<AuthService>,
        public_base_url: &str,
    ) -> Self {
        Self {
            link_service,
            redirect_service,
            auth_service,
            public_base_url: Arc::from(public_base_url.trim_end_matches('/')),
        }
    }

    /// Full public URL for a short code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_base_url, code)
    }
}
