//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::domain::repositories::UrlRepository;

#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<dyn UrlRepository>>,
    /// `host[:port]` used to render short URLs.
    pub public_addr: Arc<str>,
}

impl AppState {
    pub fn new(
        url_service: Arc<UrlService<dyn UrlRepository>>,
        public_addr: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            url_service,
            public_addr: public_addr.into(),
        }
    }

    /// Renders the public URL a code is reachable at.
    pub fn short_url(&self, code: &str) -> String {
        format!("http://{}/{}", self.public_addr, code)
    }
}
