//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use noteshare::inbound::http::session_config::SessionSettings;
use noteshare::inbound::http::state::PageDefaults;
use noteshare::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) page_defaults: PageDefaults,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            page_defaults: PageDefaults::default(),
        }
    }

    /// Attach a database connection pool; without one the server runs on
    /// in-memory fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the default page limits.
    #[must_use]
    pub fn with_page_defaults(mut self, page_defaults: PageDefaults) -> Self {
        self.page_defaults = page_defaults;
        self
    }
}
