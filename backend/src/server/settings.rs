//! Server settings loaded via OrthoConfig.
//!
//! Values layer from defaults, an optional config file, `NOTESHARE_*`
//! environment variables and CLI flags.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use noteshare::inbound::http::session_config::SessionToggles;
use noteshare::inbound::http::state::PageDefaults;
use noteshare::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Configuration values for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NOTESHARE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; fixtures are used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Default `limit` for plain listings.
    pub list_limit: Option<u32>,
    /// Default `limit` for name searches.
    pub search_limit: Option<u32>,
    /// Path of the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Whether the session cookie carries the `Secure` flag.
    pub session_cookie_secure: Option<String>,
    /// `SameSite` policy for the session cookie.
    pub session_same_site: Option<String>,
    /// Permit a generated key when the key file is missing.
    pub session_allow_ephemeral: Option<String>,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Pool configuration when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let config = PoolConfig::new(url);
        Some(match self.pool_max_size {
            Some(size) => config.with_max_size(size),
            None => config,
        })
    }

    /// Default page limits, with zero values ignored.
    pub fn page_defaults(&self) -> PageDefaults {
        let defaults = PageDefaults::default();
        PageDefaults {
            list: self
                .list_limit
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.list),
            search: self
                .search_limit
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.search),
        }
    }

    /// Raw session toggles for validation.
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure.clone(),
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral.clone(),
        }
    }
}
