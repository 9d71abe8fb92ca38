//! Server settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `TAXON_SETS_*` environment variables over an
//! optional configuration file. Leaving the database URL unset runs the
//! server on in-memory repositories.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;

/// Error raised when a configured value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    #[error("session TTL must be positive, got {hours} hours")]
    SessionTtl { hours: i64 },
}

/// Configuration for the `taxon-sets` server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TAXON_SETS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; absent selects in-memory storage.
    pub database_url: Option<String>,
    /// Lifetime of issued bearer tokens, in hours.
    pub session_ttl_hours: Option<i64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Configured database URL with blank values treated as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn session_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let hours = self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        if hours <= 0 {
            return Err(SettingsError::SessionTtl { hours });
        }
        Ok(TimeDelta::hours(hours))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("taxon-sets")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("TAXON_SETS_BIND_ADDR", None::<String>),
            ("TAXON_SETS_DATABASE_URL", None::<String>),
            ("TAXON_SETS_SESSION_TTL_HOURS", None::<String>),
            ("TAXON_SETS_DB_MAX_CONNECTIONS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.session_ttl().expect("ttl"), TimeDelta::hours(24));
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TAXON_SETS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "TAXON_SETS_DATABASE_URL",
                Some("postgres://localhost/taxon_sets".to_owned()),
            ),
            ("TAXON_SETS_SESSION_TTL_HOURS", Some("2".to_owned())),
            ("TAXON_SETS_DB_MAX_CONNECTIONS", Some("3".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("addr").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/taxon_sets")
        );
        assert_eq!(settings.session_ttl().expect("ttl"), TimeDelta::hours(2));
        assert_eq!(settings.db_max_connections(), 3);
    }

    #[rstest]
    #[case(Some("  ".to_owned()), None)]
    #[case(Some("postgres://db".to_owned()), Some("postgres://db"))]
    fn blank_database_url_selects_memory(
        #[case] raw: Option<String>,
        #[case] expected: Option<&str>,
    ) {
        let settings = ServerSettings {
            bind_addr: None,
            database_url: raw,
            session_ttl_hours: None,
            db_max_connections: None,
        };
        assert_eq!(settings.database_url(), expected);
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let settings = ServerSettings {
            bind_addr: Some("nowhere".to_owned()),
            database_url: None,
            session_ttl_hours: Some(0),
            db_max_connections: None,
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
        assert_eq!(
            settings.session_ttl(),
            Err(SettingsError::SessionTtl { hours: 0 })
        );
    }
}
