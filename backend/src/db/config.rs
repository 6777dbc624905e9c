//! Database configuration and environment variable handling.

use std::env;
use std::fmt;

/// Configuration for connecting to Postgres.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// libpq connection string, either a URL or `key=value` pairs
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of idle connections kept in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Pool checkout timeout for health checks, in seconds
    pub health_check_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            health_check_timeout_sec: 2,
        }
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("database_url", &"<redacted>")
            .field("max_pool_size", &self.max_pool_size)
            .field("min_pool_size", &self.min_pool_size)
            .field("connection_timeout_sec", &self.connection_timeout_sec)
            .field("idle_timeout_sec", &self.idle_timeout_sec)
            .field("health_check_timeout_sec", &self.health_check_timeout_sec)
            .finish()
    }
}

/// Discrete connection parameters, as the service has always been
/// configured in container deployments.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub sslmode: String,
}

impl ConnectionParams {
    /// Render as a libpq keyword/value connection string.
    pub fn to_conninfo(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            quote_conninfo_value(&self.host),
            self.port,
            quote_conninfo_value(&self.user),
            quote_conninfo_value(&self.password),
            quote_conninfo_value(&self.database),
            quote_conninfo_value(&self.sslmode),
        )
    }

    /// Read connection parameters from the environment.
    ///
    /// # Environment Variables
    /// - `POSTGRES_HOST` (optional, default: localhost)
    /// - `POSTGRES_PORT` (optional, default: 5432)
    /// - `POSTGRES_USER` (required)
    /// - `POSTGRES_PASSWORD` (optional, default: empty)
    /// - `POSTGRES_DB` (required)
    /// - `POSTGRES_SSLMODE` (optional, default: disable)
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("POSTGRES_PORT")
            .unwrap_or_else(|_| "5432".to_string())
            .parse()
            .map_err(|_| "POSTGRES_PORT must be a valid port number".to_string())?;
        let user = env::var("POSTGRES_USER")
            .map_err(|_| "POSTGRES_USER environment variable not set".to_string())?;
        let password = env::var("POSTGRES_PASSWORD").unwrap_or_default();
        let database = env::var("POSTGRES_DB")
            .map_err(|_| "POSTGRES_DB environment variable not set".to_string())?;
        let sslmode = env::var("POSTGRES_SSLMODE").unwrap_or_else(|_| "disable".to_string());

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            sslmode,
        })
    }
}

/// Quote a conninfo value when libpq would otherwise split or unescape it.
fn quote_conninfo_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// `DATABASE_URL` (or `PG_DATABASE_URL`) wins when set; otherwise the
    /// connection string is assembled from the `POSTGRES_*` variables read by
    /// [`ConnectionParams::from_env`].
    ///
    /// # Pool Variables
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum idle connections (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    /// - `PG_HEALTH_TIMEOUT_SEC`: Health check checkout timeout in seconds (default: 2)
    pub fn from_env() -> Result<Self, String> {
        let database_url = match env::var("DATABASE_URL").or_else(|_| env::var("PG_DATABASE_URL"))
        {
            Ok(url) => url,
            Err(_) => ConnectionParams::from_env()
                .map_err(|e| format!("DATABASE_URL not set and {}", e))?
                .to_conninfo(),
        };

        let defaults = Self::default();

        let max_pool_size = env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_pool_size);

        let min_pool_size = env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.min_pool_size);

        let connection_timeout_sec = env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.connection_timeout_sec);

        let idle_timeout_sec = env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.idle_timeout_sec);

        let health_check_timeout_sec = env::var("PG_HEALTH_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.health_check_timeout_sec);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            health_check_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Create a new configuration from discrete connection parameters.
    pub fn with_params(params: &ConnectionParams) -> Self {
        Self::with_url(params.to_conninfo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParams {
        ConnectionParams {
            host: "db".to_string(),
            port: 5432,
            user: "shop".to_string(),
            password: "secret".to_string(),
            database: "shopping".to_string(),
            sslmode: "disable".to_string(),
        }
    }

    #[test]
    fn test_conninfo_plain_values() {
        assert_eq!(
            params().to_conninfo(),
            "host=db port=5432 user=shop password=secret dbname=shopping sslmode=disable"
        );
    }

    #[test]
    fn test_conninfo_quotes_special_values() {
        let mut p = params();
        p.password = "it's a \\secret".to_string();
        assert!(p
            .to_conninfo()
            .contains(r"password='it\'s a \\secret'"));
    }

    #[test]
    fn test_conninfo_quotes_empty_password() {
        let mut p = params();
        p.password = String::new();
        assert!(p.to_conninfo().contains("password='' "));
    }

    #[test]
    fn test_debug_redacts_url() {
        let config = PostgresConfig::with_params(&params());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_with_url_uses_default_pool() {
        let config = PostgresConfig::with_url("postgres://localhost/shopping");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.min_pool_size, 1);
    }

    #[test]
    fn test_health_check_timeout_shorter_than_checkout() {
        let config = PostgresConfig::default();
        assert_eq!(config.health_check_timeout_sec, 2);
        assert!(config.health_check_timeout_sec < config.connection_timeout_sec);
    }
}
