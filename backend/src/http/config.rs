//! Server configuration read from the environment.

use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ORIGINS: &str = "http://localhost:5000";

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin; credentials are not allowed in this mode.
    Any,
    /// Exact origins or `*` wildcard patterns such as `https://*.app.github.dev`.
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list. A lone `*` means any origin.
    pub fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .collect();

        if origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }

    /// Whether `origin` is accepted.
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            CorsOrigins::Any => true,
            CorsOrigins::List(patterns) => patterns.iter().any(|p| origin_matches(p, origin)),
        }
    }
}

impl Default for CorsOrigins {
    fn default() -> Self {
        Self::parse(DEFAULT_ORIGINS)
    }
}

/// Match an origin against a pattern where each `*` spans any run of
/// characters other than `/`.
fn origin_matches(pattern: &str, origin: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = origin.strip_prefix(first) else {
        return false;
    };

    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(idx) if !rest[..idx].contains('/') => rest = &rest[idx + part.len()..],
            _ => return false,
        }
    }

    match rest.strip_suffix(last) {
        Some(wild) => !wild.contains('/'),
        None => false,
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsOrigins,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors: CorsOrigins::default(),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `CORS_ALLOWED_ORIGINS`, falling back to defaults.
    pub fn from_env() -> Result<Self, String> {
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| format!("PORT must be a valid port number, got '{}'", value))?,
            Err(_) => DEFAULT_PORT,
        };

        let cors = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|value| CorsOrigins::parse(&value))
            .unwrap_or_default();

        Ok(Self { host, port, cors })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }

    /// Build the CORS layer for these settings.
    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
                Method::HEAD,
                Method::PATCH,
            ])
            .allow_headers([
                header::ORIGIN,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ]);

        // Credentialed responses need an explicit expose list.
        match &self.cors {
            CorsOrigins::Any => layer.allow_origin(Any).expose_headers(Any),
            CorsOrigins::List(_) => {
                let origins = self.cors.clone();
                layer
                    .allow_origin(AllowOrigin::predicate(
                        move |origin: &HeaderValue, _parts| {
                            origin.to_str().map(|o| origins.allows(o)).unwrap_or(false)
                        },
                    ))
                    .expose_headers([
                        header::CONTENT_TYPE,
                        header::CONTENT_LENGTH,
                        header::CONTENT_ENCODING,
                        header::VARY,
                    ])
                    .allow_credentials(true)
            }
        }
    }
}
