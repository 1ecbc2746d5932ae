//! API server configuration.

use chapel_core::auth::AuthError;
use chapel_core::auth::config::AuthConfig;

/// Origin allowed when `CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8001").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Token signing settings.
    pub auth: AuthConfig,
    /// Browser origins allowed to call the API.
    pub cors_origins: Vec<String>,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable       | Default                             |
    /// |----------------|-------------------------------------|
    /// | `BIND_ADDR`    | `0.0.0.0:8001`                      |
    /// | `DATABASE_URL` | `postgres://localhost:5432/chapel`  |
    /// | `CORS_ORIGINS` | `http://localhost:3000`             |
    /// | `JWT_*`        | see [`AuthConfig::from_env`]        |
    pub fn from_env() -> Result<Self, AuthError> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8001".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/chapel".into()),
            auth: AuthConfig::from_env()?,
            cors_origins: parse_origins(std::env::var("CORS_ORIGINS").ok().as_deref()),
        })
    }
}

/// Split a comma-separated origin list, falling back to the default origin.
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() {
        vec![DEFAULT_CORS_ORIGIN.to_string()]
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_default_when_unset_or_blank() {
        assert_eq!(parse_origins(None), vec![DEFAULT_CORS_ORIGIN]);
        assert_eq!(parse_origins(Some(" , ")), vec![DEFAULT_CORS_ORIGIN]);
    }

    #[test]
    fn origins_are_trimmed() {
        assert_eq!(
            parse_origins(Some("https://a.org, https://b.org ")),
            vec!["https://a.org", "https://b.org"]
        );
    }
}
