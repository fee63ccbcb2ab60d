use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
    pub search_case_sensitive: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env(&lookup);

        let database_url = env.required("DATABASE_URL")?;
        let jwt_secret = env.required("JWT_SECRET")?;
        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        let jwt_ttl_seconds: i64 = env
            .or("JWT_TTL_SECONDS", "3600")
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;

        let http_addr = env.or("HTTP_ADDR", "0.0.0.0:8080");
        let cors_origins =
            parse_cors_origins(&env.or("CORS_ORIGINS", "http://localhost:8000,http://127.0.0.1:8000"));
        let log_level = lookup("LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            database_url,
            database_max_connections: env.positive("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes: env.positive("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?,
            http_concurrency_limit: env.positive("HTTP_CONCURRENCY_LIMIT", 256)?,
            http_request_timeout_secs: env.positive("HTTP_REQUEST_TIMEOUT_SECS", 10)?,
            search_case_sensitive: parse_bool(&env.or("SEARCH_CASE_SENSITIVE", "false"))
                .context("Failed to parse SEARCH_CASE_SENSITIVE, expecting true/false")?,
        })
    }
}

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    fn required(&self, key: &str) -> Result<String> {
        let value = (self.0)(key).with_context(|| format!("{key} is required"))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(anyhow!("{key} must not be empty"));
        }
        Ok(value)
    }

    fn or(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    fn positive<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + PartialEq + Default + ToString,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let value = self
            .or(key, &default.to_string())
            .trim()
            .parse::<T>()
            .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

        if value == T::default() {
            return Err(anyhow!("{key} must be > 0"));
        }
        Ok(value)
    }
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("invalid boolean: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Settings;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn settings(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let settings = settings(&[("DATABASE_URL", "postgres://db"), ("JWT_SECRET", SECRET)])
            .expect("settings must parse");

        assert_eq!(settings.http_addr, "0.0.0.0:8080");
        assert_eq!(settings.jwt_ttl_seconds, 3600);
        assert_eq!(settings.database_max_connections, 10);
        assert_eq!(settings.http_request_body_limit_bytes, 1024 * 1024);
        assert_eq!(settings.http_concurrency_limit, 256);
        assert_eq!(settings.http_request_timeout_secs, 10);
        assert_eq!(settings.log_level, "info");
        assert!(!settings.search_case_sensitive);
        assert_eq!(
            settings.cors_origins,
            vec!["http://localhost:8000", "http://127.0.0.1:8000"]
        );
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = settings(&[("JWT_SECRET", SECRET)]).expect_err("must fail");
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let err = settings(&[("DATABASE_URL", "postgres://db"), ("JWT_SECRET", "short")])
            .expect_err("must fail");
        assert!(err.to_string().contains("32"));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = settings(&[
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", SECRET),
            ("HTTP_CONCURRENCY_LIMIT", "0"),
        ])
        .expect_err("must fail");
        assert!(err.to_string().contains("HTTP_CONCURRENCY_LIMIT"));
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = settings(&[
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", SECRET),
            ("CORS_ORIGINS", " https://a.example , ,https://b.example"),
            ("RUST_LOG", "debug"),
            ("SEARCH_CASE_SENSITIVE", "TRUE"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ])
        .expect("settings must parse");

        assert_eq!(
            settings.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(settings.log_level, "debug");
        assert!(settings.search_case_sensitive);
        assert_eq!(settings.database_max_connections, 4);
    }

    #[test]
    fn invalid_boolean_is_rejected() {
        let err = settings(&[
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", SECRET),
            ("SEARCH_CASE_SENSITIVE", "maybe"),
        ])
        .expect_err("must fail");
        assert!(err.to_string().contains("SEARCH_CASE_SENSITIVE"));
    }
}
