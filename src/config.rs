//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export DATABASE_URL="sqlite://linkvault.db?mode=rwc"
//! export API_KEY="change-me"
//! export PUBLIC_BASE_URL="https://sho.rt"
//! ```
//!
//! ## Required Variables
//!
//! - `API_KEY` - Shared secret for the management API
//!
//! ## Optional Variables
//!
//! - `DATABASE_URL` - SQLite database (default: `sqlite://linkvault.db?mode=rwc`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PUBLIC_BASE_URL` - Prefix for `short_url` in responses (default: `http://localhost:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CODE_LENGTH` - Generated code length (default: 6, range 4..=32)
//! - `CODE_MAX_ATTEMPTS` - Cap on generation retries (default: unbounded; `0` also means unbounded)
//! - `RESERVED_CODES` - Extra codes refused as short codes, comma-separated
//! - `CORS_ALLOWED_ORIGINS` - Browser origins, comma-separated (default: `http://localhost:3000`)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DB_CONNECT_TIMEOUT` - Pool acquire timeout in seconds (default: 30)

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::utils::code_generator::{
    CodeAllocation, DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH, MIN_CODE_LENGTH,
};

const DEFAULT_DATABASE_URL: &str = "sqlite://linkvault.db?mode=rwc";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Shared secret accepted by the management API.
    pub api_key: String,
    pub listen_addr: String,
    pub public_base_url: String,
    pub log_level: String,
    pub log_format: String,
    pub code_length: usize,
    /// `None` retries code generation until a free code is found.
    pub code_max_attempts: Option<u32>,
    /// Codes refused as short codes on top of the system route segments.
    pub reserved_codes: Vec<String>,
    pub cors_allowed_origins: Vec<String>,

    // ── Pool settings ───────────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 5).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `API_KEY` is missing or a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let api_key = env::var("API_KEY").context("API_KEY must be set")?;

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let code_length = parse_var("CODE_LENGTH")?.unwrap_or(DEFAULT_CODE_LENGTH);

        let code_max_attempts = parse_var::<u32>("CODE_MAX_ATTEMPTS")?.filter(|&n| n > 0);

        let reserved_codes = reserved_codes_from_env();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| vec![DEFAULT_PUBLIC_BASE_URL.to_string()]);

        let db_max_connections = parse_var("DB_MAX_CONNECTIONS")?.unwrap_or(5);
        let db_connect_timeout = parse_var("DB_CONNECT_TIMEOUT")?.unwrap_or(30);

        Ok(Self {
            database_url,
            api_key,
            listen_addr,
            public_base_url,
            log_level,
            log_format,
            code_length,
            code_max_attempts,
            reserved_codes,
            cors_allowed_origins,
            db_max_connections,
            db_connect_timeout,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `api_key` is empty
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `database_url` is not a SQLite URL
    /// - `public_base_url` is not an http(s) URL
    /// - `code_length` is out of range
    /// - pool settings are zero
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("API_KEY must not be empty");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            anyhow::bail!(
                "PUBLIC_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.public_base_url
            );
        }

        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.code_length) {
            anyhow::bail!(
                "CODE_LENGTH must be between {} and {}, got {}",
                MIN_CODE_LENGTH,
                MAX_CODE_LENGTH,
                self.code_length
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Code generation settings for the link service.
    pub fn code_allocation(&self) -> CodeAllocation {
        CodeAllocation {
            length: self.code_length,
            max_attempts: self.code_max_attempts,
        }
    }

    /// Pool acquire timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Public base URL: {}", self.public_base_url);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  API key: {}", mask_secret(&self.api_key));
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Code length: {}", self.code_length);

        match self.code_max_attempts {
            Some(n) => tracing::info!("  Code attempts: at most {}", n),
            None => tracing::info!("  Code attempts: unbounded"),
        }

        if !self.reserved_codes.is_empty() {
            tracing::info!("  Extra reserved codes: {}", self.reserved_codes.join(", "));
        }
        tracing::info!("  CORS origins: {}", self.cors_allowed_origins.join(", "));
    }
}

/// Parses an optional numeric environment variable.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        _ => Ok(None),
    }
}

/// Extra reserved codes from `RESERVED_CODES`, empty if unset.
pub fn reserved_codes_from_env() -> Vec<String> {
    env::var("RESERVED_CODES")
        .map(|v| split_list(&v))
        .unwrap_or_default()
}

/// Splits a comma-separated list, dropping blank entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Masks a secret for logging, keeping only its first two characters.
///
/// - `supersecret` → `su*********`
/// - `ab` → `**`
fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }

    let visible: String = secret.chars().take(2).collect();
    format!("{}{}", visible, "*".repeat(len - 2))
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 12] = [
        "DATABASE_URL",
        "API_KEY",
        "LISTEN",
        "PUBLIC_BASE_URL",
        "LOG_FORMAT",
        "CODE_LENGTH",
        "CODE_MAX_ATTEMPTS",
        "RESERVED_CODES",
        "CORS_ALLOWED_ORIGINS",
        "DB_MAX_CONNECTIONS",
        "DB_CONNECT_TIMEOUT",
        "RUST_LOG",
    ];

    fn clear_env() {
        // SAFETY: Tests touching the environment run serially via #[serial]
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    fn valid_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            api_key: "test-key".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            code_length: 6,
            code_max_attempts: None,
            reserved_codes: vec![],
            cors_allowed_origins: vec![],
            db_max_connections: 5,
            db_connect_timeout: 30,
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("supersecret"), "su*********");
        assert_eq!(mask_secret("abcd"), "****");
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" admin, ,login,"), vec!["admin", "login"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.api_key = "   ".to_string();
        assert!(config.validate().is_err());
        config.api_key = "test-key".to_string();

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.database_url = "postgres://localhost/test".to_string();
        assert!(config.validate().is_err());
        config.database_url = "sqlite://data.db".to_string();

        config.public_base_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());
        config.public_base_url = "https://sho.rt".to_string();

        config.code_length = 3;
        assert!(config.validate().is_err());
        config.code_length = 33;
        assert!(config.validate().is_err());
        config.code_length = 32;
        assert!(config.validate().is_ok());

        config.db_max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_code_allocation() {
        let mut config = valid_config();
        config.code_length = 8;
        config.code_max_attempts = Some(3);

        let allocation = config.code_allocation();

        assert_eq!(allocation.length, 8);
        assert_eq!(allocation.max_attempts, Some(3));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        unsafe {
            env::set_var("API_KEY", "k3y-value");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.public_base_url, DEFAULT_PUBLIC_BASE_URL);
        assert_eq!(config.code_length, DEFAULT_CODE_LENGTH);
        assert_eq!(config.code_max_attempts, None);
        assert!(config.reserved_codes.is_empty());
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.db_max_connections, 5);
        assert!(config.validate().is_ok());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_api_key() {
        clear_env();

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_parses_overrides() {
        clear_env();
        unsafe {
            env::set_var("API_KEY", "k3y-value");
            env::set_var("CODE_LENGTH", "8");
            env::set_var("CODE_MAX_ATTEMPTS", "0");
            env::set_var("RESERVED_CODES", "admin,login");
            env::set_var("CORS_ALLOWED_ORIGINS", "https://a.test, https://b.test");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.code_length, 8);
        // Zero means no cap
        assert_eq!(config.code_max_attempts, None);
        assert_eq!(config.reserved_codes, vec!["admin", "login"]);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.test", "https://b.test"]
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_non_numeric() {
        clear_env();
        unsafe {
            env::set_var("API_KEY", "k3y-value");
            env::set_var("CODE_LENGTH", "six");
        }

        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_reserved_codes_from_env() {
        clear_env();
        assert!(reserved_codes_from_env().is_empty());

        unsafe {
            env::set_var("RESERVED_CODES", " admin, ,login ");
        }
        assert_eq!(reserved_codes_from_env(), vec!["admin", "login"]);

        clear_env();
    }
}
