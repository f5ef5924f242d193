use std::env;
use std::time::Duration;

use tilgang_core::{AppError, AppResult, BasePath};
use tilgang_domain::PageSize;

/// Runtime configuration of the console, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub base_path: BasePath,
    pub http_timeout: Duration,
    pub http_max_attempts: u8,
    pub http_retry_backoff_ms: u64,
    pub page_size: PageSize,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("TILGANG_API_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Validation("TILGANG_API_URL is required".to_owned()))?;
        let base_path = lookup("TILGANG_BASE_PATH").unwrap_or_else(|| "/".to_owned());
        let base_path = BasePath::new(base_path).map_err(|error| {
            AppError::Validation(format!("invalid TILGANG_BASE_PATH: {error}"))
        })?;
        let http_timeout_secs = parse_var(&lookup, "TILGANG_HTTP_TIMEOUT_SECS", 15_u64)?;
        let http_max_attempts = parse_var(&lookup, "TILGANG_HTTP_MAX_ATTEMPTS", 2_u8)?;
        let http_retry_backoff_ms = parse_var(&lookup, "TILGANG_HTTP_RETRY_BACKOFF_MS", 250_u64)?;
        let page_size = parse_var(&lookup, "TILGANG_PAGE_SIZE", PageSize::default())?;

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "TILGANG_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        if http_max_attempts == 0 {
            return Err(AppError::Validation(
                "TILGANG_HTTP_MAX_ATTEMPTS must be greater than zero".to_owned(),
            ));
        }

        if http_retry_backoff_ms < 50 {
            return Err(AppError::Validation(
                "TILGANG_HTTP_RETRY_BACKOFF_MS must be at least 50".to_owned(),
            ));
        }

        Ok(Self {
            api_url,
            base_path,
            http_timeout: Duration::from_secs(http_timeout_secs),
            http_max_attempts,
            http_retry_backoff_ms,
            page_size,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
