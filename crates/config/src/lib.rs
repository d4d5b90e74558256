//! Configuration loading and validation.
//!
//! Settings are layered with [`figment`], lowest precedence first:
//! 1. built-in defaults,
//! 2. an optional TOML file (keys are the lower-cased variable names),
//! 3. environment variables (`DB_HOST`, `NASA_API_KEY`, ...), read verbatim.
//!
//! The merged result is validated once into a typed [`Config`]; anything that
//! doesn't parse is a startup error rather than a silent fallback.

mod duration;
pub mod error;
mod settings;

use crate::error::{ErrorKind, Result};
use crate::settings::{Environment, Settings};
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use std::fmt;
use std::path::{Path, PathBuf};
use chrono::NaiveTime;
use std::time::Duration;

/// Fully validated application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub worker: WorkerConfig,
    pub storage: StorageConfig,
}

/// Connection settings for the archive database.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
    /// How many times the initial connection is attempted.
    pub reconnect_attempts: u32,
    /// Pause between connection attempts.
    pub reconnect_wait: Duration,
}
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("reconnect_attempts", &self.reconnect_attempts)
            .field("reconnect_wait", &self.reconnect_wait)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}
impl ServerConfig {
    /// `host:port`, suitable for binding a listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where and how to reach the APOD feed.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Base endpoint, without the API key.
    pub api_url: String,
    pub api_key: String,
    /// Timeout for the JSON metadata request.
    pub request_timeout: Duration,
    /// Timeout for the whole image download, body included.
    pub download_timeout: Duration,
}
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("download_timeout", &self.download_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WorkerConfig {
    /// Local wall-clock time of the daily ingestion (seconds are always zero).
    pub run_at: NaiveTime,
    /// Run one ingestion immediately at startup as well.
    pub run_on_start: bool,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Staging directory for downloaded images. Stored paths are relative to
    /// this exactly as configured.
    pub directory: PathBuf,
}

impl Config {
    /// Load configuration from defaults, an optional file, and the process
    /// environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config = Self::from_figment(Self::figment(file)?)?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// The layered providers, before validation.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = file {
            if !path.is_file() {
                exn::bail!(ErrorKind::FileNotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }
        Ok(figment.merge(Environment))
    }

    /// Extract and validate a [`Config`] from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.extract().or_raise(|| ErrorKind::Load)?;
        Self::try_from(settings)
    }
}

fn invalid(key: &'static str, value: &str) -> ErrorKind {
    ErrorKind::Invalid { key, value: value.to_string() }
}

fn parse_duration(key: &'static str, value: &str) -> Result<Duration> {
    duration::parse(value).ok_or_raise(|| invalid(key, value))
}

fn parse_time_of_day(key: &'static str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").or_raise(|| invalid(key, value))
}

impl TryFrom<Settings> for Config {
    type Error = error::Error;
    fn try_from(settings: Settings) -> Result<Self> {
        let api_key = settings.nasa_api_key.ok_or_raise(|| ErrorKind::Missing("NASA_API_KEY"))?;
        if settings.nasa_api_url.trim().is_empty() {
            exn::bail!(invalid("NASA_API_URL", &settings.nasa_api_url));
        }
        if settings.storage_dir.trim().is_empty() {
            exn::bail!(invalid("STORAGE_DIR", &settings.storage_dir));
        }
        Ok(Self {
            database: DatabaseConfig {
                host: settings.db_host,
                port: settings.db_port,
                username: settings.db_username,
                password: settings.db_password,
                name: settings.db_name,
                reconnect_attempts: settings.db_reconn_retry,
                reconnect_wait: parse_duration("DB_TIME_WAIT_PER_TRY", &settings.db_time_wait_per_try)?,
            },
            server: ServerConfig { host: settings.server_host, port: settings.server_port },
            upstream: UpstreamConfig {
                api_url: settings.nasa_api_url,
                api_key,
                request_timeout: parse_duration("NASA_API_TIMEOUT", &settings.nasa_api_timeout)?,
                download_timeout: parse_duration("NASA_DOWNLOAD_TIMEOUT", &settings.nasa_download_timeout)?,
            },
            worker: WorkerConfig {
                run_at: parse_time_of_day("WORKER_RUN_TIME", &settings.worker_run_time)?,
                run_on_start: settings.run_fetching_on_start,
            },
            storage: StorageConfig { directory: PathBuf::from(settings.storage_dir) },
        })
    }
}
