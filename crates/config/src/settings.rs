//! The flat, untyped shape of the configuration as it arrives from figment.
//!
//! Keys are the lower-cased environment variable names, so the same names
//! work in a TOML file and in the environment.

use figment::value::{Dict, Map, Value};
use figment::{Error, Metadata, Profile, Provider};
use serde::{Deserialize, Serialize};

pub(crate) const KEYS: [&str; 16] = [
    "db_host",
    "db_port",
    "db_username",
    "db_password",
    "db_name",
    "db_reconn_retry",
    "db_time_wait_per_try",
    "server_host",
    "server_port",
    "nasa_api_key",
    "nasa_api_url",
    "nasa_api_timeout",
    "nasa_download_timeout",
    "worker_run_time",
    "run_fetching_on_start",
    "storage_dir",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Settings {
    #[serde(deserialize_with = "lenient::string")]
    pub db_host: String,
    #[serde(deserialize_with = "lenient::number")]
    pub db_port: u16,
    #[serde(deserialize_with = "lenient::string")]
    pub db_username: String,
    #[serde(deserialize_with = "lenient::string")]
    pub db_password: String,
    #[serde(deserialize_with = "lenient::string")]
    pub db_name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub db_reconn_retry: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub db_time_wait_per_try: String,
    #[serde(deserialize_with = "lenient::string")]
    pub server_host: String,
    #[serde(deserialize_with = "lenient::number")]
    pub server_port: u16,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub nasa_api_key: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub nasa_api_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nasa_api_timeout: String,
    #[serde(deserialize_with = "lenient::string")]
    pub nasa_download_timeout: String,
    #[serde(deserialize_with = "lenient::string")]
    pub worker_run_time: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub run_fetching_on_start: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub storage_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_username: "user".to_string(),
            db_password: "password".to_string(),
            db_name: "database".to_string(),
            db_reconn_retry: 3,
            db_time_wait_per_try: "5s".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            nasa_api_key: None,
            nasa_api_url: "https://api.nasa.gov/planetary/apod".to_string(),
            nasa_api_timeout: "30s".to_string(),
            nasa_download_timeout: "120s".to_string(),
            worker_run_time: "03:00".to_string(),
            run_fetching_on_start: true,
            storage_dir: "./storage/apod".to_string(),
        }
    }
}

/// The process environment, restricted to [`KEYS`].
///
/// Every value is handed to figment as a string, exactly as it was set, so
/// `DB_PASSWORD=007` stays `"007"`. Fields that want a number or a boolean
/// parse it themselves.
pub(crate) struct Environment;

impl Provider for Environment {
    fn metadata(&self) -> Metadata {
        Metadata::named("environment variable(s)")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let dict = KEYS
            .iter()
            .filter_map(|key| {
                let value = std::env::var(key.to_ascii_uppercase()).ok()?;
                Some((key.to_string(), Value::from(value)))
            })
            .collect();
        Ok(Profile::Default.collect(dict))
    }
}

/// A TOML file types its values; the environment never does. Accept either
/// shape and coerce it to what the field actually wants.
mod lenient {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Str(String),
    }
    impl Scalar {
        fn into_string(self) -> String {
            match self {
                Self::Bool(b) => b.to_string(),
                Self::Signed(n) => n.to_string(),
                Self::Unsigned(n) => n.to_string(),
                Self::Float(n) => n.to_string(),
                Self::Str(s) => s,
            }
        }
    }

    pub(super) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Scalar::deserialize(deserializer)?.into_string())
    }

    pub(super) fn optional_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string).filter(|s| !s.is_empty()))
    }

    pub(super) fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64> + FromStr,
    {
        let out_of_range = |n: &dyn std::fmt::Display| D::Error::custom(format!("number out of range: {n}"));
        match Scalar::deserialize(deserializer)? {
            Scalar::Unsigned(n) => T::try_from(n).map_err(|_| out_of_range(&n)),
            Scalar::Signed(n) => u64::try_from(n).ok().and_then(|n| T::try_from(n).ok()).ok_or_else(|| out_of_range(&n)),
            Scalar::Str(s) => s.trim().parse().map_err(|_| D::Error::custom(format!("invalid number: {s:?}"))),
            other => Err(D::Error::custom(format!("invalid number: {:?}", other.into_string()))),
        }
    }

    // 1/t/T/true/TRUE/True and their negatives.
    pub(super) fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Scalar::deserialize(deserializer)? {
            Scalar::Bool(b) => Ok(b),
            Scalar::Signed(1) | Scalar::Unsigned(1) => Ok(true),
            Scalar::Signed(0) | Scalar::Unsigned(0) => Ok(false),
            Scalar::Str(s) => match s.as_str() {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
                other => Err(D::Error::custom(format!("invalid boolean: {other:?}"))),
            },
            other => Err(D::Error::custom(format!("invalid boolean: {:?}", other.into_string()))),
        }
    }
}
