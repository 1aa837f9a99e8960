use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const BACKEND_URL: &str = "https://11.react.pages.academy/six-cities";
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

const BACKEND_URL_KEY: &str = "SIX_CITIES_BACKEND_URL";
const TIMEOUT_KEY: &str = "SIX_CITIES_TIMEOUT_MS";
const DATA_DIR_KEY: &str = "SIX_CITIES_DATA_DIR";

/// Fixed at startup. Neither the url nor the timeout change afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub backend_url: Url,
    pub request_timeout: Duration,
    /// Overrides the platform config directory for the session token
    pub data_directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(BACKEND_URL).expect("BACKEND_URL is a valid url"),
            request_timeout: REQUEST_TIMEOUT,
            data_directory: None,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment, after loading
    /// a `.env` file if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(url) = lookup(BACKEND_URL_KEY) {
            config.backend_url = Url::parse(&url).map_err(|source| ConfigError::InvalidUrl {
                url: url.clone(),
                source,
            })?;
        }

        if let Some(value) = lookup(TIMEOUT_KEY) {
            let millis = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: TIMEOUT_KEY,
                    value,
                })?;
            config.request_timeout = Duration::from_millis(millis);
        }

        config.data_directory = lookup(DATA_DIR_KEY).map(PathBuf::from);

        Ok(config)
    }

    /// The backend url without a trailing slash, ready to have a path appended
    pub fn base_url(&self) -> &str {
        self.backend_url.as_str().trim_end_matches('/')
    }
}
