use thiserror::Error;

/// Everything that can go wrong when talking to the rental API.
///
/// The variants carry `String`s instead of the underlying error types so the
/// error can travel inside store actions (which are `Clone`).
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ApiError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Authorization required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    ValidationFailure(String),

    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Map a non-success HTTP status to the matching error.
    /// Returns `None` for 2xx statuses.
    pub fn from_status(status: u16, path: &str, body: &str) -> Option<Self> {
        match status {
            200..=299 => None,
            401 => Some(ApiError::Unauthorized),
            404 => Some(ApiError::NotFound(path.to_string())),
            _ => Some(ApiError::Rejected {
                status,
                message: extract_message(body),
            }),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ApiError::NetworkFailure(format!("Timeout: {value}"))
        } else if value.is_decode() {
            ApiError::ValidationFailure(value.to_string())
        } else {
            ApiError::NetworkFailure(value.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::ValidationFailure(value.to_string())
    }
}

/// The backend answers errors with `{"error": "..."}`. Fall back to the raw body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid backend url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

pub(crate) trait ResultExt {
    type Output;
    fn log_error(self, call: &'static str) -> Result<Self::Output, ApiError>;
}

impl<T> ResultExt for Result<T, ApiError> {
    type Output = T;
    fn log_error(self, call: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| {
            log::error!("API Error: {call} {e}");
            e
        })
    }
}
