use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum CloudFoundryError {
    #[error("Invalid API address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Authentication against {endpoint} failed: {reason}")]
    Auth { endpoint: String, reason: String },
    #[error("Cloud Controller request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Cloud Controller returned {status}: {description}")]
    Status {
        status: u16,
        code: Option<i64>,
        error_code: Option<String>,
        description: String,
    },
    #[error("Failed to decode Cloud Controller response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error body the Cloud Controller sends with 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<i64>,
    error_code: Option<String>,
    description: Option<String>,
}

impl CloudFoundryError {
    /// Build a status error from a failed response's body, keeping the raw
    /// text when it is not a Cloud Controller error document.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => CloudFoundryError::Status {
                status,
                code: parsed.code,
                error_code: parsed.error_code,
                description: parsed
                    .description
                    .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned()),
            },
            Err(_) => CloudFoundryError::Status {
                status,
                code: None,
                error_code: None,
                description: String::from_utf8_lossy(body).trim().to_string(),
            },
        }
    }
}
