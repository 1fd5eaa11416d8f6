use session::FetchError;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("missing access token for {service}")]
    MissingToken { service: &'static str },

    #[error("invalid note: {0}")]
    Validation(String),
}

impl From<ApiError> for FetchError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Http(e) if e.is_decode() => FetchError::Decode(e.to_string()),
            ApiError::Http(e) => match e.status() {
                Some(status) => FetchError::Status {
                    status: status.as_u16(),
                },
                None => FetchError::Network(e.to_string()),
            },
            ApiError::Status { status, .. } => FetchError::Status { status },
            other => FetchError::Other(other.to_string()),
        }
    }
}
