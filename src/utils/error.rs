use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid QR code format")]
    InvalidQr,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidQr => "INVALID_QR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Api(_) => "API_ERROR",
            Error::Http(_) => "HTTP_ERROR",
        }
    }
}
