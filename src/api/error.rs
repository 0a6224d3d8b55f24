use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not logged in")]
    NotAuthenticated,

    #[error("credentials not set")]
    MissingCredentials,

    #[error("school code unknown, the card has not been fetched yet")]
    SchoolCodeUnknown,

    #[error("login response did not carry a usable token and expiry")]
    InvalidSession,

    #[error("remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("response carried no Location header")]
    MissingLocation,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}
