use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("price feed request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from price feed: {0}")]
    InvalidResponse(String),

    #[error("price feed unreachable: {0}")]
    Unreachable(String),

    #[error("no exchange rate for {0}")]
    UnknownSymbol(String),
}

impl From<reqwest::Error> for TokenError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::RequestFailed(e.to_string())
        }
    }
}
