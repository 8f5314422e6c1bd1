use thiserror::Error;

/// Why a "create interview" body was rejected.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Required fields absent or empty, in declaration order.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("failed to stamp interview: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl RequestError {
    /// True for errors caused by the caller's payload.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RequestError::MissingFields(_))
    }
}
