use thiserror::Error;

/// Failures talking to the remote food service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Connection, TLS, timeout or body-read failure.
    #[error("network error: {0}")]
    Transport(String),

    /// Non-2xx status with a structured `{ "error": ... }` payload.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("request failed with status {status}")]
    StatusWithoutPayload { status: u16 },

    /// 2xx response whose body could not be decoded.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// The server-provided message, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ServiceError::Status { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } | ServiceError::StatusWithoutPayload { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
