use std::fmt;

/// Transport-level failures of the storage and upload services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request could not be sent or the body could not be read
    NetworkError { message: String },
    /// Server answered with a non-2xx status
    HttpStatus { status: u16, message: String },
    /// Caller is not allowed to perform the operation
    AuthenticationFailed { message: String },
    /// Request or response (de)serialization failed
    SerializationError { message: String },
    /// Response parsed but does not have the expected shape
    InvalidResponse { expected: String, got: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            ClientError::HttpStatus { status, message } => {
                if message.is_empty() {
                    write!(f, "HTTP status {}", status)
                } else {
                    write!(f, "HTTP status {}: {}", status, message)
                }
            }
            ClientError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            ClientError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
            ClientError::InvalidResponse { expected, got } => {
                write!(f, "Invalid response format: expected {}, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ClientError::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ClientError::NetworkError {
                message: err.to_string(),
            },
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
