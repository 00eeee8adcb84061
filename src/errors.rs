use thiserror::Error;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    NotAnObject { message: &'static str },
    #[error("{message}")]
    InvalidRequest { message: &'static str },
    #[error("{message}")]
    MethodNotFound { message: String },
    #[error("{message}")]
    InvalidParams { message: &'static str },
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn not_an_object() -> Self {
        Self::NotAnObject {
            message: "Parse error: request must be an object",
        }
    }

    pub fn invalid_request(message: &'static str) -> Self {
        Self::InvalidRequest { message }
    }

    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::MethodNotFound {
            message: message.into(),
        }
    }

    pub fn invalid_params(message: &'static str) -> Self {
        Self::InvalidParams { message }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::NotAnObject { .. } => PARSE_ERROR,
            Self::InvalidRequest { .. } => INVALID_REQUEST,
            Self::MethodNotFound { .. } => METHOD_NOT_FOUND,
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::Internal { .. } => INTERNAL_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),
}
