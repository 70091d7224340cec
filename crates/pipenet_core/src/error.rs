use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipenetError {
    #[error("unknown relation: {name}")]
    UnknownRelation { name: String },
    #[error("unknown field '{field}' on relation '{relation}'")]
    UnknownField { relation: String, field: String },
    #[error("unsupported quantifier: {message}")]
    UnsupportedQuantifier { message: String },
    #[error("invalid value: {message}")]
    InvalidValue { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("validation error: {message}")]
    Validation { message: String },
    #[error("conflict: {message}")]
    Conflict { message: String },
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("request cancelled")]
    Cancelled,
    #[error("request timed out after {millis} ms")]
    TimedOut { millis: u64 },
}

impl PipenetError {
    pub fn unknown_relation(name: impl Into<String>) -> Self {
        Self::UnknownRelation { name: name.into() }
    }

    pub fn unknown_field(relation: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            relation: relation.into(),
            field: field.into(),
        }
    }

    pub fn unsupported_quantifier(message: impl Into<String>) -> Self {
        Self::UnsupportedQuantifier {
            message: message.into(),
        }
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// True for failures caused by the request itself rather than the store.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownRelation { .. }
                | Self::UnknownField { .. }
                | Self::UnsupportedQuantifier { .. }
                | Self::InvalidValue { .. }
                | Self::Validation { .. }
        )
    }
}

pub type PipenetResult<T> = Result<T, PipenetError>;

impl From<sea_orm::DbErr> for PipenetError {
    fn from(value: sea_orm::DbErr) -> Self {
        PipenetError::storage(value.to_string())
    }
}
