use thiserror::Error;

/// Message surfaced to callers whenever an identity lookup misses.
pub const POKEMON_NOT_FOUND: &str = "Pokemon with this Id does not exist.";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {message}")]
    Validation { field: String, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

/// Coarse classification used for status mapping and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "storage",
        }
    }
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn pokemon_not_found() -> Self { Self::NotFound(POKEMON_NOT_FOUND.to_string()) }

    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation { .. } => ErrorKind::BadRequest,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Storage(_) => ErrorKind::Storage,
            ServiceError::Model(models::errors::ModelError::Validation(_)) => ErrorKind::BadRequest,
            ServiceError::Model(models::errors::ModelError::Db(_)) => ErrorKind::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn not_found_displays_literal_message() {
        assert_eq!(ServiceError::pokemon_not_found().to_string(), "Pokemon with this Id does not exist.");
        assert_eq!(ServiceError::pokemon_not_found().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn validation_display_is_the_message() {
        let e = ServiceError::validation("take", "take must be one of the following values: 10, 20, 50");
        assert_eq!(e.to_string(), "validation error: take must be one of the following values: 10, 20, 50");
        assert_eq!(e.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn model_errors_split_by_cause() {
        let v: ServiceError = ModelError::Validation("bad".into()).into();
        let d: ServiceError = ModelError::Db("down".into()).into();
        assert_eq!(v.kind(), ErrorKind::BadRequest);
        assert_eq!(d.kind(), ErrorKind::Storage);
    }
}
