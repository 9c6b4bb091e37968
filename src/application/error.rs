use thiserror::Error;

use crate::domain::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} does not exist: {id}")]
    InvalidReference { entity: &'static str, id: String },

    #[error("{0}")]
    InvalidState(String),

    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A request body or path that could not be decoded.
    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_reference(entity: &'static str, id: impl ToString) -> Self {
        Self::InvalidReference {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(entity: &'static str, key: impl ToString) -> Self {
        Self::Conflict {
            entity,
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_record() {
        assert_eq!(AppError::not_found("Job", "J1").to_string(), "Job not found: J1");
        assert_eq!(
            AppError::invalid_reference("Client", 999).to_string(),
            "Client does not exist: 999"
        );
        assert_eq!(
            AppError::conflict("MaterialType", "Rebar").to_string(),
            "MaterialType already exists: Rebar"
        );
    }

    #[test]
    fn test_validation_converts() {
        let err: AppError = ValidationError::new("name", "must not be empty").into();
        assert_eq!(err.to_string(), "Invalid input: name must not be empty");
    }
}
