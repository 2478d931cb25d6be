use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Contact not found: {id}")]
    ContactNotFound { id: Uuid },

    #[error("First name cannot be empty")]
    EmptyFirstName,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn contact_not_found(id: Uuid) -> Self {
        Self::ContactNotFound { id }
    }

    pub fn empty_first_name() -> Self {
        Self::EmptyFirstName
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
