use thiserror::Error;

/// Error for contact field validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactDataError {
    #[error("{field} too short: minimum {min} characters, got {actual}")]
    TooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
}

/// Top-level error for contact operations
#[derive(Debug, Clone, Error)]
pub enum ContactError {
    #[error("Invalid contact data: {0}")]
    InvalidData(#[from] ContactDataError),

    #[error("Contact not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
