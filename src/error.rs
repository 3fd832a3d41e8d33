use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Invalid ticket status: {0}")]
    InvalidStatus(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl KanbanError {
    /// Returns the field-level failures if this is a validation error
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Form fields that carry input constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    Title,
    AssignedTo,
    TentativeTime,
}

impl fmt::Display for TicketField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::AssignedTo => write!(f, "assignedTo"),
            Self::TentativeTime => write!(f, "tentativeTime"),
        }
    }
}

/// A single failed input constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: TicketField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: TicketField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = KanbanError::Validation(vec![
            FieldError::new(TicketField::Title, "is required"),
            FieldError::new(TicketField::TentativeTime, "must be a positive number of hours"),
        ]);

        assert_eq!(
            err.to_string(),
            "Validation failed: title is required; tentativeTime must be a positive number of hours"
        );
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn test_field_errors_empty_for_other_variants() {
        let err = KanbanError::TicketNotFound("abc".to_string());
        assert!(err.field_errors().is_empty());
    }
}
