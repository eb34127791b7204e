use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown support level '{0}'")]
    UnknownSupportLevel(String),

    #[error("dialog is {0}, cannot {1}")]
    InvalidTransition(&'static str, &'static str),

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("invalid {field} '{value}'")]
    InvalidField { field: &'static str, value: String },

    #[error("confidence must be between 1 and 5, got {0}")]
    ConfidenceOutOfRange(u8),
}
