use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("catalogue price must not be negative")]
    InvalidPrice,
    #[error("`{field}` must not be negative")]
    InvalidInput { field: &'static str },
    #[error("quotation volume must be positive")]
    InvalidVolume,
    #[error("client name must not be empty")]
    InvalidClient,
    #[error("no catalogue price has been saved yet")]
    NoPriceAvailable,
    #[error("no client named `{name}`")]
    NotFound { name: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Persistence failures never block a session: the caller warns and keeps
    /// working against in-memory state. Everything else is a hard stop.
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationError, DomainError};

    #[test]
    fn domain_errors_are_not_degradable() {
        let error = ApplicationError::from(DomainError::NoPriceAvailable);
        assert!(!error.is_degradable());
    }

    #[test]
    fn persistence_errors_are_degradable() {
        let error = ApplicationError::Persistence("backend offline".to_owned());
        assert!(error.is_degradable());
    }

    #[test]
    fn invalid_input_names_the_field() {
        let message = DomainError::InvalidInput { field: "logistics_cost" }.to_string();
        assert!(message.contains("logistics_cost"));
    }
}
