//! Client input errors.

use thiserror::Error;

/// Reasons a recommendation request is rejected before touching the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("budget is required")]
    MissingBudget,

    #[error("budget is not a number: {0}")]
    InvalidBudget(String),

    #[error("categories array is required")]
    MissingCategories,

    #[error("categories must be an array of strings")]
    InvalidCategories,

    #[error("request body must be a JSON object")]
    NotAnObject,

    /// The body could not be read as JSON at all.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl RequestError {
    /// Message returned to HTTP clients, independent of the variant.
    pub fn public_message(&self) -> &'static str {
        "Budget and categories array are required"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_detail() {
        let err = RequestError::InvalidBudget("cheap".into());
        assert_eq!(err.to_string(), "budget is not a number: cheap");
    }

    #[test]
    fn test_public_message_is_stable() {
        assert_eq!(
            RequestError::MissingBudget.public_message(),
            RequestError::MissingCategories.public_message()
        );
        assert_eq!(
            RequestError::MalformedBody("EOF".into()).public_message(),
            "Budget and categories array are required"
        );
    }
}
