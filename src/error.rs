use thiserror::Error;

/// Main error type for structured search construction
///
/// Every variant is raised synchronously at the point of misuse. None of them
/// describes a transient condition: the caller fixes the call and tries again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuredSearchError {
    #[error("Unknown container reference: {0}")]
    UnknownReference(String),

    #[error("Container reference already registered: {0}")]
    DuplicateReference(String),

    #[error("Empty composite query: {0} requires at least one child query")]
    EmptyComposite(&'static str),

    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("Invalid range operation: {0}")]
    InvalidRangeOperation(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Format mismatch: query MIME type '{query}' does not match options MIME type '{options}'")]
    FormatMismatch { query: String, options: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for structured search operations
pub type Result<T> = std::result::Result<T, StructuredSearchError>;

impl StructuredSearchError {
    /// Whether this error was raised while building or serializing a query tree
    /// (as opposed to assembling a payload or loading input)
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            StructuredSearchError::UnknownReference(_)
                | StructuredSearchError::DuplicateReference(_)
                | StructuredSearchError::EmptyComposite(_)
                | StructuredSearchError::UnsupportedMode(_)
                | StructuredSearchError::InvalidRangeOperation(_)
                | StructuredSearchError::InvalidQuery(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StructuredSearchError::UnknownReference("price".to_string());
        assert_eq!(err.to_string(), "Unknown container reference: price");

        let err = StructuredSearchError::EmptyComposite("and-query");
        assert_eq!(
            err.to_string(),
            "Empty composite query: and-query requires at least one child query"
        );
    }

    #[test]
    fn test_format_mismatch_display() {
        let err = StructuredSearchError::FormatMismatch {
            query: "application/json".to_string(),
            options: "application/xml".to_string(),
        };
        assert!(err.to_string().contains("'application/json'"));
        assert!(err.to_string().contains("'application/xml'"));
    }

    #[test]
    fn test_construction_errors() {
        assert!(StructuredSearchError::EmptyComposite("or-query").is_construction_error());
        assert!(StructuredSearchError::UnsupportedMode("xml".to_string()).is_construction_error());
        assert!(!StructuredSearchError::FormatMismatch {
            query: String::new(),
            options: String::new(),
        }
        .is_construction_error());
        assert!(!StructuredSearchError::Parse("bad".to_string()).is_construction_error());
    }
}
