use thiserror::Error;

/// Boxed cause carried by schema-level failures
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for LDAP codec and name operations
#[derive(Error, Debug)]
pub enum LdapError {
    /// Malformed or incomplete BER input
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// An in-memory object could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Malformed RDN/DN text or an unescapable value
    #[error("Invalid RDN syntax: {0}")]
    InvalidRdnSyntax(String),

    /// Schema lookup or value normalization failed
    #[error("Schema normalization error: {message}")]
    SchemaNormalization {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error("Invalid attribute syntax: {0}")]
    InvalidAttributeSyntax(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl LdapError {
    /// Build a `Decoding` error from anything printable
    pub fn decoding(message: impl Into<String>) -> Self {
        LdapError::Decoding(message.into())
    }

    /// Build a `SchemaNormalization` error without an underlying cause
    pub fn schema(message: impl Into<String>) -> Self {
        LdapError::SchemaNormalization {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a collaborator failure into a `SchemaNormalization` error
    pub fn schema_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LdapError::SchemaNormalization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if this error was raised while decoding BER input
    pub fn is_decoding(&self) -> bool {
        matches!(self, LdapError::Decoding(_))
    }
}

/// Result type alias for LDAP operations
pub type LdapResult<T> = Result<T, LdapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_decoding_message() {
        let err = LdapError::decoding("expected SEQUENCE");
        assert!(err.is_decoding());
        assert_eq!(err.to_string(), "Decoding error: expected SEQUENCE");
    }

    #[test]
    fn test_schema_error_keeps_source() {
        let cause = LdapError::InvalidAttributeSyntax("bad value".to_string());
        let err = LdapError::schema_with_source("cannot normalize cn", cause);
        assert!(!err.is_decoding());
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "Invalid attribute syntax: bad value");
    }
}
