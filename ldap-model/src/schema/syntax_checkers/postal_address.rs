use ldap_core::Value;

use crate::schema::syntax_checker::{SyntaxChecker, verdict};

/// Postal Address syntax (RFC 4517 §3.3.28)
///
/// One or more lines separated by `$`; no line may be empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostalAddressSyntaxChecker;

impl PostalAddressSyntaxChecker {
    pub const OID: &'static str = "1.3.6.1.4.1.1466.115.121.1.41";
}

impl SyntaxChecker for PostalAddressSyntaxChecker {
    fn oid(&self) -> &str {
        Self::OID
    }

    fn is_valid_syntax(&self, value: &Value) -> bool {
        let text = value.to_text();
        let valid = !text.is_empty() && text.split('$').all(|line| !line.is_empty());
        verdict(Self::OID, &text, valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        let checker = PostalAddressSyntaxChecker;
        for value in ["1234 Main St.", "1234 Main St.$Anytown, CA 12345$USA", " $ "] {
            assert!(checker.is_valid_syntax(&Value::from(value)), "{}", value);
        }
        assert!(checker.is_valid_syntax(&Value::Binary(b"a$b".to_vec())));
    }

    #[test]
    fn test_invalid_addresses() {
        let checker = PostalAddressSyntaxChecker;
        for value in ["", "$", "a$", "$a", "a$$b"] {
            assert!(!checker.is_valid_syntax(&Value::from(value)), "{}", value);
        }
        assert!(checker.assert_syntax(&Value::from("a$")).is_err());
        assert!(checker.assert_syntax(&Value::from("a$b")).is_ok());
    }
}
