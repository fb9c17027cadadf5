use ldap_core::{LdapError, LdapResult, Value};

/// Validates attribute values against an LDAP syntax
pub trait SyntaxChecker: Send + Sync {
    /// OID of the checked syntax
    fn oid(&self) -> &str;

    /// Check if `value` conforms to the syntax
    ///
    /// Binary values are checked as (lossy) UTF-8 text.
    fn is_valid_syntax(&self, value: &Value) -> bool;

    /// Fail with `InvalidAttributeSyntax` if `value` does not conform
    fn assert_syntax(&self, value: &Value) -> LdapResult<()> {
        if self.is_valid_syntax(value) {
            Ok(())
        } else {
            Err(LdapError::InvalidAttributeSyntax(format!(
                "'{}' does not conform to syntax {}",
                value,
                self.oid()
            )))
        }
    }
}

/// Log and return a checker verdict
pub(crate) fn verdict(oid: &str, text: &str, valid: bool) -> bool {
    if valid {
        log::debug!("'{}' is valid for syntax {}", text, oid);
    } else {
        log::debug!("'{}' is invalid for syntax {}", text, oid);
    }
    valid
}
