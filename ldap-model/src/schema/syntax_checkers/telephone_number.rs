use ldap_core::Value;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::syntax_checker::{SyntaxChecker, verdict};

const DEFAULT_REGEXP: &str = r"^ *[+]? *((\([0-9- ,;/#*]+\))|[0-9- ,;/#*]+)+$";

static DEFAULT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_REGEXP).expect("built-in telephone number pattern"));

/// Telephone Number syntax (RFC 4517 §3.3.31)
///
/// Values are matched against a default pattern (E.123-like) and, unless
/// the default was made mandatory, against any number of extra patterns.
/// Every pattern must match the whole value.
#[derive(Debug, Clone)]
pub struct TelephoneNumberSyntaxChecker {
    default_pattern: Regex,
    default_mandatory: bool,
    extra_patterns: Vec<Regex>,
}

impl Default for TelephoneNumberSyntaxChecker {
    fn default() -> Self {
        Self {
            default_pattern: DEFAULT_PATTERN.clone(),
            default_mandatory: false,
            extra_patterns: Vec::new(),
        }
    }
}

/// Compile `pattern` so that it only matches whole values
fn compile_whole(pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::warn!("ignoring telephone number pattern '{}': {}", pattern, e);
            None
        }
    }
}

impl TelephoneNumberSyntaxChecker {
    pub const OID: &'static str = "1.3.6.1.4.1.1466.115.121.1.50";

    pub fn new() -> Self {
        Self::default()
    }

    /// Accept values matching `pattern` as well
    ///
    /// Ignored when the default pattern is mandatory or `pattern` does not
    /// compile.
    pub fn add_regexp(&mut self, pattern: &str) {
        if self.default_mandatory {
            return;
        }
        if let Some(regex) = compile_whole(pattern) {
            self.extra_patterns.push(regex);
        }
    }

    /// Replace the default pattern and make it the only one
    ///
    /// Ignored when `pattern` does not compile.
    pub fn set_default_regexp(&mut self, pattern: &str) {
        if let Some(regex) = compile_whole(pattern) {
            self.default_pattern = regex;
            self.default_mandatory = true;
            self.extra_patterns.clear();
        }
    }

    pub fn is_default_mandatory(&self) -> bool {
        self.default_mandatory
    }
}

impl SyntaxChecker for TelephoneNumberSyntaxChecker {
    fn oid(&self) -> &str {
        Self::OID
    }

    fn is_valid_syntax(&self, value: &Value) -> bool {
        let text = value.to_text();
        if text.is_empty() {
            return verdict(Self::OID, &text, false);
        }
        let valid = self.default_pattern.is_match(&text)
            || (!self.default_mandatory && self.extra_patterns.iter().any(|p| p.is_match(&text)));
        verdict(Self::OID, &text, valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(checker: &TelephoneNumberSyntaxChecker, value: &str) -> bool {
        checker.is_valid_syntax(&Value::from(value))
    }

    #[test]
    fn test_default_pattern() {
        let checker = TelephoneNumberSyntaxChecker::new();
        for value in ["+1 512 315 0280", "1-512-315-0280", "(512) 315 0280", " + 33 (1) 42 22"] {
            assert!(valid(&checker, value), "{}", value);
        }
        for value in ["", "+", "abc", "12a", "(12"] {
            assert!(!valid(&checker, value), "{}", value);
        }
    }

    #[test]
    fn test_extra_patterns() {
        let mut checker = TelephoneNumberSyntaxChecker::new();
        assert!(!valid(&checker, "ext.42"));
        checker.add_regexp(r"ext\.[0-9]+");
        assert!(valid(&checker, "ext.42"));
        // whole-value match only
        assert!(!valid(&checker, "call ext.42"));
        // broken patterns are ignored
        checker.add_regexp("(");
        assert!(valid(&checker, "ext.42"));
    }

    #[test]
    fn test_mandatory_default() {
        let mut checker = TelephoneNumberSyntaxChecker::new();
        checker.add_regexp(r"ext\.[0-9]+");
        checker.set_default_regexp("[0-9]{4}");
        assert!(checker.is_default_mandatory());
        assert!(valid(&checker, "1234"));
        assert!(!valid(&checker, "12345"));
        assert!(!valid(&checker, "ext.42"));

        checker.add_regexp("[a-z]+");
        assert!(!valid(&checker, "abc"));
    }
}
