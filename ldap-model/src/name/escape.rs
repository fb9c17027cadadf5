//! RFC 4514 value escaping
//!
//! # Escaping Rules
//! - `"` `+` `,` `;` `<` `>` `=` `\` are escaped with a backslash
//! - `#` is escaped in first position only
//! - a space is escaped in first or last position only
//! - control characters become `\XX` hex escapes
//!
//! Unescaping accepts the same forms plus arbitrary `\XX` byte escapes, whose
//! bytes must assemble into valid UTF-8. A value starting with an unescaped
//! `#` is the hex form of a binary value.

use ldap_core::strings::{dump_hex_pairs, hex_value};
use ldap_core::{LdapError, LdapResult, Value};

/// Characters that must be escaped anywhere in a value
fn is_special(c: char) -> bool {
    matches!(c, '"' | '+' | ',' | ';' | '<' | '>' | '=' | '\\')
}

/// Characters that may follow a backslash verbatim
fn is_escapable(c: char) -> bool {
    is_special(c) || c == ' ' || c == '#'
}

/// Escape a string value for use in an RDN
///
/// # Example
/// ```rust
/// use ldap_model::name::escape_value;
///
/// assert_eq!(escape_value(" a,b "), "\\ a\\,b\\ ");
/// assert_eq!(escape_value("#1"), "\\#1");
/// ```
pub fn escape_value(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(value.len() + 4);

    for (i, c) in value.chars().enumerate() {
        match c {
            ' ' if i == 0 || i == last => out.push_str("\\ "),
            '#' if i == 0 => out.push_str("\\#"),
            c if is_special(c) => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{7F}' => {
                out.push_str(&format!("\\{:02X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Escape a binary value: `#` followed by uppercase hex pairs
pub fn escape_value_bytes(value: &[u8]) -> String {
    format!("#{}", dump_hex_pairs(value))
}

/// Reverse [`escape_value`], or decode the `#hex` form of a binary value
///
/// # Returns
/// `Value::Binary` for the hex form (`"#"` alone is an empty binary value),
/// `Value::String` otherwise.
///
/// # Error Handling
/// Returns `InvalidRdnSyntax` for:
/// - an odd number of hex digits or a non-hex character in the hex form
/// - an unescaped special character
/// - an unescaped space in first or last position
/// - a dangling backslash or an unknown escape
/// - hex escapes that do not form valid UTF-8
pub fn unescape_value(value: &str) -> LdapResult<Value> {
    if let Some(hex) = value.strip_prefix('#') {
        return decode_hex_form(hex).map(Value::Binary);
    }

    let chars: Vec<char> = value.chars().collect();
    let last = chars.len().saturating_sub(1);
    let mut bytes = Vec::with_capacity(value.len());
    let mut utf8 = [0u8; 4];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                let next = chars.get(i + 1).copied().ok_or_else(|| {
                    LdapError::InvalidRdnSyntax(format!("dangling escape in '{}'", value))
                })?;
                if is_escapable(next) {
                    bytes.extend_from_slice(next.encode_utf8(&mut utf8).as_bytes());
                    i += 2;
                    continue;
                }
                let pair = chars
                    .get(i + 2)
                    .and_then(|&low| Some((hex_value(next)?, hex_value(low)?)));
                match pair {
                    Some((high, low)) => {
                        bytes.push((high << 4) | low);
                        i += 3;
                    }
                    None => {
                        return Err(LdapError::InvalidRdnSyntax(format!(
                            "invalid escape at position {} in '{}'",
                            i, value
                        )));
                    }
                }
            }
            ' ' if i == 0 || i == last => {
                return Err(LdapError::InvalidRdnSyntax(format!(
                    "unescaped space at position {} in '{}'",
                    i, value
                )));
            }
            c if is_special(c) => {
                return Err(LdapError::InvalidRdnSyntax(format!(
                    "unescaped '{}' at position {} in '{}'",
                    c, i, value
                )));
            }
            c => {
                bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                i += 1;
            }
        }
    }

    String::from_utf8(bytes)
        .map(Value::String)
        .map_err(|_| LdapError::InvalidRdnSyntax(format!("'{}' is not valid UTF-8", value)))
}

fn decode_hex_form(digits: &str) -> LdapResult<Vec<u8>> {
    hex::decode(digits).map_err(|e| {
        LdapError::InvalidRdnSyntax(format!("invalid hex string '#{}': {}", digits, e))
    })
}
