//! RDN text parser
//!
//! # Grammar
//! ```text
//! rdn       = *SP ava *( *SP "+" *SP ava ) *SP
//! ava       = attrtype *SP "=" *SP attrvalue
//! attrtype  = descr / [ ("OID." / "oid.") ] numericoid
//! attrvalue = "#" hexstring / DQUOTE quoted DQUOTE / string
//! ```
//!
//! Unescaped spaces around `=` and `+` are not part of the type or value.
//! Delimiters are all ASCII, so scanning bytes never splits a UTF-8 sequence.

use ldap_core::strings::{hex_value, is_numeric_oid};
use ldap_core::{LdapError, LdapResult, Value};

use crate::name::escape::unescape_value;
use crate::name::rdn_builder::RdnBuilder;

/// Parse `text` and append its AVAs to `builder`
pub(crate) fn parse(text: &str, builder: &mut RdnBuilder<'_>) -> LdapResult<()> {
    let mut scanner = Scanner::new(text);
    scanner.skip_spaces();
    loop {
        let (up_type, norm_type) = scanner.attribute_type()?;
        scanner.skip_spaces();
        scanner.expect(b'=')?;
        scanner.skip_spaces();
        let value = scanner.attribute_value()?;
        builder.add_ava(up_type, norm_type, value.clone(), value)?;

        scanner.skip_spaces();
        match scanner.peek() {
            None => return Ok(()),
            Some(b'+') => {
                scanner.advance();
                scanner.skip_spaces();
            }
            Some(_) => return Err(scanner.error("'+' or end of RDN expected")),
        }
    }
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.advance();
        }
    }

    fn expect(&mut self, expected: u8) -> LdapResult<()> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("'{}' expected", expected as char)))
        }
    }

    fn error(&self, message: &str) -> LdapError {
        LdapError::InvalidRdnSyntax(format!(
            "{} at position {} in '{}'",
            message, self.pos, self.text
        ))
    }

    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.advance();
        }
        &self.text[start..self.pos]
    }

    /// Returns the type as written and the type to normalize
    fn attribute_type(&mut self) -> LdapResult<(&'a str, &'a str)> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() => {
                let descr = self.take_while(|b| b.is_ascii_alphanumeric() || b == b'-');
                if descr.eq_ignore_ascii_case("oid") && self.peek() == Some(b'.') {
                    self.advance();
                    let oid = self.numeric_oid()?;
                    return Ok((&self.text[start..self.pos], oid));
                }
                Ok((descr, descr))
            }
            Some(b) if b.is_ascii_digit() => {
                let oid = self.numeric_oid()?;
                Ok((oid, oid))
            }
            _ => Err(self.error("attribute type expected")),
        }
    }

    fn numeric_oid(&mut self) -> LdapResult<&'a str> {
        let oid = self.take_while(|b| b.is_ascii_digit() || b == b'.');
        if is_numeric_oid(oid) {
            Ok(oid)
        } else {
            Err(self.error(&format!("invalid numeric OID '{}'", oid)))
        }
    }

    /// Unescaped value at the cursor
    fn attribute_value(&mut self) -> LdapResult<Value> {
        match self.peek() {
            Some(b'#') => {
                let raw = self.take_while(|b| b != b'+' && b != b' ');
                unescape_value(raw)
            }
            Some(b'"') => self.quoted_value(),
            _ => {
                let raw = self.string_value();
                unescape_value(raw)
            }
        }
    }

    /// Scan up to the next unescaped `+`, leaving out unescaped trailing spaces
    fn string_value(&mut self) -> &'a str {
        let start = self.pos;
        let mut end = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b'+' => break,
                b'\\' => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                    end = self.pos;
                }
                b' ' => self.advance(),
                _ => {
                    self.advance();
                    end = self.pos;
                }
            }
        }
        self.pos = end;
        &self.text[start..end]
    }

    fn quoted_value(&mut self) -> LdapResult<Value> {
        self.advance();
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated quoted value")),
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    let next = self.peek().ok_or_else(|| self.error("dangling escape"))?;
                    let low = self
                        .bytes
                        .get(self.pos + 1)
                        .and_then(|&b| hex_value(b as char));
                    match (hex_value(next as char), low) {
                        (Some(high), Some(low)) => {
                            bytes.push((high << 4) | low);
                            self.pos += 2;
                        }
                        (Some(_), None) => return Err(self.error("invalid hex escape")),
                        (None, _) => {
                            bytes.push(next);
                            self.advance();
                        }
                    }
                }
                Some(b) => {
                    bytes.push(b);
                    self.advance();
                }
            }
        }
        let value = String::from_utf8(bytes)
            .map_err(|_| self.error("quoted value is not valid UTF-8"))?;
        Ok(Value::String(value))
    }
}
