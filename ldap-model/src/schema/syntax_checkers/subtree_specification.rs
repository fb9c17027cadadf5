//! Subtree Specification syntax (RFC 3672)
//!
//! # Grammar
//! ```text
//! SubtreeSpecification = "{" [ sp ss-base ]
//!                            [ sep sp ss-specificExclusions ]
//!                            [ sep sp ss-minimum ]
//!                            [ sep sp ss-maximum ]
//!                            [ sep sp ss-specificationFilter ] sp "}"
//! ss-base                = "base" msp LocalName
//! ss-specificExclusions  = "specificExclusions" msp SpecificExclusions
//! SpecificExclusions     = "{" [ sp SpecificExclusion *( "," sp SpecificExclusion ) ] sp "}"
//! SpecificExclusion      = ( "chopBefore" / "chopAfter" ) ":" LocalName
//! ss-minimum             = "minimum" msp BaseDistance
//! ss-maximum             = "maximum" msp BaseDistance
//! ss-specificationFilter = "specificationFilter" msp Refinement
//! Refinement             = "item:" oid / ( "and:" / "or:" ) Refinements / "not:" Refinement
//! Refinements            = "{" [ sp Refinement *( "," sp Refinement ) ] sp "}"
//! ```

use std::str::FromStr;

use ldap_core::strings::is_numeric_oid;
use ldap_core::{LdapError, LdapResult, Value};

use crate::name::Dn;
use crate::schema::syntax_checker::{SyntaxChecker, verdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecificExclusion {
    ChopBefore(Dn),
    ChopAfter(Dn),
}

/// Object class filter applied to the entries of a subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refinement {
    Item(String),
    And(Vec<Refinement>),
    Or(Vec<Refinement>),
    Not(Box<Refinement>),
}

/// Parsed subtree specification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtreeSpecification {
    pub base: Dn,
    pub specific_exclusions: Vec<SpecificExclusion>,
    pub minimum: u32,
    pub maximum: Option<u32>,
    pub specification_filter: Option<Refinement>,
}

impl SubtreeSpecification {
    /// Parse the RFC 3672 text form
    ///
    /// # Error Handling
    /// Returns `InvalidAttributeSyntax` for text outside the grammar,
    /// including misordered or repeated components.
    pub fn parse(text: &str) -> LdapResult<Self> {
        let mut parser = Parser::new(text);
        let spec = parser.subtree_specification()?;
        parser.skip_spaces();
        if !parser.at_end() {
            return Err(parser.error("end of input expected"));
        }
        Ok(spec)
    }
}

impl FromStr for SubtreeSpecification {
    type Err = LdapError;

    fn from_str(s: &str) -> LdapResult<Self> {
        SubtreeSpecification::parse(s)
    }
}

/// Component keywords in their mandatory order
const COMPONENTS: [&str; 5] = [
    "base",
    "specificExclusions",
    "minimum",
    "maximum",
    "specificationFilter",
];

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, message: &str) -> LdapError {
        LdapError::InvalidAttributeSyntax(format!(
            "subtree specification: {} at position {} in '{}'",
            message, self.pos, self.text
        ))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) -> usize {
        let start = self.pos;
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
        self.pos - start
    }

    fn expect(&mut self, expected: u8) -> LdapResult<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("'{}' expected", expected as char)))
        }
    }

    /// At least one space
    fn expect_spaces(&mut self) -> LdapResult<()> {
        if self.skip_spaces() == 0 {
            return Err(self.error("space expected"));
        }
        Ok(())
    }

    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    fn keyword(&mut self) -> &'a str {
        self.take_while(|b| b.is_ascii_alphabetic())
    }

    /// Parse `{ elem, elem, ... }` with `elem` parsing one element
    fn braced_list<T>(
        &mut self,
        mut elem: impl FnMut(&mut Self) -> LdapResult<T>,
    ) -> LdapResult<Vec<T>> {
        self.expect(b'{')?;
        self.skip_spaces();
        let mut items = Vec::new();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(items);
        }
        loop {
            items.push(elem(self)?);
            self.skip_spaces();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_spaces();
                }
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.error("',' or '}' expected")),
            }
        }
    }

    fn subtree_specification(&mut self) -> LdapResult<SubtreeSpecification> {
        let mut spec = SubtreeSpecification::default();
        let mut next_component = 0;

        self.skip_spaces();
        self.braced_list(|p| {
            let keyword = p.keyword();
            let index = COMPONENTS
                .iter()
                .position(|&c| c == keyword)
                .ok_or_else(|| p.error(&format!("unknown component '{}'", keyword)))?;
            if index < next_component {
                return Err(p.error(&format!("component '{}' repeated or out of order", keyword)));
            }
            next_component = index + 1;
            p.expect_spaces()?;

            match index {
                0 => spec.base = p.local_name()?,
                1 => spec.specific_exclusions = p.braced_list(Self::specific_exclusion)?,
                2 => spec.minimum = p.base_distance()?,
                3 => spec.maximum = Some(p.base_distance()?),
                _ => spec.specification_filter = Some(p.refinement()?),
            }
            Ok(())
        })?;
        Ok(spec)
    }

    fn local_name(&mut self) -> LdapResult<Dn> {
        self.expect(b'"')?;
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated distinguished name")),
                Some(b'\\') => self.pos += 2,
                Some(b'"') => break,
                Some(_) => self.pos += 1,
            }
        }
        let dn_text = &self.text[start..self.pos];
        self.pos += 1;
        Dn::parse(dn_text).map_err(|e| self.error(&format!("bad distinguished name ({})", e)))
    }

    fn specific_exclusion(&mut self) -> LdapResult<SpecificExclusion> {
        let keyword = self.keyword();
        let chop: fn(Dn) -> SpecificExclusion = match keyword {
            "chopBefore" => SpecificExclusion::ChopBefore,
            "chopAfter" => SpecificExclusion::ChopAfter,
            other => return Err(self.error(&format!("unknown exclusion '{}'", other))),
        };
        self.skip_spaces();
        self.expect(b':')?;
        self.skip_spaces();
        Ok(chop(self.local_name()?))
    }

    fn base_distance(&mut self) -> LdapResult<u32> {
        let digits = self.take_while(|b| b.is_ascii_digit());
        digits
            .parse()
            .map_err(|_| self.error(&format!("base distance expected, got '{}'", digits)))
    }

    fn refinement(&mut self) -> LdapResult<Refinement> {
        let keyword = self.keyword();
        self.skip_spaces();
        self.expect(b':')?;
        self.skip_spaces();
        match keyword {
            "item" => {
                let oid = self.take_while(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.');
                let is_descr = oid.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
                    && !oid.contains('.');
                if is_descr || is_numeric_oid(oid) {
                    Ok(Refinement::Item(oid.to_string()))
                } else {
                    Err(self.error(&format!("object identifier expected, got '{}'", oid)))
                }
            }
            "and" => Ok(Refinement::And(self.braced_list(Self::refinement)?)),
            "or" => Ok(Refinement::Or(self.braced_list(Self::refinement)?)),
            "not" => Ok(Refinement::Not(Box::new(self.refinement()?))),
            other => Err(self.error(&format!("unknown refinement '{}'", other))),
        }
    }
}

/// Checker for the Subtree Specification syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtreeSpecificationSyntaxChecker;

impl SubtreeSpecificationSyntaxChecker {
    pub const OID: &'static str = "1.3.6.1.4.1.1466.115.121.1.45";
}

impl SyntaxChecker for SubtreeSpecificationSyntaxChecker {
    fn oid(&self) -> &str {
        Self::OID
    }

    fn is_valid_syntax(&self, value: &Value) -> bool {
        let text = value.to_text();
        let valid = !text.is_empty() && SubtreeSpecification::parse(&text).is_ok();
        verdict(Self::OID, &text, valid)
    }
}
