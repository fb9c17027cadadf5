use std::cmp::Ordering;

/// Orders the values of a matching rule
pub trait LdapComparator<T: ?Sized> {
    /// OID of the matching rule this comparator implements
    fn oid(&self) -> &str;

    /// Compare two optional values; an absent value sorts first
    fn compare(&self, left: Option<&T>, right: Option<&T>) -> Ordering;
}

/// Comparator for string matching rules (plain lexicographic order)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringComparator {
    oid: String,
}

impl StringComparator {
    pub fn new(oid: &str) -> Self {
        Self {
            oid: oid.to_string(),
        }
    }
}

impl LdapComparator<str> for StringComparator {
    fn oid(&self) -> &str {
        &self.oid
    }

    fn compare(&self, left: Option<&str>, right: Option<&str>) -> Ordering {
        log::debug!("comparing strings {:?} and {:?}", left, right);
        // Option orders None before Some
        left.cmp(&right)
    }
}
