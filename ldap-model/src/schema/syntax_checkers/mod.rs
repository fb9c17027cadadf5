//! Syntax checkers for individual LDAP syntaxes

mod postal_address;
mod subtree_specification;
mod telephone_number;

pub use postal_address::PostalAddressSyntaxChecker;
pub use subtree_specification::{
    Refinement, SpecificExclusion, SubtreeSpecification, SubtreeSpecificationSyntaxChecker,
};
pub use telephone_number::TelephoneNumberSyntaxChecker;
