//! Schema objects
//!
//! Only what name normalization and value validation need: the normalizer
//! registry seam, syntax checkers, comparators and the NameForm object.
//! Loading schema files and resolving registries are left to callers.

mod comparators;
mod name_form;
mod normalizer;
mod syntax_checker;
pub mod syntax_checkers;

pub use comparators::{LdapComparator, StringComparator};
pub use name_form::NameForm;
pub use normalizer::{
    DeepTrimToLowerNormalizer, NoOpNormalizer, Normalizer, NormalizerMapping, OidNormalizer,
    SchemaManager,
};
#[cfg(test)]
pub use normalizer::MockSchemaManager;
pub use syntax_checker::SyntaxChecker;
