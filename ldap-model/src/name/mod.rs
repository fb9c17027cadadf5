//! Distinguished names
//!
//! A DN is a sequence of RDNs, an RDN a set of AVAs (`type=value` pairs).
//! Every level keeps the user-provided text next to its normalized form;
//! equality, ordering and hashing only ever look at the normalized form.

mod ava;
mod dn;
mod escape;
mod rdn;
mod rdn_builder;
mod rdn_parser;

pub use ava::Ava;
pub use dn::Dn;
pub use escape::{escape_value, escape_value_bytes, unescape_value};
pub use rdn::{Normalization, Rdn};
pub use rdn_builder::RdnBuilder;
