//! Core types and utilities for the LDAP directory-protocol crates
//!
//! This crate provides the error type shared by every layer, the attribute
//! [`Value`] type (string or binary) and a few string helpers used by the
//! name model and the codec.

pub mod error;
pub mod strings;
pub mod value;

pub use error::{LdapError, LdapResult};
pub use value::Value;
