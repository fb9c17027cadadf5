//! BER codecs for LDAP protocol elements
//!
//! This crate provides:
//! - `extended`: request/response values of extended operations (Cancel,
//!   Graceful Shutdown) and the factories that create them by OID
//! - `attribute_value_assertion`: the `attributeDesc`/`assertionValue` pair
//!   used by search filters and compare requests

pub mod attribute_value_assertion;
pub mod extended;

pub use attribute_value_assertion::{AttributeValueAssertion, FilterType};
pub use extended::cancel::{Cancel, CancelContainer, CancelDecoder, CancelFactory, CancelResponse};
pub use extended::graceful_shutdown::{
    GracefulShutdown, GracefulShutdownContainer, GracefulShutdownDecoder,
    GracefulShutdownFactory, GracefulShutdownResponse,
};
pub use extended::ExtendedRequestFactory;
