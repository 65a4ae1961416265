//! Link registry orchestration.
//!
//! This crate implements batch link creation and redirect resolution on
//! top of a [`LinkStore`][waypoint_core::LinkStore]: code generation and
//! input validation, uniqueness enforcement, expiry policy, and audit
//! event emission.

pub mod codegen;
pub mod error;
pub mod registry;
pub mod sink;

pub use codegen::{
    validate_custom_code, validate_url, validate_validity, CodeGenerator, RandomGenerator,
    DEFAULT_VALIDITY_MINUTES,
};
pub use error::{RedirectError, RegistryError};
pub use registry::{LinkRegistry, LinkRequest, RegistrySettings};
pub use sink::TracingSink;
