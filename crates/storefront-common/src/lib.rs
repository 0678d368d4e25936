//! # Storefront Common
//!
//! Shared types and errors for the storefront i18n workspace.
//!
//! This crate provides the translation domain vocabulary (locales,
//! namespaces, namespaced keys and interpolation parameters) used by the
//! configuration, engine and resolver crates.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::*;
pub use types::*;
