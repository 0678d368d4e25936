//! # Storefront Config
//!
//! Typed configuration for the storefront translation pipeline.
//!
//! This crate provides the configuration schema, defaults, file and
//! environment loading, validation, and a lock-free cache so the mode flag
//! can be swapped at runtime.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;
pub mod validator;

pub use cache::*;
pub use loader::*;
pub use paths::*;
pub use schema::*;
pub use validator::*;
