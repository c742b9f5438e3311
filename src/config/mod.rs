//! Store configuration module for flashtally
//!
//! This module provides compile-time configuration of the counter region
//! geometry, its validation, and the `define_store_config!` macro.

pub mod macros;
pub mod store;
pub mod validation;

// Re-export main types
pub use macros::define_store_config;
pub use store::{DefaultConfig, StoreConfig};
pub use validation::ConfigValidator;
