//! Store configuration macros
//!
//! This module provides the `define_store_config!` macro for declaring
//! target-specific region geometries.

/// Macro to define a custom store configuration
///
/// Creates a unit struct implementing [`StoreConfig`](crate::config::StoreConfig)
/// with the given region and erase block sizes.
///
/// # Example
///
/// ```rust
/// use flashtally::config::{StoreConfig, define_store_config};
///
/// define_store_config! {
///     name: BoardConfig,
///     region_size: 8 * 1024,
///     erase_block_size: 2 * 1024,
/// }
///
/// assert!(BoardConfig::validate().is_ok());
/// assert_eq!(BoardConfig::block_count(), 4);
/// ```
#[macro_export]
macro_rules! define_store_config {
    (
        name: $name:ident,
        region_size: $size:expr,
        erase_block_size: $block:expr
        $(,)?
    ) => {
        /// Custom store configuration
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $crate::config::StoreConfig for $name {
            const REGION_SIZE: usize = $size;
            const ERASE_BLOCK_SIZE: usize = $block;
        }

        // Note: Call $name::validate() or ConfigValidator::validate_all::<$name>()
        // to check the geometry.
    };
}

// Re-export the macro for convenience
pub use define_store_config;
