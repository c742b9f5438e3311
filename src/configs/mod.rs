//! Configuration presets module
//!
//! This module provides pre-defined region geometries for common flash layouts.

use crate::config::define_store_config;

// Single erase sector holding nothing but the counter
define_store_config! {
    name: SingleSectorConfig,
    region_size: 4 * 1024,  // one 4KB sector
    erase_block_size: 4 * 1024,
}

// Small-page internal flash (1KB pages, e.g. low-end Cortex-M0 parts)
define_store_config! {
    name: SmallPageConfig,
    region_size: 4 * 1024,  // 4 pages
    erase_block_size: 1024,
}

// 2KB-page internal flash
define_store_config! {
    name: MidPageConfig,
    region_size: 8 * 1024,  // 4 pages
    erase_block_size: 2 * 1024,
}

// Large-block QSPI flash using 64KB block erase
define_store_config! {
    name: LargeSectorConfig,
    region_size: 128 * 1024,  // 2 blocks
    erase_block_size: 64 * 1024,
}
