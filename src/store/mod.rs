//! Non-volatile counter store
//!
//! This module provides the store that owns the counter region and runs the
//! read, erase, program sequence that advances the counter once per boot.

pub mod counter;
pub mod state;

// Re-export main types
pub use counter::CounterStore;
pub use state::StoreState;
