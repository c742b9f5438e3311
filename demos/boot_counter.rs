//! Boot counter on simulated flash
//!
//! Reserves the counter region in the image, maps a simulated device over it
//! seeded from the reservation's build-time bytes, then runs the boot routine
//! once per simulated reset.
//!
//! Run with: `cargo run --example boot_counter -- [resets]`

use flashtally::prelude::*;
use std::fmt;
use std::io::{self, Write as _};

reserve_region! {
    /// Counter region shipped with the image
    static COUNTER_REGION: DefaultConfig;
}

const SIZE: usize = DefaultConfig::REGION_SIZE;

/// Adapts stdout to the `core::fmt::Write` sink the boot routine expects
struct Console(io::Stdout);

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

fn main() -> Result<(), StoreError> {
    let resets: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3);

    let region = COUNTER_REGION.region(DefaultConfig::ERASE_BLOCK_SIZE)?;

    // The device outlives every simulated reset
    let mut flash = Box::new(RamMedium::<SIZE>::from_image(
        region.base_address(),
        DefaultConfig::ERASE_BLOCK_SIZE,
        COUNTER_REGION.image(),
    ));
    let mut staging = Box::new(StagingBuffer::<SIZE>::new());
    let mut console = Console(io::stdout());

    for reset in 0..resets {
        println!("-- reset {}", reset);
        run_boot_cycle(&mut *flash, region, &mut *staging, &mut console)?;
    }

    let stats = flash.stats();
    println!(
        "{} erases, {} blocks erased, {} bytes programmed",
        stats.erases, stats.blocks_erased, stats.bytes_programmed
    );

    Ok(())
}
