//! Failure modes of the update cycle
//!
//! Walks through each injected device fault and shows what the next boot
//! finds in the region afterwards.
//!
//! Run with: `cargo run --example fault_injection`

use flashtally::prelude::*;

const BLOCK: usize = 1024;

type Flash = RamMedium<{ SmallPageConfig::REGION_SIZE }>;
type Staging = StagingBuffer<{ SmallPageConfig::REGION_SIZE }>;

fn region() -> StorageRegion {
    // Device origin and region base coincide
    SmallPageConfig::region_at(0).unwrap_or_else(|err| panic!("preset geometry: {}", err))
}

fn fresh_flash() -> Flash {
    Flash::provisioned(0, BLOCK)
}

fn boot(flash: &mut Flash, label: &str) {
    let mut staging = Staging::new();
    let mut console = String::new();
    let result = run_boot_cycle(flash, region(), &mut staging, &mut console);
    print!("{:<18} {}", label, console.replace('\n', " | "));
    match result {
        Ok(report) => println!("-> stored {}", report.current),
        Err(err) => println!("-> {} error, inconsistent: {}", err.category(), err.leaves_region_inconsistent()),
    }
}

fn inspect(flash: &mut Flash) {
    let mut staging = Staging::new();
    let mut console = String::new();
    let _ = report_counter(flash, region(), &mut staging, &mut console);
    print!("{:<18} {}", "next boot sees", console);
}

fn main() {
    println!("== clean boots");
    let mut flash = fresh_flash();
    boot(&mut flash, "boot");
    boot(&mut flash, "boot");

    println!("== read fault");
    flash.fail_next_read();
    boot(&mut flash, "boot");
    inspect(&mut flash);

    println!("== erase fault");
    flash.fail_next_erase();
    boot(&mut flash, "boot");
    inspect(&mut flash);

    println!("== torn program");
    let mut flash = fresh_flash();
    boot(&mut flash, "boot");
    flash.tear_next_program(2);
    boot(&mut flash, "boot");
    inspect(&mut flash);

    println!("== counter at maximum");
    let mut flash = fresh_flash();
    if let Err(err) = flash.preload(0, &u32::MAX.to_le_bytes()) {
        println!("preload failed: {}", err);
        return;
    }
    boot(&mut flash, "boot");
    inspect(&mut flash);
}
