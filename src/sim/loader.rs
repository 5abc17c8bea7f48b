//! Binary loader.
//!
//! Loads flat program binaries from disk and places them into simulated
//! RAM, setting up the initial core state for direct execution.

use std::fs;
use std::process;

use crate::common::abi;
use crate::config::Config;
use crate::core::Proc;

/// Loads a binary file from disk into memory.
pub fn load_binary(path: &str) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not read file '{}': {}", path, e);
        process::exit(1);
    })
}

/// Places a flat binary at the RAM base and points the core at it.
///
/// The stack pointer is seeded 16 MiB above the load address, clamped to
/// the top of RAM for small memory configurations.
pub fn setup_direct_load(proc: &mut Proc, config: &Config, bin_data: &[u8]) {
    let load_addr = config.memory.ram_base_val();
    let ram_top = load_addr + config.memory.ram_size_val() as u64;

    println!(
        "[Loader] Writing {} bytes to {:#x}",
        bin_data.len(),
        load_addr
    );
    proc.mem.borrow_mut().load_binary_at(bin_data, load_addr);
    proc.pc = load_addr;

    let stack_top = ram_top.min(load_addr + 0x100_0000);
    proc.regs.borrow_mut().write(abi::REG_SP, stack_top);
}
