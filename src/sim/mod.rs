//! Simulation harness and binary loading.
//!
//! This module provides utilities for loading flat program binaries into
//! simulated memory and a run helper that drives the core cycle-by-cycle
//! until the guest program exits and the coprocessor drains.

pub mod loader;

use crate::core::Proc;

/// Runs the core until the guest exits or `max_cycles` elapses.
///
/// Each iteration is one full simulated cycle: instruction retirement,
/// trace emission, and one coprocessor tick. After the guest signals
/// exit, the loop keeps ticking so an attached coprocessor can drain its
/// queue before the exit code is surfaced. Returns `Ok(Some(code))` on a
/// clean exit, `Ok(None)` if the cycle budget ran out, and `Err` on a
/// fatal trap.
pub fn run_to_exit(proc: &mut Proc, max_cycles: u64) -> Result<Option<u64>, String> {
    while proc.stats.cycles < max_cycles {
        proc.tick()?;
        if let Some(code) = proc.take_exit() {
            proc.teardown();
            return Ok(Some(code));
        }
    }
    Ok(None)
}
