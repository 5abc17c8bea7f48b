//! RISC-V ABI Register Naming.
//!
//! This module defines the standard ABI indices and names for the 32
//! general-purpose registers. The tracer renders register operands with
//! these names; indices outside the architectural range fall back to a
//! `?N` placeholder rather than failing.

/// Index of the hardwired zero register (x0).
pub const REG_ZERO: usize = 0;

/// Index of the return address register (x1 / ra).
pub const REG_RA: usize = 1;

/// Index of the stack pointer register (x2 / sp).
pub const REG_SP: usize = 2;

/// Index of the first argument/return register (x10 / a0).
pub const REG_A0: usize = 10;

/// Index of the second argument register (x11 / a1).
pub const REG_A1: usize = 11;

/// Index of the syscall number register (x17 / a7).
pub const REG_A7: usize = 17;

/// ABI names for the 32 general-purpose registers (x0-x31).
pub const XPR_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1",
    "a2", "a3", "a4", "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7",
    "s8", "s9", "s10", "s11", "t3", "t4", "t5", "t6",
];

/// Returns the ABI name for a register index.
///
/// Indices 0-31 map to the standard ABI names; anything larger renders
/// as `?N` so a malformed capture still produces a readable token.
pub fn reg_name(r: u64) -> String {
    match usize::try_from(r) {
        Ok(idx) if idx < 32 => XPR_NAMES[idx].to_string(),
        _ => format!("?{}", r),
    }
}
