//! Execution Core.
//!
//! A minimal single-issue RV64IM core. Each cycle it fetches, executes, and
//! retires one instruction, pushing every architectural effect into the
//! attached tracer and handing custom-opcode instructions to the attached
//! coprocessor.

/// Integer ALU and operation types.
pub mod alu;

/// Flat memory model.
pub mod mem;

/// Single-issue execution core.
pub mod proc;

pub use proc::Proc;

/// Fatal execution traps.
///
/// The core runs bare-metal: any trap ends the simulation with a
/// diagnostic rather than vectoring to a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trap {
    /// The program counter was not 4-byte aligned.
    InstructionAddressMisaligned(u64),
    /// The program counter left the RAM region.
    InstructionAccessFault(u64),
    /// The instruction encoding is not implemented.
    IllegalInstruction(u32),
    /// An EBREAK was executed.
    Breakpoint(u64),
}
