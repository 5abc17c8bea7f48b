//! Common utilities and types used throughout the simulator.
//!
//! This module provides the general-purpose register file, ABI register
//! naming, and the ISA feature descriptor shared by the core, the tracer,
//! and the coprocessor dispatch logic.

/// ABI register indices and names.
pub mod abi;

/// ISA feature descriptor parsed from a machine string.
pub mod feature;

/// Instruction field extraction helpers shared by the decoder and the
/// disassembler.
pub mod inst;

/// General-purpose register file implementation.
pub mod reg;

pub use feature::Feature;
pub use reg::RegisterFile;
