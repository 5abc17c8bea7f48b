//! Test module organization.
//!
//! This module organizes all integration tests for the trace simulator.

/// ALU (Arithmetic Logic Unit) instruction tests.
mod alu_tests;

/// Common utility and register file tests.
mod common_tests;

/// Coprocessor dispatch and accelerator bridge tests.
mod coproc_tests;

/// Disassembler output tests.
mod disasm_tests;
