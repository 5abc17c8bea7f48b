//! RISC-V Instruction Tracer and Coprocessor Dispatch Library.
//!
//! This crate implements the diagnostic subsystem of a cycle-accurate RISC-V
//! simulator: an instruction-level execution tracer and a cycle-stepped
//! coprocessor dispatcher, together with a minimal single-issue core that
//! drives both for end-to-end simulation.
//!
//! # Architecture
//!
//! * **Tracer**: captures every register/memory/PC effect of each retired
//!   instruction and renders one formatted line per instruction, gated by
//!   in-band magic instructions or absolute cycle bounds.
//! * **Coprocessor**: a uniform issue/clock/done interface over independently
//!   clocked backends (FIFO dispatcher, accelerator bridge).
//! * **Core**: single-issue RV64IM subset executor that feeds the tracer and
//!   hands custom-opcode instructions to the attached coprocessor.
//!
//! # Modules
//!
//! * `common`: shared types, register file, feature descriptor.
//! * `config`: configuration loading and parsing.
//! * `coproc`: coprocessor dispatch interface and variants.
//! * `core`: execution core, ALU, and flat memory.
//! * `sim`: simulation harness and binary loader.
//! * `stats`: simulation statistics collection.
//! * `tracer`: execution tracer, trace controls, and disassembly.

/// Shared types, register definitions, and the feature descriptor.
///
/// Provides fundamental data structures used throughout the simulator,
/// including the general-purpose register file and ABI register names.
pub mod common;

/// Configuration system for the tracer, coprocessor, and memory settings.
///
/// Loads and parses TOML configuration files to customize simulator behavior
/// for different simulation scenarios.
pub mod config;

/// Coprocessor dispatch interface and backend variants.
///
/// Defines the uniform per-cycle issue/clock/done contract between the core
/// and attached coprocessor engines, plus the FIFO dispatcher and the
/// accelerator bridge implementations.
pub mod coproc;

/// Execution core, integer ALU, and flat memory model.
///
/// Implements a minimal single-issue RV64IM core with trace hooks at every
/// architectural effect and coprocessor hand-off for custom-opcode
/// instructions.
pub mod core;

/// Simulation harness, binary loader, and run loop.
pub mod sim;

/// Simulation statistics collection and reporting.
pub mod stats;

/// Instruction-level execution tracer.
///
/// Captures per-instruction effects in code order, interprets in-band trace
/// controls (magic instructions, cycle bounds), and renders one diagnostic
/// line per retired instruction.
pub mod tracer;
