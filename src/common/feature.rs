//! ISA Feature Descriptor.
//!
//! This module parses a RISC-V machine string (e.g. `RV64IMAC`) into a
//! feature descriptor. The descriptor is shared with attached coprocessors
//! so delegated execution can respect the configured word width and
//! extension set, and it drives disassembler construction.

/// Extension letter for the base integer ISA.
const EXT_I: char = 'i';

/// Parsed ISA feature descriptor.
///
/// Holds the machine string, the register width (32 or 64), and the set of
/// single-letter extensions. Shared by the core, the tracer's disassembler,
/// and any attached coprocessor.
#[derive(Clone, Debug)]
pub struct Feature {
    machine: String,
    xlen: u32,
    extensions: Vec<char>,
}

impl Feature {
    /// Parses a machine string of the form `RV32...` or `RV64...`.
    ///
    /// Returns `Err` with a description when the prefix is not a valid
    /// RISC-V machine designation or the base integer extension is missing.
    pub fn from_machine(machine: &str) -> Result<Self, String> {
        let lower = machine.to_ascii_lowercase();
        let rest = lower
            .strip_prefix("rv")
            .ok_or_else(|| format!("invalid machine string: {}", machine))?;

        let (xlen, exts) = if let Some(e) = rest.strip_prefix("64") {
            (64, e)
        } else if let Some(e) = rest.strip_prefix("32") {
            (32, e)
        } else {
            return Err(format!("unsupported register width in: {}", machine));
        };

        let extensions: Vec<char> = exts.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        if !extensions.contains(&EXT_I) {
            return Err(format!("missing base integer extension in: {}", machine));
        }

        Ok(Self {
            machine: machine.to_string(),
            xlen,
            extensions,
        })
    }

    /// Returns the original machine string.
    pub fn machine(&self) -> &str {
        &self.machine
    }

    /// Returns the register width in bits (32 or 64).
    pub fn xlen(&self) -> u32 {
        self.xlen
    }

    /// Returns true if the given single-letter extension is present.
    pub fn has_ext(&self, ext: char) -> bool {
        self.extensions.contains(&ext.to_ascii_lowercase())
    }
}
