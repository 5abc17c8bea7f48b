//! Instruction Disassembly.
//!
//! This module defines the disassembly collaborator interface used by the
//! tracer and a built-in RV64IM backend covering the subset the core
//! executes. The backend is best-effort: any encoding it does
//! not recognize renders as a raw `.word` directive, and a machine string it
//! cannot parse simply leaves the tracer in raw-hex mode. Disassembly
//! problems never surface as errors.

use crate::common::abi;
use crate::common::inst::{
    self, imm_b, imm_i, imm_j, imm_s, OP_AUIPC, OP_BRANCH, OP_CUSTOM0, OP_IMM, OP_IMM_32, OP_JAL,
    OP_JALR, OP_LOAD, OP_LUI, OP_REG, OP_REG_32, OP_STORE, OP_SYSTEM,
};
use crate::common::Feature;

/// Disassembly collaborator interface.
///
/// Converts a raw 32-bit instruction word to display text. The tracer treats
/// the backend as optional: when none is attached it renders the raw hex
/// word instead.
pub trait Disassemble {
    /// Returns display text for the given instruction word.
    fn disassemble(&self, inst: u32) -> String;
}

/// Built-in RV64IM disassembler.
///
/// Covers the base integer subset plus the M extension when the feature
/// descriptor carries it. Unknown encodings render as `.word 0x...`.
pub struct RvDisasm {
    has_mul: bool,
}

impl RvDisasm {
    /// Builds a disassembler for the given machine string.
    ///
    /// Fails when the machine string does not describe a RISC-V target the
    /// backend understands; the caller is expected to degrade to raw-hex
    /// rendering in that case.
    pub fn new(machine: &str) -> Result<Self, String> {
        let feature = Feature::from_machine(machine)?;
        if feature.xlen() != 64 {
            return Err(format!("unsupported xlen {} for {}", feature.xlen(), machine));
        }
        Ok(Self {
            has_mul: feature.has_ext('m'),
        })
    }
}

fn word(inst: u32) -> String {
    format!(".word 0x{:08x}", inst)
}

impl Disassemble for RvDisasm {
    fn disassemble(&self, inst: u32) -> String {
        let funct3 = inst::funct3(inst);
        let funct7 = inst::funct7(inst);
        let rd_n = abi::reg_name(inst::rd(inst) as u64);
        let rs1_n = abi::reg_name(inst::rs1(inst) as u64);
        let rs2_n = abi::reg_name(inst::rs2(inst) as u64);

        match inst::opcode(inst) {
            OP_LUI => format!("lui {},0x{:x}", rd_n, inst >> 12),
            OP_AUIPC => format!("auipc {},0x{:x}", rd_n, inst >> 12),
            OP_JAL => format!("jal {},{}", rd_n, imm_j(inst)),
            OP_JALR => format!("jalr {},{}({})", rd_n, imm_i(inst), rs1_n),
            OP_BRANCH => {
                let mn = match funct3 {
                    0x0 => "beq",
                    0x1 => "bne",
                    0x4 => "blt",
                    0x5 => "bge",
                    0x6 => "bltu",
                    0x7 => "bgeu",
                    _ => return word(inst),
                };
                format!("{} {},{},{}", mn, rs1_n, rs2_n, imm_b(inst))
            }
            OP_LOAD => {
                let mn = match funct3 {
                    0x0 => "lb",
                    0x1 => "lh",
                    0x2 => "lw",
                    0x3 => "ld",
                    0x4 => "lbu",
                    0x5 => "lhu",
                    0x6 => "lwu",
                    _ => return word(inst),
                };
                format!("{} {},{}({})", mn, rd_n, imm_i(inst), rs1_n)
            }
            OP_STORE => {
                let mn = match funct3 {
                    0x0 => "sb",
                    0x1 => "sh",
                    0x2 => "sw",
                    0x3 => "sd",
                    _ => return word(inst),
                };
                format!("{} {},{}({})", mn, rs2_n, imm_s(inst), rs1_n)
            }
            OP_IMM => {
                let shamt = (inst >> 20) & 0x3f;
                match funct3 {
                    0x0 if inst == 0x0000_0013 => "nop".to_string(),
                    0x0 => format!("addi {},{},{}", rd_n, rs1_n, imm_i(inst)),
                    0x2 => format!("slti {},{},{}", rd_n, rs1_n, imm_i(inst)),
                    0x3 => format!("sltiu {},{},{}", rd_n, rs1_n, imm_i(inst)),
                    0x4 => format!("xori {},{},{}", rd_n, rs1_n, imm_i(inst)),
                    0x6 => format!("ori {},{},{}", rd_n, rs1_n, imm_i(inst)),
                    0x7 => format!("andi {},{},{}", rd_n, rs1_n, imm_i(inst)),
                    0x1 if funct7 >> 1 == 0x00 => {
                        format!("slli {},{},{}", rd_n, rs1_n, shamt)
                    }
                    0x5 if funct7 >> 1 == 0x00 => {
                        format!("srli {},{},{}", rd_n, rs1_n, shamt)
                    }
                    0x5 if funct7 >> 1 == 0x10 => {
                        format!("srai {},{},{}", rd_n, rs1_n, shamt)
                    }
                    _ => word(inst),
                }
            }
            OP_IMM_32 => match funct3 {
                0x0 => format!("addiw {},{},{}", rd_n, rs1_n, imm_i(inst)),
                0x1 if funct7 == 0x00 => {
                    format!("slliw {},{},{}", rd_n, rs1_n, inst::rs2(inst))
                }
                0x5 if funct7 == 0x00 => {
                    format!("srliw {},{},{}", rd_n, rs1_n, inst::rs2(inst))
                }
                0x5 if funct7 == 0x20 => {
                    format!("sraiw {},{},{}", rd_n, rs1_n, inst::rs2(inst))
                }
                _ => word(inst),
            },
            OP_REG => {
                let mn = match (funct7, funct3) {
                    (0x00, 0x0) => "add",
                    (0x20, 0x0) => "sub",
                    (0x00, 0x1) => "sll",
                    (0x00, 0x2) => "slt",
                    (0x00, 0x3) => "sltu",
                    (0x00, 0x4) => "xor",
                    (0x00, 0x5) => "srl",
                    (0x20, 0x5) => "sra",
                    (0x00, 0x6) => "or",
                    (0x00, 0x7) => "and",
                    (0x01, 0x0) if self.has_mul => "mul",
                    (0x01, 0x1) if self.has_mul => "mulh",
                    (0x01, 0x2) if self.has_mul => "mulhsu",
                    (0x01, 0x3) if self.has_mul => "mulhu",
                    (0x01, 0x4) if self.has_mul => "div",
                    (0x01, 0x5) if self.has_mul => "divu",
                    (0x01, 0x6) if self.has_mul => "rem",
                    (0x01, 0x7) if self.has_mul => "remu",
                    _ => return word(inst),
                };
                format!("{} {},{},{}", mn, rd_n, rs1_n, rs2_n)
            }
            OP_REG_32 => {
                let mn = match (funct7, funct3) {
                    (0x00, 0x0) => "addw",
                    (0x20, 0x0) => "subw",
                    (0x00, 0x1) => "sllw",
                    (0x00, 0x5) => "srlw",
                    (0x20, 0x5) => "sraw",
                    (0x01, 0x0) if self.has_mul => "mulw",
                    (0x01, 0x4) if self.has_mul => "divw",
                    (0x01, 0x5) if self.has_mul => "divuw",
                    (0x01, 0x6) if self.has_mul => "remw",
                    (0x01, 0x7) if self.has_mul => "remuw",
                    _ => return word(inst),
                };
                format!("{} {},{},{}", mn, rd_n, rs1_n, rs2_n)
            }
            OP_SYSTEM => match inst {
                0x0000_0073 => "ecall".to_string(),
                0x0010_0073 => "ebreak".to_string(),
                _ => word(inst),
            },
            OP_CUSTOM0 => format!("custom0 {},{},{}", rd_n, rs1_n, rs2_n),
            _ => word(inst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests machine string validation.
    #[test]
    fn test_machine_parsing() {
        assert!(RvDisasm::new("RV64IMAC").is_ok());
        assert!(RvDisasm::new("rv64gc").is_err()); // no explicit base 'i'
        assert!(RvDisasm::new("RV128I").is_err());
        assert!(RvDisasm::new("ARMV8").is_err());
    }

    /// Tests that the M extension gates multiply mnemonics.
    #[test]
    fn test_mul_gated_by_extension() {
        let with_m = RvDisasm::new("RV64IM").unwrap();
        let without_m = RvDisasm::new("RV64I").unwrap();
        let mul = 0x02b5_0533; // mul a0,a0,a1
        assert_eq!(with_m.disassemble(mul), "mul a0,a0,a1");
        assert_eq!(without_m.disassemble(mul), ".word 0x02b50533");
    }
}
