//! Instruction Field Extraction.
//!
//! Opcode constants and bitfield helpers shared by the decoder in the
//! execution core and the tracer's disassembler.

/// Opcode field for LUI.
pub const OP_LUI: u32 = 0x37;
/// Opcode field for AUIPC.
pub const OP_AUIPC: u32 = 0x17;
/// Opcode field for JAL.
pub const OP_JAL: u32 = 0x6f;
/// Opcode field for JALR.
pub const OP_JALR: u32 = 0x67;
/// Opcode field for conditional branches.
pub const OP_BRANCH: u32 = 0x63;
/// Opcode field for integer loads.
pub const OP_LOAD: u32 = 0x03;
/// Opcode field for integer stores.
pub const OP_STORE: u32 = 0x23;
/// Opcode field for register-immediate ALU operations.
pub const OP_IMM: u32 = 0x13;
/// Opcode field for 32-bit register-immediate ALU operations.
pub const OP_IMM_32: u32 = 0x1b;
/// Opcode field for register-register ALU operations.
pub const OP_REG: u32 = 0x33;
/// Opcode field for 32-bit register-register ALU operations.
pub const OP_REG_32: u32 = 0x3b;
/// Opcode field for SYSTEM instructions.
pub const OP_SYSTEM: u32 = 0x73;
/// Opcode field for the custom-0 (coprocessor) space.
pub const OP_CUSTOM0: u32 = 0x0b;

/// ECALL encoding.
pub const ECALL: u32 = 0x0000_0073;
/// EBREAK encoding.
pub const EBREAK: u32 = 0x0010_0073;

/// Extracts the opcode field.
pub fn opcode(inst: u32) -> u32 {
    inst & 0x7f
}

/// Extracts the destination register index.
pub fn rd(inst: u32) -> usize {
    ((inst >> 7) & 0x1f) as usize
}

/// Extracts the first source register index.
pub fn rs1(inst: u32) -> usize {
    ((inst >> 15) & 0x1f) as usize
}

/// Extracts the second source register index.
pub fn rs2(inst: u32) -> usize {
    ((inst >> 20) & 0x1f) as usize
}

/// Extracts the funct3 field.
pub fn funct3(inst: u32) -> u32 {
    (inst >> 12) & 0x7
}

/// Extracts the funct7 field.
pub fn funct7(inst: u32) -> u32 {
    (inst >> 25) & 0x7f
}

/// Extracts the sign-extended I-type immediate.
pub fn imm_i(inst: u32) -> i64 {
    (inst as i32 >> 20) as i64
}

/// Extracts the sign-extended S-type immediate.
pub fn imm_s(inst: u32) -> i64 {
    let hi = (inst as i32 >> 25) as i64;
    let lo = ((inst >> 7) & 0x1f) as i64;
    (hi << 5) | lo
}

/// Extracts the sign-extended B-type immediate.
pub fn imm_b(inst: u32) -> i64 {
    let b12 = ((inst >> 31) & 1) as i64;
    let b11 = ((inst >> 7) & 1) as i64;
    let b10_5 = ((inst >> 25) & 0x3f) as i64;
    let b4_1 = ((inst >> 8) & 0xf) as i64;
    let val = (b12 << 12) | (b11 << 11) | (b10_5 << 5) | (b4_1 << 1);
    (val << 51) >> 51
}

/// Extracts the sign-extended J-type immediate.
pub fn imm_j(inst: u32) -> i64 {
    let b20 = ((inst >> 31) & 1) as i64;
    let b19_12 = ((inst >> 12) & 0xff) as i64;
    let b11 = ((inst >> 20) & 1) as i64;
    let b10_1 = ((inst >> 21) & 0x3ff) as i64;
    let val = (b20 << 20) | (b19_12 << 12) | (b11 << 11) | (b10_1 << 1);
    (val << 43) >> 43
}

/// Sign-extends the low `bits` bits of `val` to 64 bits.
pub fn sign_extend(val: u64, bits: u32) -> u64 {
    let shift = 64 - bits;
    ((val << shift) as i64 >> shift) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests B-type immediate reassembly including the sign bit.
    #[test]
    fn test_imm_b_sign() {
        // beq x0,x0,-4
        let inst = 0xfe00_0ee3;
        assert_eq!(imm_b(inst), -4);
    }

    /// Tests J-type immediate reassembly.
    #[test]
    fn test_imm_j() {
        // jal ra,8
        let inst = 0x0080_00ef;
        assert_eq!(imm_j(inst), 8);
        assert_eq!(rd(inst), 1);
    }
}
