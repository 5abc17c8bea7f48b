//! Unit tests for common utilities and data structures.

use riscv_tracesim::common::abi;
use riscv_tracesim::common::inst;
use riscv_tracesim::common::{Feature, RegisterFile};
use riscv_tracesim::core::mem::Memory;

/// Tests that register x0 is hardwired to zero.
#[test]
fn test_x0_hardwired() {
    let mut regs = RegisterFile::new();
    regs.write(0, 0xDEAD_BEEF);
    assert_eq!(regs.read(0), 0);
    regs.write(abi::REG_A0, 42);
    assert_eq!(regs.read(abi::REG_A0), 42);
}

/// Tests ABI register naming, including the fallback for unknown indices.
#[test]
fn test_reg_names() {
    assert_eq!(abi::reg_name(0), "zero");
    assert_eq!(abi::reg_name(2), "sp");
    assert_eq!(abi::reg_name(10), "a0");
    assert_eq!(abi::reg_name(99), "?99");
}

/// Tests machine string parsing into a feature descriptor.
#[test]
fn test_feature_parsing() {
    let f = Feature::from_machine("RV64IMAC").unwrap();
    assert_eq!(f.xlen(), 64);
    assert!(f.has_ext('m'));
    assert!(f.has_ext('M'));
    assert!(!f.has_ext('f'));

    assert_eq!(Feature::from_machine("rv32i").unwrap().xlen(), 32);
    assert!(Feature::from_machine("RV64").is_err());
    assert!(Feature::from_machine("X86").is_err());
}

/// Tests B-type and J-type immediate decoding against hand-assembled
/// encodings.
#[test]
fn test_branch_jump_immediates() {
    // beq zero,zero,-4
    assert_eq!(inst::imm_b(0xFE00_0EE3), -4);
    // jal ra,8
    assert_eq!(inst::imm_j(0x0080_00EF), 8);
    assert_eq!(inst::rd(0x0080_00EF), 1);
}

/// Tests I-type and S-type immediate sign extension.
#[test]
fn test_imm_sign_extension() {
    // addi a0,a0,-1
    assert_eq!(inst::imm_i(0xFFF5_0513), -1);
    // sd a1,-8(sp)
    assert_eq!(inst::imm_s(0xFEB1_3C23), -8);
}

/// Tests that out-of-range memory accesses read zero and drop writes.
#[test]
fn test_memory_bounds() {
    let mut mem = Memory::new(0x8000_0000, 0x1000);
    mem.write_u32(0x8000_0010, 0xCAFE_BABE);
    assert_eq!(mem.read_u32(0x8000_0010), 0xCAFE_BABE);

    mem.write_u32(0x8000_1000, 0x1234_5678);
    assert_eq!(mem.read_u32(0x8000_1000), 0);
    assert_eq!(mem.read_u64(0x0), 0);
    assert!(!mem.is_valid(0x8000_0FFD, 4));
    assert!(mem.is_valid(0x8000_0FFC, 4));
}

/// Tests little-endian byte ordering across access widths.
#[test]
fn test_memory_endianness() {
    let mut mem = Memory::new(0, 64);
    mem.write_u64(0, 0x1122_3344_5566_7788);
    assert_eq!(mem.read_u8(0), 0x88);
    assert_eq!(mem.read_u16(0), 0x7788);
    assert_eq!(mem.read_u32(4), 0x1122_3344);
}
