//! Unit tests for ALU operations.

use riscv_tracesim::core::alu::{Alu, AluOp};

/// Tests 64-bit addition operations.
#[test]
fn test_alu_add() {
    assert_eq!(Alu::execute(AluOp::Add, 10, 20, false), 30);
    assert_eq!(Alu::execute(AluOp::Add, 0xFFFF_FFFF_FFFF_FFFF, 1, false), 0);
}

/// Tests 32-bit addition operations with sign extension.
#[test]
fn test_alu_add_32bit() {
    assert_eq!(Alu::execute(AluOp::Add, 10, 20, true), 30);
    assert_eq!(
        Alu::execute(AluOp::Add, 0x7FFF_FFFF, 1, true),
        0xFFFF_FFFF_8000_0000
    );
}

/// Tests 64-bit subtraction operations.
#[test]
fn test_alu_sub() {
    assert_eq!(Alu::execute(AluOp::Sub, 30, 10, false), 20);
    assert_eq!(
        Alu::execute(AluOp::Sub, 0, 1, false),
        0xFFFF_FFFF_FFFF_FFFF
    );
}

/// Tests logical shift operations.
#[test]
fn test_alu_shifts() {
    assert_eq!(Alu::execute(AluOp::Sll, 1, 3, false), 8);
    assert_eq!(
        Alu::execute(AluOp::Srl, 0x8000_0000_0000_0000, 1, false),
        0x4000_0000_0000_0000
    );
    assert_eq!(
        Alu::execute(AluOp::Sra, 0x8000_0000_0000_0000, 63, false),
        0xFFFF_FFFF_FFFF_FFFF
    );
}

/// Tests 32-bit shift operations with sign extension.
#[test]
fn test_alu_shifts_32bit() {
    assert_eq!(
        Alu::execute(AluOp::Sll, 1, 31, true),
        0xFFFF_FFFF_8000_0000
    );
    assert_eq!(Alu::execute(AluOp::Srl, 0x8000_0000, 31, true), 1);
    assert_eq!(
        Alu::execute(AluOp::Sra, 0x8000_0000, 4, true),
        0xFFFF_FFFF_F800_0000
    );
}

/// Tests comparison operations.
#[test]
fn test_alu_compare() {
    assert_eq!(
        Alu::execute(AluOp::Slt, (-1i64) as u64, 1, false),
        1
    );
    assert_eq!(
        Alu::execute(AluOp::Sltu, (-1i64) as u64, 1, false),
        0
    );
}

/// Tests logical operations.
#[test]
fn test_alu_logic() {
    assert_eq!(Alu::execute(AluOp::Xor, 0xF0F0, 0x0FF0, false), 0xFF00);
    assert_eq!(Alu::execute(AluOp::Or, 0xF000, 0x000F, false), 0xF00F);
    assert_eq!(Alu::execute(AluOp::And, 0xFF00, 0x0FF0, false), 0x0F00);
}

/// Tests multiplication including signed high halves.
#[test]
fn test_alu_multiply() {
    assert_eq!(Alu::execute(AluOp::Mul, 7, 6, false), 42);
    assert_eq!(
        Alu::execute(AluOp::Mulh, (-1i64) as u64, (-1i64) as u64, false),
        0
    );
    assert_eq!(
        Alu::execute(AluOp::Mulhu, (-1i64) as u64, (-1i64) as u64, false),
        0xFFFF_FFFF_FFFF_FFFE
    );
}

/// Tests division semantics including divide-by-zero results.
#[test]
fn test_alu_divide() {
    assert_eq!(Alu::execute(AluOp::Div, 42, 6, false), 7);
    assert_eq!(
        Alu::execute(AluOp::Div, 42, 0, false),
        0xFFFF_FFFF_FFFF_FFFF
    );
    assert_eq!(
        Alu::execute(AluOp::Div, (-42i64) as u64, 6, false),
        (-7i64) as u64
    );
    assert_eq!(
        Alu::execute(AluOp::Divu, 42, 0, false),
        0xFFFF_FFFF_FFFF_FFFF
    );
}

/// Tests remainder semantics including remainder-by-zero results.
#[test]
fn test_alu_remainder() {
    assert_eq!(Alu::execute(AluOp::Rem, 43, 6, false), 1);
    assert_eq!(Alu::execute(AluOp::Rem, 43, 0, false), 43);
    assert_eq!(Alu::execute(AluOp::Remu, 43, 0, false), 43);
    assert_eq!(
        Alu::execute(AluOp::Rem, (-43i64) as u64, 6, false),
        (-1i64) as u64
    );
}
