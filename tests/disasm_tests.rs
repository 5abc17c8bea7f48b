//! Unit tests for the built-in RV64IM disassembler.

use riscv_tracesim::tracer::disasm::{Disassemble, RvDisasm};

fn disasm() -> RvDisasm {
    RvDisasm::new("RV64IM").unwrap()
}

/// Tests upper-immediate and jump forms.
#[test]
fn test_upper_and_jumps() {
    let d = disasm();
    assert_eq!(d.disassemble(0x0001_02B7), "lui t0,0x10");
    assert_eq!(d.disassemble(0x0000_0517), "auipc a0,0x0");
    assert_eq!(d.disassemble(0x0080_00EF), "jal ra,8");
    assert_eq!(d.disassemble(0x0000_8067), "jalr zero,0(ra)");
}

/// Tests branch mnemonics and signed offsets.
#[test]
fn test_branches() {
    let d = disasm();
    assert_eq!(d.disassemble(0xFE00_0EE3), "beq zero,zero,-4");
    assert_eq!(d.disassemble(0x00B5_1463), "bne a0,a1,8");
}

/// Tests load and store forms with signed displacements.
#[test]
fn test_loads_stores() {
    let d = disasm();
    assert_eq!(d.disassemble(0x0001_3283), "ld t0,0(sp)");
    assert_eq!(d.disassemble(0xFEB1_3C23), "sd a1,-8(sp)");
    assert_eq!(d.disassemble(0x0001_4503), "lbu a0,0(sp)");
}

/// Tests immediate ALU forms, including the canonical nop.
#[test]
fn test_imm_alu() {
    let d = disasm();
    assert_eq!(d.disassemble(0x0000_0013), "nop");
    assert_eq!(d.disassemble(0x0420_0293), "addi t0,zero,66");
    assert_eq!(d.disassemble(0x0031_1113), "slli sp,sp,3");
    assert_eq!(d.disassemble(0x0035_151B), "slliw a0,a0,3");
}

/// Tests register ALU forms.
#[test]
fn test_reg_alu() {
    let d = disasm();
    assert_eq!(d.disassemble(0x00B5_0533), "add a0,a0,a1");
    assert_eq!(d.disassemble(0x40B5_0533), "sub a0,a0,a1");
    assert_eq!(d.disassemble(0x02B5_0533), "mul a0,a0,a1");
    assert_eq!(d.disassemble(0x00B5_053B), "addw a0,a0,a1");
}

/// Tests system encodings.
#[test]
fn test_system() {
    let d = disasm();
    assert_eq!(d.disassemble(0x0000_0073), "ecall");
    assert_eq!(d.disassemble(0x0010_0073), "ebreak");
}

/// Tests the custom-0 coprocessor rendering.
#[test]
fn test_custom0() {
    let d = disasm();
    // funct3 0, rd=t2, rs1=t0, rs2=t1
    assert_eq!(d.disassemble(0x0062_838B), "custom0 t2,t0,t1");
}

/// Tests that unknown encodings degrade to a raw word directive.
#[test]
fn test_unknown_word() {
    let d = disasm();
    assert_eq!(d.disassemble(0xFFFF_FFFF), ".word 0xffffffff");
    assert_eq!(d.disassemble(0x0000_0000), ".word 0x00000000");
}
