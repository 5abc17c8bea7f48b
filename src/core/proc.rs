//! Single-Issue Execution Core.
//!
//! Fetches, executes, and retires one RV64IM instruction per cycle. Every
//! architectural effect (register read/write, memory load/store, PC write)
//! is pushed into the tracer in code order; the trace controls are
//! evaluated and the line rendered once per retired instruction.
//! Instructions in the custom-0 opcode space are not executed here: they
//! are issued to the attached coprocessor, which is clocked once per core
//! cycle after issue.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::inst::{
    self, imm_b, imm_i, imm_j, imm_s, sign_extend, EBREAK, ECALL, OP_AUIPC, OP_BRANCH, OP_CUSTOM0,
    OP_IMM, OP_IMM_32, OP_JAL, OP_JALR, OP_LOAD, OP_LUI, OP_REG, OP_REG_32, OP_STORE, OP_SYSTEM,
};
use crate::common::{abi, Feature, RegisterFile};
use crate::config::Config;
use crate::coproc::{self, CoProc};
use crate::core::alu::{Alu, AluOp};
use crate::core::mem::Memory;
use crate::core::Trap;
use crate::stats::SimStats;
use crate::tracer::Tracer;

/// Linux-style exit syscall number.
const SYS_EXIT: u64 = 93;

/// Single-issue execution core with attached tracer and coprocessor.
pub struct Proc {
    pub regs: Rc<RefCell<RegisterFile>>,
    pub mem: Rc<RefCell<Memory>>,
    pub feature: Rc<Feature>,
    pub pc: u64,
    pub tracer: Tracer,
    pub coproc: Option<Box<dyn CoProc>>,
    pub stats: SimStats,
    exit_code: Option<u64>,
}

impl Proc {
    /// Builds a core from configuration.
    ///
    /// Fails only when the configured machine string is not a valid RISC-V
    /// designation; tracer degradations (unattachable disassembler) are
    /// absorbed per the tracer contract.
    pub fn new(config: &Config) -> Result<Self, String> {
        let feature = Rc::new(Feature::from_machine(&config.general.machine)?);

        let mut tracer = Tracer::new("core0");
        tracer.set_disassembler(feature.machine());
        tracer.set_start_cycle(config.tracer.start_cycle);
        tracer.set_cycle_limit(config.tracer.cycle_limit);
        tracer.set_output_enable(config.tracer.trace_instructions);

        Ok(Self {
            regs: Rc::new(RefCell::new(RegisterFile::new())),
            mem: Rc::new(RefCell::new(Memory::new(
                config.memory.ram_base_val(),
                config.memory.ram_size_val(),
            ))),
            feature,
            pc: config.general.start_pc_val(),
            tracer,
            coproc: coproc::from_config(&config.coproc),
            stats: SimStats::default(),
            exit_code: None,
        })
    }

    /// Advances the simulation by one cycle.
    ///
    /// Retires at most one instruction, then evaluates the trace controls,
    /// emits the trace line, and clocks the attached coprocessor. After the
    /// core has completed, further ticks only drain the coprocessor.
    pub fn tick(&mut self) -> Result<(), String> {
        self.stats.cycles += 1;
        let cycle = self.stats.cycles;

        if self.exit_code.is_some() {
            if let Some(cp) = self.coproc.as_mut() {
                cp.clock_tick(cycle);
            }
            return Ok(());
        }

        let pc = self.pc;
        if pc % 4 != 0 {
            self.stats.traps_taken += 1;
            return Err(format!("{:?}", Trap::InstructionAddressMisaligned(pc)));
        }
        if !self.mem.borrow().is_valid(pc, 4) {
            self.stats.traps_taken += 1;
            return Err(format!("{:?}", Trap::InstructionAccessFault(pc)));
        }
        let inst = self.mem.borrow().read_u32(pc);

        self.tracer.set_fetched_inst(pc, inst);

        match self.execute(pc, inst) {
            Ok(next_pc) => {
                self.tracer.pc_write(next_pc);
                self.pc = next_pc;
                self.stats.instructions_retired += 1;
            }
            Err(trap) => {
                self.stats.traps_taken += 1;
                return Err(format!("{:?}", trap));
            }
        }

        self.tracer.check_user_controls(cycle);
        self.tracer.trace(cycle);
        self.stats.trace_lines = self.tracer.lines_emitted();

        if let Some(cp) = self.coproc.as_mut() {
            cp.clock_tick(cycle);
        }
        Ok(())
    }

    /// Returns the exit code once the core has completed and every attached
    /// coprocessor reports done.
    pub fn take_exit(&mut self) -> Option<u64> {
        if self.exit_code.is_some() && self.coproc_done() {
            self.exit_code.take()
        } else {
            None
        }
    }

    /// Returns true when no attached coprocessor has pending work.
    pub fn coproc_done(&self) -> bool {
        self.coproc.as_ref().map_or(true, |cp| cp.is_done())
    }

    /// Tears down the attached coprocessor and folds its retirement count
    /// into the statistics. Invoked once when the core completes.
    pub fn teardown(&mut self) {
        if let Some(cp) = self.coproc.as_mut() {
            cp.teardown();
            self.stats.coproc_retired = cp.retired();
        }
    }

    /// Dumps the program counter and register file after a fatal trap.
    pub fn dump_state(&self) {
        println!("PC = {:#018x}", self.pc);
        self.regs.borrow().dump();
    }

    fn read_reg(&mut self, r: usize) -> u64 {
        let v = self.regs.borrow().read(r);
        self.tracer.reg_read(r as u64, v);
        v
    }

    fn write_reg(&mut self, r: usize, v: u64) {
        self.regs.borrow_mut().write(r, v);
        self.tracer.reg_write(r as u64, v);
    }

    fn execute(&mut self, pc: u64, inst: u32) -> Result<u64, Trap> {
        let opcode = inst::opcode(inst);
        let rd = inst::rd(inst);
        let rs1 = inst::rs1(inst);
        let rs2 = inst::rs2(inst);
        let funct3 = inst::funct3(inst);
        let funct7 = inst::funct7(inst);
        let mut next_pc = pc.wrapping_add(4);

        match opcode {
            OP_LUI => {
                self.write_reg(rd, (inst & 0xffff_f000) as i32 as i64 as u64);
                self.stats.inst_alu += 1;
            }
            OP_AUIPC => {
                let val = pc.wrapping_add((inst & 0xffff_f000) as i32 as i64 as u64);
                self.write_reg(rd, val);
                self.stats.inst_alu += 1;
            }
            OP_JAL => {
                self.write_reg(rd, next_pc);
                next_pc = pc.wrapping_add(imm_j(inst) as u64);
                self.stats.inst_branch += 1;
            }
            OP_JALR => {
                let target = self
                    .read_reg(rs1)
                    .wrapping_add(imm_i(inst) as u64)
                    & !1;
                self.write_reg(rd, next_pc);
                next_pc = target;
                self.stats.inst_branch += 1;
            }
            OP_BRANCH => {
                let a = self.read_reg(rs1);
                let b = self.read_reg(rs2);
                let taken = match funct3 {
                    0x0 => a == b,
                    0x1 => a != b,
                    0x4 => (a as i64) < (b as i64),
                    0x5 => (a as i64) >= (b as i64),
                    0x6 => a < b,
                    0x7 => a >= b,
                    _ => return Err(Trap::IllegalInstruction(inst)),
                };
                if taken {
                    next_pc = pc.wrapping_add(imm_b(inst) as u64);
                }
                self.stats.inst_branch += 1;
            }
            OP_LOAD => {
                let (len, signed) = match funct3 {
                    0x0 => (1, true),
                    0x1 => (2, true),
                    0x2 => (4, true),
                    0x3 => (8, true),
                    0x4 => (1, false),
                    0x5 => (2, false),
                    0x6 => (4, false),
                    _ => return Err(Trap::IllegalInstruction(inst)),
                };
                let addr = self.read_reg(rs1).wrapping_add(imm_i(inst) as u64);
                let mut buf = [0u8; 8];
                {
                    let mem = self.mem.borrow();
                    for (i, byte) in buf.iter_mut().take(len).enumerate() {
                        *byte = mem.read_u8(addr + i as u64);
                    }
                }
                self.tracer.mem_read(addr, len, &buf[..len]);
                let raw = u64::from_le_bytes(buf);
                let val = if signed {
                    sign_extend(raw, (len * 8) as u32)
                } else {
                    raw
                };
                self.write_reg(rd, val);
                self.stats.inst_load += 1;
            }
            OP_STORE => {
                let len = match funct3 {
                    0x0 => 1,
                    0x1 => 2,
                    0x2 => 4,
                    0x3 => 8,
                    _ => return Err(Trap::IllegalInstruction(inst)),
                };
                let addr = self.read_reg(rs1).wrapping_add(imm_s(inst) as u64);
                let val = self.read_reg(rs2);
                let bytes = val.to_le_bytes();
                self.mem.borrow_mut().write_bytes(addr, &bytes[..len]);
                self.tracer.mem_write(addr, len, &bytes[..len]);
                self.stats.inst_store += 1;
            }
            OP_IMM => {
                let a = self.read_reg(rs1);
                let imm = imm_i(inst) as u64;
                let shamt = ((inst >> 20) & 0x3f) as u64;
                let (op, b) = match funct3 {
                    0x0 => (AluOp::Add, imm),
                    0x2 => (AluOp::Slt, imm),
                    0x3 => (AluOp::Sltu, imm),
                    0x4 => (AluOp::Xor, imm),
                    0x6 => (AluOp::Or, imm),
                    0x7 => (AluOp::And, imm),
                    0x1 if funct7 >> 1 == 0x00 => (AluOp::Sll, shamt),
                    0x5 if funct7 >> 1 == 0x00 => (AluOp::Srl, shamt),
                    0x5 if funct7 >> 1 == 0x10 => (AluOp::Sra, shamt),
                    _ => return Err(Trap::IllegalInstruction(inst)),
                };
                self.write_reg(rd, Alu::execute(op, a, b, false));
                self.stats.inst_alu += 1;
            }
            OP_IMM_32 => {
                let a = self.read_reg(rs1);
                let imm = imm_i(inst) as u64;
                let shamt = ((inst >> 20) & 0x1f) as u64;
                let (op, b) = match funct3 {
                    0x0 => (AluOp::Add, imm),
                    0x1 if funct7 == 0x00 => (AluOp::Sll, shamt),
                    0x5 if funct7 == 0x00 => (AluOp::Srl, shamt),
                    0x5 if funct7 == 0x20 => (AluOp::Sra, shamt),
                    _ => return Err(Trap::IllegalInstruction(inst)),
                };
                self.write_reg(rd, Alu::execute(op, a, b, true));
                self.stats.inst_alu += 1;
            }
            OP_REG | OP_REG_32 => {
                let is32 = opcode == OP_REG_32;
                let op = self.decode_reg_op(inst, funct3, funct7, is32)?;
                let a = self.read_reg(rs1);
                let b = self.read_reg(rs2);
                self.write_reg(rd, Alu::execute(op, a, b, is32));
                self.stats.inst_alu += 1;
            }
            OP_SYSTEM => match inst {
                ECALL => {
                    let a7 = self.read_reg(abi::REG_A7);
                    if a7 == SYS_EXIT {
                        let a0 = self.read_reg(abi::REG_A0);
                        self.exit_code = Some(a0);
                    }
                    self.stats.inst_system += 1;
                }
                EBREAK => return Err(Trap::Breakpoint(pc)),
                _ => return Err(Trap::IllegalInstruction(inst)),
            },
            OP_CUSTOM0 => {
                let Some(cp) = self.coproc.as_mut() else {
                    return Err(Trap::IllegalInstruction(inst));
                };
                cp.issue_inst(inst, &self.feature, &self.regs, &self.mem);
                self.stats.coproc_issued += 1;
            }
            _ => return Err(Trap::IllegalInstruction(inst)),
        }

        Ok(next_pc)
    }

    fn decode_reg_op(
        &self,
        inst: u32,
        funct3: u32,
        funct7: u32,
        is32: bool,
    ) -> Result<AluOp, Trap> {
        let op = match (funct7, funct3) {
            (0x00, 0x0) => AluOp::Add,
            (0x20, 0x0) => AluOp::Sub,
            (0x00, 0x1) => AluOp::Sll,
            (0x00, 0x2) if !is32 => AluOp::Slt,
            (0x00, 0x3) if !is32 => AluOp::Sltu,
            (0x00, 0x4) if !is32 => AluOp::Xor,
            (0x00, 0x5) => AluOp::Srl,
            (0x20, 0x5) => AluOp::Sra,
            (0x00, 0x6) if !is32 => AluOp::Or,
            (0x00, 0x7) if !is32 => AluOp::And,
            (0x01, f3) => {
                if !self.feature.has_ext('m') {
                    return Err(Trap::IllegalInstruction(inst));
                }
                match (f3, is32) {
                    (0x0, _) => AluOp::Mul,
                    (0x1, false) => AluOp::Mulh,
                    (0x2, false) => AluOp::Mulhsu,
                    (0x3, false) => AluOp::Mulhu,
                    (0x4, _) => AluOp::Div,
                    (0x5, _) => AluOp::Divu,
                    (0x6, _) => AluOp::Rem,
                    (0x7, _) => AluOp::Remu,
                    _ => return Err(Trap::IllegalInstruction(inst)),
                }
            }
            _ => return Err(Trap::IllegalInstruction(inst)),
        };
        Ok(op)
    }
}
