//! Coprocessor Dispatch.
//!
//! This module decouples the main instruction-issue path from independently
//! clocked coprocessor engines behind a uniform per-cycle contract: issue,
//! clock, query-done, reset, teardown. The owning core issues raw
//! instruction words plus non-owning handles to its feature descriptor,
//! register file, and memory; instruction semantics are fully delegated to
//! the attached execution backend.
//!
//! Scheduling is single-threaded and cycle-stepped: `clock_tick` is invoked
//! exactly once per global cycle and drains at most one queued entry, so
//! throughput is bounded to one retirement per cycle. An issue
//! that lands after the tick of the same cycle simply executes one cycle
//! later.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::common::{Feature, RegisterFile};
use crate::config::{CoProcConfig, CoProcKind, TeardownPolicy};
use crate::core::mem::Memory;

/// Accelerator bridge variant and the external engine contract.
pub mod bridge;

pub use bridge::{Accelerator, AcceleratorBridge, CountdownEngine};

/// Uniform per-cycle coprocessor interface.
///
/// Variant backends implement this capability trait and are held boxed by
/// the owning core. All calls complete synchronously within the calling
/// cycle; none blocks or suspends.
pub trait CoProc {
    /// Hands off one instruction to the coprocessor.
    ///
    /// May be called any number of times within one cycle. The handles are
    /// downgraded to non-owning references; the issuing core must keep the
    /// strong references alive until the entry is dequeued.
    fn issue_inst(
        &mut self,
        inst: u32,
        feature: &Rc<Feature>,
        regs: &Rc<RefCell<RegisterFile>>,
        mem: &Rc<RefCell<Memory>>,
    ) -> bool;

    /// Advances the coprocessor by one cycle.
    fn clock_tick(&mut self, cycle: u64) -> bool;

    /// Discards all pending work without executing it. Idempotent; used
    /// between simulation runs, not for mid-run cancellation of a single
    /// instruction.
    fn reset(&mut self) -> bool;

    /// Invoked once by the owning core when it completes.
    fn teardown(&mut self) -> bool;

    /// Returns true when the coprocessor has no pending work.
    ///
    /// Pure query with no side effects; the core's shutdown protocol
    /// requires every attached coprocessor to report done before the
    /// simulation terminates.
    fn is_done(&self) -> bool;

    /// Returns the number of instructions this coprocessor has retired.
    fn retired(&self) -> u64 {
        0
    }
}

/// Instruction semantics backend for the FIFO dispatcher.
///
/// The dispatcher defines no instruction semantics itself; execution is
/// delegated here with the issuing context's state borrowed for the call.
pub trait CoProcExec {
    /// Executes one instruction against the issuing core's state.
    fn execute(
        &mut self,
        inst: u32,
        feature: &Feature,
        regs: &mut RegisterFile,
        mem: &mut Memory,
    ) -> bool;
}

/// One queued coprocessor instruction.
///
/// Holds the raw instruction word plus non-owning handles to the issuing
/// core's feature descriptor, register file, and memory. Valid only while
/// enqueued: an entry whose handles no longer upgrade is discarded without
/// executing.
struct CoProcInst {
    inst: u32,
    feature: Weak<Feature>,
    regs: Weak<RefCell<RegisterFile>>,
    mem: Weak<RefCell<Memory>>,
}

/// FIFO coprocessor dispatcher.
///
/// Queues issued instructions in arrival order and executes exactly one per
/// clock tick by delegating to the attached execution backend. Reports done
/// when the queue is empty.
pub struct QueueCoProc {
    inst_q: VecDeque<CoProcInst>,
    exec: Box<dyn CoProcExec>,
    policy: TeardownPolicy,
    retired: u64,
    cycle_count: u64,
}

impl QueueCoProc {
    /// Creates a dispatcher with the given execution backend and teardown
    /// policy.
    pub fn new(exec: Box<dyn CoProcExec>, policy: TeardownPolicy) -> Self {
        Self {
            inst_q: VecDeque::new(),
            exec,
            policy,
            retired: 0,
            cycle_count: 0,
        }
    }

    /// Returns the number of queued, not yet executed instructions.
    pub fn pending(&self) -> usize {
        self.inst_q.len()
    }

    /// Dequeues and executes one entry, if any.
    fn step_one(&mut self) -> bool {
        let Some(entry) = self.inst_q.pop_front() else {
            return true;
        };

        // Issuing context gone: the entry can no longer execute.
        let (Some(feature), Some(regs), Some(mem)) = (
            entry.feature.upgrade(),
            entry.regs.upgrade(),
            entry.mem.upgrade(),
        ) else {
            return false;
        };

        let ok = self.exec.execute(
            entry.inst,
            &feature,
            &mut regs.borrow_mut(),
            &mut mem.borrow_mut(),
        );
        self.retired += 1;
        ok
    }
}

impl CoProc for QueueCoProc {
    fn issue_inst(
        &mut self,
        inst: u32,
        feature: &Rc<Feature>,
        regs: &Rc<RefCell<RegisterFile>>,
        mem: &Rc<RefCell<Memory>>,
    ) -> bool {
        self.inst_q.push_back(CoProcInst {
            inst,
            feature: Rc::downgrade(feature),
            regs: Rc::downgrade(regs),
            mem: Rc::downgrade(mem),
        });
        true
    }

    fn clock_tick(&mut self, _cycle: u64) -> bool {
        self.cycle_count += 1;
        self.step_one()
    }

    fn reset(&mut self) -> bool {
        self.inst_q.clear();
        true
    }

    fn teardown(&mut self) -> bool {
        match self.policy {
            TeardownPolicy::Drain => {
                while !self.inst_q.is_empty() {
                    self.step_one();
                }
                true
            }
            TeardownPolicy::Discard => self.reset(),
        }
    }

    fn is_done(&self) -> bool {
        self.inst_q.is_empty()
    }

    fn retired(&self) -> u64 {
        self.retired
    }
}

/// Multiply-accumulate execution backend.
///
/// Reference semantics for the custom-0 coprocessor space:
/// funct3 0 accumulates `rs1 * rs2` into `rd`, funct3 1 loads a doubleword
/// from the address in `rs1` into `rd`, funct3 2 stores `rs2` as a
/// doubleword to the address in `rs1`. Anything else retires with no
/// effect.
pub struct MacUnit;

impl CoProcExec for MacUnit {
    fn execute(
        &mut self,
        inst: u32,
        feature: &Feature,
        regs: &mut RegisterFile,
        mem: &mut Memory,
    ) -> bool {
        let rd = ((inst >> 7) & 0x1f) as usize;
        let rs1 = ((inst >> 15) & 0x1f) as usize;
        let rs2 = ((inst >> 20) & 0x1f) as usize;
        let funct3 = (inst >> 12) & 0x7;

        let a = regs.read(rs1);
        let b = regs.read(rs2);

        match funct3 {
            0x0 => {
                let acc = regs.read(rd).wrapping_add(a.wrapping_mul(b));
                let acc = if feature.xlen() == 32 {
                    acc as i32 as i64 as u64
                } else {
                    acc
                };
                regs.write(rd, acc);
            }
            0x1 => {
                regs.write(rd, mem.read_u64(a));
            }
            0x2 => {
                mem.write_u64(a, b);
            }
            _ => return false,
        }
        true
    }
}

/// Builds the configured coprocessor variant, if any.
///
/// Mirrors the branch-predictor factory pattern: a boxed variant selected
/// by configuration, `None` when no coprocessor is attached.
pub fn from_config(cfg: &CoProcConfig) -> Option<Box<dyn CoProc>> {
    match cfg.attach {
        CoProcKind::None => None,
        CoProcKind::Queue => Some(Box::new(QueueCoProc::new(
            Box::new(MacUnit),
            cfg.teardown,
        ))),
        CoProcKind::Bridge => Some(Box::new(AcceleratorBridge::new(Box::new(
            CountdownEngine::new(cfg.bridge_latency),
        )))),
    }
}
