//! Unit tests for coprocessor dispatch and the accelerator bridge.

use std::cell::RefCell;
use std::rc::Rc;

use riscv_tracesim::common::{Feature, RegisterFile};
use riscv_tracesim::config::{CoProcConfig, CoProcKind, TeardownPolicy};
use riscv_tracesim::coproc::{
    self, Accelerator, AcceleratorBridge, CoProc, CountdownEngine, MacUnit, QueueCoProc,
};
use riscv_tracesim::core::mem::Memory;

type Regs = Rc<RefCell<RegisterFile>>;
type Mem = Rc<RefCell<Memory>>;

fn test_context() -> (Rc<Feature>, Regs, Mem) {
    let feature = Rc::new(Feature::from_machine("RV64IM").unwrap());
    let regs = Rc::new(RefCell::new(RegisterFile::new()));
    let mem = Rc::new(RefCell::new(Memory::new(0x8000_0000, 0x1000)));
    (feature, regs, mem)
}

/// Encodes a custom-0 instruction word from its register fields.
fn custom0(funct3: u32, rd: u32, rs1: u32, rs2: u32) -> u32 {
    0x0b | (rd << 7) | (funct3 << 12) | (rs1 << 15) | (rs2 << 20)
}

/// Tests that one queued instruction retires per clock tick.
#[test]
fn test_queue_one_retirement_per_tick() {
    let (feature, regs, mem) = test_context();
    let mut cp = QueueCoProc::new(Box::new(MacUnit), TeardownPolicy::Drain);

    regs.borrow_mut().write(5, 3);
    regs.borrow_mut().write(6, 4);

    for _ in 0..3 {
        cp.issue_inst(custom0(0, 7, 5, 6), &feature, &regs, &mem);
    }
    assert!(!cp.is_done());
    assert_eq!(cp.pending(), 3);

    cp.clock_tick(1);
    assert_eq!(cp.pending(), 2);
    assert!(!cp.is_done());
    assert_eq!(regs.borrow().read(7), 12);

    cp.clock_tick(2);
    cp.clock_tick(3);
    assert!(cp.is_done());
    assert_eq!(cp.retired(), 3);
    // x7 accumulated 3 * 4 three times.
    assert_eq!(regs.borrow().read(7), 36);

    // Ticking an empty queue is harmless.
    cp.clock_tick(4);
    assert!(cp.is_done());
    assert_eq!(cp.retired(), 3);
}

/// Tests that reset discards all queued work without executing it.
#[test]
fn test_queue_reset_discards() {
    let (feature, regs, mem) = test_context();
    let mut cp = QueueCoProc::new(Box::new(MacUnit), TeardownPolicy::Drain);

    regs.borrow_mut().write(5, 2);
    regs.borrow_mut().write(6, 2);
    cp.issue_inst(custom0(0, 7, 5, 6), &feature, &regs, &mem);
    cp.issue_inst(custom0(0, 7, 5, 6), &feature, &regs, &mem);

    cp.reset();
    assert!(cp.is_done());
    assert_eq!(cp.retired(), 0);
    assert_eq!(regs.borrow().read(7), 0);

    // Reset is idempotent.
    cp.reset();
    assert!(cp.is_done());
}

/// Tests that drain teardown executes every remaining entry.
#[test]
fn test_teardown_drain() {
    let (feature, regs, mem) = test_context();
    let mut cp = QueueCoProc::new(Box::new(MacUnit), TeardownPolicy::Drain);

    regs.borrow_mut().write(5, 1);
    regs.borrow_mut().write(6, 10);
    for _ in 0..4 {
        cp.issue_inst(custom0(0, 7, 5, 6), &feature, &regs, &mem);
    }

    cp.teardown();
    assert!(cp.is_done());
    assert_eq!(cp.retired(), 4);
    assert_eq!(regs.borrow().read(7), 40);
}

/// Tests that discard teardown drops remaining entries unexecuted.
#[test]
fn test_teardown_discard() {
    let (feature, regs, mem) = test_context();
    let mut cp = QueueCoProc::new(Box::new(MacUnit), TeardownPolicy::Discard);

    regs.borrow_mut().write(5, 1);
    regs.borrow_mut().write(6, 10);
    for _ in 0..4 {
        cp.issue_inst(custom0(0, 7, 5, 6), &feature, &regs, &mem);
    }

    cp.teardown();
    assert!(cp.is_done());
    assert_eq!(cp.retired(), 0);
    assert_eq!(regs.borrow().read(7), 0);
}

/// Tests that an entry whose issuing context was dropped is discarded
/// without executing.
#[test]
fn test_stale_context_discarded() {
    let (feature, regs, mem) = test_context();
    let mut cp = QueueCoProc::new(Box::new(MacUnit), TeardownPolicy::Drain);

    {
        let stale_regs: Regs = Rc::new(RefCell::new(RegisterFile::new()));
        cp.issue_inst(custom0(0, 7, 5, 6), &feature, &stale_regs, &mem);
    }
    cp.issue_inst(custom0(0, 7, 5, 6), &feature, &regs, &mem);
    regs.borrow_mut().write(5, 5);
    regs.borrow_mut().write(6, 5);

    cp.clock_tick(1);
    // The stale entry did not execute against the live register file.
    assert_eq!(regs.borrow().read(7), 0);
    assert_eq!(cp.retired(), 0);

    cp.clock_tick(2);
    assert_eq!(regs.borrow().read(7), 25);
    assert_eq!(cp.retired(), 1);
}

/// Tests load and store dispatch through the MAC unit.
#[test]
fn test_mac_unit_load_store() {
    let (feature, regs, mem) = test_context();
    let mut cp = QueueCoProc::new(Box::new(MacUnit), TeardownPolicy::Drain);

    regs.borrow_mut().write(5, 0x8000_0100);
    regs.borrow_mut().write(6, 0x1122_3344_5566_7788);

    // store x6 to [x5], then load it back into x7
    cp.issue_inst(custom0(2, 0, 5, 6), &feature, &regs, &mem);
    cp.issue_inst(custom0(1, 7, 5, 0), &feature, &regs, &mem);
    cp.clock_tick(1);
    cp.clock_tick(2);

    assert_eq!(mem.borrow().read_u64(0x8000_0100), 0x1122_3344_5566_7788);
    assert_eq!(regs.borrow().read(7), 0x1122_3344_5566_7788);
}

/// Tests that the bridge reports done by querying its engine.
#[test]
fn test_bridge_delegates_done() {
    let mut bridge = AcceleratorBridge::new(Box::new(CountdownEngine::new(3)));
    assert!(bridge.is_done());

    bridge.launch();
    assert!(!bridge.is_done());

    bridge.clock_tick(1);
    bridge.clock_tick(2);
    assert!(!bridge.is_done());
    bridge.clock_tick(3);
    assert!(bridge.is_done());
}

/// Tests that bridge reset returns a busy engine to idle.
#[test]
fn test_bridge_reset() {
    let mut bridge = AcceleratorBridge::new(Box::new(CountdownEngine::new(100)));
    bridge.launch();
    assert!(!bridge.is_done());
    bridge.reset();
    assert!(bridge.is_done());
}

/// Tests that the generic issue path is a no-op for bridged engines.
#[test]
fn test_bridge_issue_noop() {
    let (feature, regs, mem) = test_context();
    let mut bridge = AcceleratorBridge::new(Box::new(CountdownEngine::new(4)));

    assert!(bridge.issue_inst(custom0(0, 7, 5, 6), &feature, &regs, &mem));
    assert!(bridge.is_done());
    assert_eq!(regs.borrow().read(7), 0);
}

/// Tests the configuration-driven coprocessor factory.
#[test]
fn test_factory_variants() {
    let mut cfg = CoProcConfig::default();
    assert!(coproc::from_config(&cfg).is_none());

    cfg.attach = CoProcKind::Queue;
    let cp = coproc::from_config(&cfg).unwrap();
    assert!(cp.is_done());

    cfg.attach = CoProcKind::Bridge;
    let cp = coproc::from_config(&cfg).unwrap();
    assert!(cp.is_done());
}

/// Tests a custom engine behind the accelerator contract.
#[test]
fn test_custom_accelerator_engine() {
    struct TwoPhase {
        phase: u8,
    }
    impl Accelerator for TwoPhase {
        fn launch(&mut self) {
            self.phase = 2;
        }
        fn tick(&mut self) -> bool {
            self.phase = self.phase.saturating_sub(1);
            true
        }
        fn done(&self) -> bool {
            self.phase == 0
        }
        fn reset(&mut self) {
            self.phase = 0;
        }
    }

    let mut bridge = AcceleratorBridge::new(Box::new(TwoPhase { phase: 0 }));
    bridge.launch();
    bridge.clock_tick(1);
    assert!(!bridge.is_done());
    bridge.clock_tick(2);
    assert!(bridge.is_done());
}
