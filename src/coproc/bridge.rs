//! Accelerator Bridge.
//!
//! Adapts an externally clocked accelerator engine to the same per-cycle
//! clock/done contract as the FIFO dispatcher. The engine runs its own
//! execution model; the bridge only starts it and steps it once per global
//! cycle. The generic issue path is a no-op: this variant does not accept
//! arbitrary instruction words.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::{Feature, RegisterFile};
use crate::coproc::CoProc;
use crate::core::mem::Memory;

/// Externally clocked accelerator engine contract.
///
/// The engine owns its execution model; the bridge drives it through this
/// interface once per cycle.
pub trait Accelerator {
    /// Starts (or restarts) a unit of accelerator work.
    fn launch(&mut self);

    /// Advances the engine by one cycle.
    fn tick(&mut self) -> bool;

    /// Returns true when the engine has no work in flight.
    fn done(&self) -> bool;

    /// Discards any work in flight and returns the engine to idle.
    fn reset(&mut self);
}

/// Bridge presenting an accelerator engine through the uniform coprocessor
/// interface.
pub struct AcceleratorBridge {
    engine: Box<dyn Accelerator>,
    cycle_count: u64,
}

impl AcceleratorBridge {
    /// Creates a bridge around the given engine.
    pub fn new(engine: Box<dyn Accelerator>) -> Self {
        Self {
            engine,
            cycle_count: 0,
        }
    }

    /// Starts one unit of work on the wrapped engine.
    ///
    /// This is the variant's real issue path; the generic
    /// `issue_inst(inst, ..)` form is a no-op for bridged engines.
    pub fn launch(&mut self) {
        self.engine.launch();
    }
}

impl CoProc for AcceleratorBridge {
    /// No-op: bridged engines do not accept arbitrary instruction words.
    fn issue_inst(
        &mut self,
        _inst: u32,
        _feature: &Rc<Feature>,
        _regs: &Rc<RefCell<RegisterFile>>,
        _mem: &Rc<RefCell<Memory>>,
    ) -> bool {
        true
    }

    fn clock_tick(&mut self, _cycle: u64) -> bool {
        self.cycle_count += 1;
        self.engine.tick()
    }

    fn reset(&mut self) -> bool {
        self.engine.reset();
        true
    }

    fn teardown(&mut self) -> bool {
        self.reset()
    }

    /// Delegates to the wrapped engine's completion state.
    fn is_done(&self) -> bool {
        self.engine.done()
    }
}

/// Fixed-latency reference engine.
///
/// Each launch takes a configured number of cycles to complete. Useful as a
/// placeholder accelerator in simulation and in tests.
pub struct CountdownEngine {
    latency: u64,
    remaining: u64,
}

impl CountdownEngine {
    /// Creates an engine whose work units take `latency` cycles each.
    pub fn new(latency: u64) -> Self {
        Self {
            latency,
            remaining: 0,
        }
    }
}

impl Accelerator for CountdownEngine {
    fn launch(&mut self) {
        self.remaining = self.latency;
    }

    fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        true
    }

    fn done(&self) -> bool {
        self.remaining == 0
    }

    fn reset(&mut self) {
        self.remaining = 0;
    }
}
