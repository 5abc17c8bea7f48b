//! Instruction-Level Execution Tracer.
//!
//! The tracer reconstructs a human-readable account of every register,
//! memory, and program-counter effect of each retired instruction. Capture
//! runs unconditionally; output is gated at render time by an enable bit
//! driven either by reserved in-band control instructions embedded in the
//! traced program or by absolute cycle bounds.
//!
//! The tracer is a diagnostic observer: every anomaly (unattachable
//! disassembler, oversized memory captures, unknown registers) degrades the
//! rendering but never propagates an error into the simulation.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use crate::common::abi;

/// In-band trace control encodings and the bounded enable stack.
pub mod controls;

/// Disassembly collaborator interface and the built-in RV64IM backend.
pub mod disasm;

use controls::EnableStack;
use disasm::{Disassemble, RvDisasm};

/// Maximum number of data bytes captured per memory event.
const MAX_DATA_BYTES: usize = 8;

/// Mask for the 15-bit stall/flush source fields.
const SOURCE_MASK: u16 = 0x7fff;

/// Kind of captured per-instruction effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceKind {
    /// A source register was read.
    RegRead,
    /// A destination register was written.
    RegWrite,
    /// Data was loaded from memory.
    MemLoad,
    /// Data was stored to memory.
    MemStore,
    /// The program counter was written.
    PcWrite,
}

/// One captured effect, preserving code ordering within the instruction.
///
/// Field meaning depends on the kind:
/// register events use `a`=register, `b`=value; memory events use
/// `a`=address, `b`=length, `c`=data (first 8 bytes); PC writes use
/// `a`=target.
#[derive(Clone, Copy, Debug)]
pub struct TraceRecord {
    /// Effect kind.
    pub kind: TraceKind,
    /// Register index, memory address, or PC target.
    pub a: u64,
    /// Register value or access length.
    pub b: u64,
    /// Captured data bytes (memory events only).
    pub c: u64,
}

/// Per-cycle flow-control annotation alongside the event log.
///
/// Explicit named fields with accessor methods; the 15-bit source masks
/// record which pipeline units contributed a stall or flush this cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventFlags {
    /// The pipeline stalled this cycle.
    pub stall: bool,
    /// One bit per stall source (15 bits used).
    pub stall_sources: u16,
    /// The pipeline flushed this cycle.
    pub flush: bool,
    /// One bit per flush source (15 bits used).
    pub flush_sources: u16,
    /// The trace enable state changed this cycle.
    pub trace_ctl: bool,
}

impl EventFlags {
    /// Records a stall from the given source index (0-14; others ignored).
    pub fn set_stall(&mut self, source: u32) {
        self.stall = true;
        if source < 15 {
            self.stall_sources |= (1 << source) & SOURCE_MASK;
        }
    }

    /// Records a flush from the given source index (0-14; others ignored).
    pub fn set_flush(&mut self, source: u32) {
        self.flush = true;
        if source < 15 {
            self.flush_sources |= (1 << source) & SOURCE_MASK;
        }
    }

    /// Returns true if any flag is set this cycle.
    pub fn any(&self) -> bool {
        self.stall || self.flush || self.trace_ctl
    }

    /// Clears all flags and source masks.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Instruction-level execution tracer.
///
/// Captures an ordered log of per-instruction effects and renders one
/// formatted line per retired instruction to the attached sink.
pub struct Tracer {
    name: String,
    out: Box<dyn Write>,
    enabled: bool,
    flags: EventFlags,
    records: Vec<TraceRecord>,
    pc: u64,
    inst: u32,
    symbols: Option<BTreeMap<u64, String>>,
    disasm: Option<Box<dyn Disassemble>>,
    // Suppresses sequential PC-write tokens; survives reset().
    last_pc: u64,
    start_cycle: u64,
    cycle_limit: u64,
    stack: EnableStack,
    trace_lines: u64,
}

impl Tracer {
    /// Creates a tracer that writes to stderr, with output enabled.
    pub fn new(name: &str) -> Self {
        Self::with_output(name, Box::new(std::io::stderr()))
    }

    /// Creates a tracer that writes to the given line sink.
    pub fn with_output(name: &str, out: Box<dyn Write>) -> Self {
        Self {
            name: name.to_string(),
            out,
            enabled: true,
            flags: EventFlags::default(),
            records: Vec::new(),
            pc: 0,
            inst: 0,
            symbols: None,
            disasm: None,
            last_pc: 0,
            start_cycle: 0,
            cycle_limit: 0,
            stack: EnableStack::default(),
            trace_lines: 0,
        }
    }

    /// Returns the tracer instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the built-in disassembler for the given machine string.
    ///
    /// On failure the tracer permanently falls back to raw-hex rendering;
    /// attachment problems are absorbed, never reported as errors.
    pub fn set_disassembler(&mut self, machine: &str) {
        match RvDisasm::new(machine) {
            Ok(d) => self.disasm = Some(Box::new(d)),
            Err(_) => self.disasm = None,
        }
    }

    /// Attaches an external disassembly backend.
    pub fn attach_disassembler(&mut self, backend: Box<dyn Disassemble>) {
        self.disasm = Some(backend);
    }

    /// Replaces the line sink.
    pub fn set_output(&mut self, out: Box<dyn Write>) {
        self.out = out;
    }

    /// Supplies the address-to-name symbol map used to annotate PC writes.
    pub fn set_symbols(&mut self, symbols: BTreeMap<u64, String>) {
        self.symbols = Some(symbols);
    }

    /// Sets the cycle at which output is forced on (0 = unset).
    pub fn set_start_cycle(&mut self, cycle: u64) {
        self.start_cycle = cycle;
    }

    /// Sets the cycle at which output is forced off (0 = unset).
    pub fn set_cycle_limit(&mut self, cycle: u64) {
        self.cycle_limit = cycle;
    }

    /// Directly sets the enabled state, bypassing the control stack.
    pub fn set_output_enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Records the instruction currently under trace.
    ///
    /// Does not clear previously captured events; the caller resets the
    /// tracer once per instruction boundary (`trace` does this after
    /// rendering).
    pub fn set_fetched_inst(&mut self, pc: u64, inst: u32) {
        self.pc = pc;
        self.inst = inst;
    }

    /// Captures a register read.
    pub fn reg_read(&mut self, r: u64, v: u64) {
        self.records.push(TraceRecord {
            kind: TraceKind::RegRead,
            a: r,
            b: v,
            c: 0,
        });
    }

    /// Captures a register write.
    pub fn reg_write(&mut self, r: u64, v: u64) {
        self.records.push(TraceRecord {
            kind: TraceKind::RegWrite,
            a: r,
            b: v,
            c: 0,
        });
    }

    /// Captures a memory load of `len` bytes at `addr`.
    ///
    /// Only the first 8 bytes of `data` are retained.
    pub fn mem_read(&mut self, addr: u64, len: usize, data: &[u8]) {
        self.records.push(TraceRecord {
            kind: TraceKind::MemLoad,
            a: addr,
            b: len as u64,
            c: capture_bytes(data, len),
        });
    }

    /// Captures a memory store of `len` bytes at `addr`.
    ///
    /// Only the first 8 bytes of `data` are retained; for `len < 8` the
    /// bytes beyond `len` are masked out so stale buffer contents never
    /// leak into the trace.
    pub fn mem_write(&mut self, addr: u64, len: usize, data: &[u8]) {
        self.records.push(TraceRecord {
            kind: TraceKind::MemStore,
            a: addr,
            b: len as u64,
            c: capture_bytes(data, len),
        });
    }

    /// Captures a program-counter write.
    ///
    /// Always appended; rendering suppresses targets that fall through
    /// sequentially from the previously rendered PC write.
    pub fn pc_write(&mut self, new_pc: u64) {
        self.records.push(TraceRecord {
            kind: TraceKind::PcWrite,
            a: new_pc,
            b: 0,
            c: 0,
        });
    }

    /// Records a stall annotation for this cycle.
    pub fn stall(&mut self, source: u32) {
        self.flags.set_stall(source);
    }

    /// Records a flush annotation for this cycle.
    pub fn flush(&mut self, source: u32) {
        self.flags.set_flush(source);
    }

    /// Evaluates the in-band and cycle-bound trace controls for this cycle.
    ///
    /// Two independent mechanisms run in a fixed order: first the fetched
    /// instruction is matched against the reserved control encodings, then
    /// the start/stop cycle bounds force the state on or off. When both
    /// fire in the same cycle the later check wins. Every transition sets
    /// the `trace_ctl` flag so the transition itself is always rendered.
    pub fn check_user_controls(&mut self, cycle: u64) {
        match self.inst {
            controls::TRACE_OFF => {
                self.enabled = false;
                self.flags.trace_ctl = true;
            }
            controls::TRACE_ON => {
                self.enabled = true;
                self.flags.trace_ctl = true;
            }
            controls::TRACE_PUSH_OFF => {
                self.stack.push(self.enabled);
                self.enabled = false;
                self.flags.trace_ctl = true;
            }
            controls::TRACE_PUSH_ON => {
                self.stack.push(self.enabled);
                self.enabled = true;
                self.flags.trace_ctl = true;
            }
            controls::TRACE_POP => {
                if let Some(prev) = self.stack.pop() {
                    self.enabled = prev;
                    self.flags.trace_ctl = true;
                }
            }
            _ => {}
        }

        if self.start_cycle != 0 && cycle == self.start_cycle {
            self.enabled = true;
            self.flags.trace_ctl = true;
        }

        if self.cycle_limit != 0 && cycle == self.cycle_limit {
            self.enabled = false;
            self.flags.trace_ctl = true;
        }
    }

    /// Returns true when this cycle should be rendered.
    ///
    /// True while enabled, and also on any cycle whose control transition
    /// flag is set, so enable/disable edges stay visible even when output
    /// is otherwise suppressed.
    pub fn output_enabled(&self) -> bool {
        if cfg!(feature = "always-trace") {
            return true;
        }
        self.enabled || self.flags.trace_ctl
    }

    /// Renders one trace line for the current instruction.
    ///
    /// Format: hex address, raw encoding, control symbol, disassembly (raw
    /// hex when no backend is attached), then space-joined operand tokens
    /// in capture order. Sequential PC writes produce no token.
    pub fn render_line(&mut self) -> String {
        let sym = if self.flags.trace_ctl {
            if self.enabled {
                '+'
            } else {
                '-'
            }
        } else if self.flags.flush {
            '!'
        } else if self.flags.stall {
            '#'
        } else {
            ' '
        };

        let disasm = match &self.disasm {
            Some(d) => d.disassemble(self.inst),
            None => format!("0x{:08x}", self.inst),
        };

        let mut line = format!("0x{:x}:{:08x} {:>2} {}\t", self.pc, self.inst, sym, disasm);

        let mut tokens = String::new();
        for rec in &self.records {
            match rec.kind {
                TraceKind::RegRead => {
                    let _ = write!(tokens, "0x{:x}<-{} ", rec.b, abi::reg_name(rec.a));
                }
                TraceKind::RegWrite => {
                    let _ = write!(tokens, "{}<-0x{:x} ", abi::reg_name(rec.a), rec.b);
                }
                TraceKind::MemLoad => {
                    let _ = write!(
                        tokens,
                        "{}<-[0x{:x},{}] ",
                        fmt_data(rec.b, rec.c),
                        rec.a,
                        rec.b
                    );
                }
                TraceKind::MemStore => {
                    let _ = write!(
                        tokens,
                        "[0x{:x},{}]<-{} ",
                        rec.a,
                        rec.b,
                        fmt_data(rec.b, rec.c)
                    );
                }
                TraceKind::PcWrite => {
                    let pc = rec.a;
                    if self.last_pc.wrapping_add(4) != pc {
                        let _ = write!(tokens, "pc<-0x{:x}", pc);
                        if let Some(name) =
                            self.symbols.as_ref().and_then(|map| map.get(&pc))
                        {
                            let _ = write!(tokens, " <{}>", name);
                        }
                        tokens.push(' ');
                    }
                    self.last_pc = pc;
                }
            }
        }

        if !tokens.is_empty() {
            line.push(' ');
            line.push_str(tokens.trim_end());
        }
        line
    }

    /// Renders and emits the current instruction if output is enabled,
    /// then clears the per-instruction capture state.
    ///
    /// Invoked once per retired instruction by the owning core. Sink write
    /// failures are swallowed: a diagnostic subsystem must never destabilize
    /// the simulation it observes.
    pub fn trace(&mut self, _cycle: u64) {
        if self.output_enabled() {
            let line = self.render_line();
            let _ = writeln!(self.out, "{}", line);
            self.trace_lines += 1;
        }
        self.reset();
    }

    /// Returns the number of lines emitted so far.
    pub fn lines_emitted(&self) -> u64 {
        self.trace_lines
    }

    /// Clears the event log and per-cycle flags.
    ///
    /// The sequential-PC suppression state is cross-instruction and is
    /// not cleared here.
    pub fn reset(&mut self) {
        self.records.clear();
        self.flags.clear();
    }
}

/// Captures up to the first 8 bytes of a memory access, little-endian.
///
/// Bytes beyond `len` are left zero, which masks out don't-care high bytes
/// for short accesses.
fn capture_bytes(data: &[u8], len: usize) -> u64 {
    let take = len.min(MAX_DATA_BYTES).min(data.len());
    let mut buf = [0u8; MAX_DATA_BYTES];
    buf[..take].copy_from_slice(&data[..take]);
    u64::from_le_bytes(buf)
}

/// Formats captured memory data for rendering.
///
/// Lengths over 8 bytes render the 8 retained bytes followed by an explicit
/// `..+N` truncation marker for the N bytes not shown.
fn fmt_data(len: u64, data: u64) -> String {
    if len == 0 {
        return "0x".to_string();
    }
    if len > MAX_DATA_BYTES as u64 {
        format!("0x{:016x}..+{}", data, len - MAX_DATA_BYTES as u64)
    } else if len == MAX_DATA_BYTES as u64 {
        format!("0x{:016x}", data)
    } else {
        let shift = (MAX_DATA_BYTES as u64 - len) * 8;
        let mask = (!0u64) >> shift;
        format!(
            "0x{:0width$x}",
            data & mask,
            width = (len * 2) as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests byte capture masking for short accesses.
    #[test]
    fn test_capture_masks_short_lengths() {
        let data = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x11, 0x22];
        assert_eq!(capture_bytes(&data, 2), 0xbbaa);
        assert_eq!(capture_bytes(&data, 8), 0x2211_ffee_ddcc_bbaa);
    }

    /// Tests the truncation marker for oversized accesses.
    #[test]
    fn test_fmt_data_truncation_marker() {
        assert_eq!(fmt_data(16, 0x1122), "0x0000000000001122..+8");
        assert_eq!(fmt_data(4, 0xdead_beef), "0xdeadbeef");
    }

    /// Tests source-mask bit packing in the event flags.
    #[test]
    fn test_event_flag_sources() {
        let mut flags = EventFlags::default();
        flags.set_stall(0);
        flags.set_stall(14);
        flags.set_stall(15); // out of range, ignored
        assert!(flags.stall);
        assert_eq!(flags.stall_sources, 0x4001);
        flags.set_flush(3);
        assert_eq!(flags.flush_sources, 0x0008);
        assert!(flags.any());
        flags.clear();
        assert!(!flags.any());
    }
}
