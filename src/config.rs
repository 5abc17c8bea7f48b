use serde::Deserialize;

const DEFAULT_RAM_BASE: u64 = 0x8000_0000;
const DEFAULT_RAM_SIZE: usize = 16 * 1024 * 1024;
const DEFAULT_MACHINE: &str = "RV64IM";
const DEFAULT_BRIDGE_LATENCY: u64 = 8;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub tracer: TracerConfig,
    #[serde(default)]
    pub coproc: CoProcConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_machine")]
    pub machine: String,

    #[serde(default = "default_start_pc")]
    pub start_pc: String,
}

impl GeneralConfig {
    pub fn start_pc_val(&self) -> u64 {
        parse_hex(&self.start_pc, DEFAULT_RAM_BASE)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            machine: default_machine(),
            start_pc: default_start_pc(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_ram_base")]
    pub ram_base: String,

    #[serde(default = "default_ram_size")]
    pub ram_size: String,
}

impl MemoryConfig {
    pub fn ram_base_val(&self) -> u64 {
        parse_hex(&self.ram_base, DEFAULT_RAM_BASE)
    }

    pub fn ram_size_val(&self) -> usize {
        let s = self.ram_size.trim_start_matches("0x");
        usize::from_str_radix(s, 16).unwrap_or(DEFAULT_RAM_SIZE)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_base: default_ram_base(),
            ram_size: default_ram_size(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TracerConfig {
    #[serde(default = "default_true")]
    pub trace_instructions: bool,

    // Cycle bounds for forced enable/disable; 0 leaves the bound unset.
    #[serde(default)]
    pub start_cycle: u64,

    #[serde(default)]
    pub cycle_limit: u64,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            trace_instructions: true,
            start_cycle: 0,
            cycle_limit: 0,
        }
    }
}

/// Coprocessor variant attached to the core.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoProcKind {
    /// No coprocessor.
    #[default]
    None,
    /// FIFO dispatcher executing one queued instruction per cycle.
    Queue,
    /// Bridge to an externally clocked accelerator engine.
    Bridge,
}

/// What `teardown()` does with work still queued when the core completes.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeardownPolicy {
    /// Execute every remaining entry before going idle.
    #[default]
    Drain,
    /// Discard remaining entries, like `reset()`.
    Discard,
}

#[derive(Debug, Deserialize)]
pub struct CoProcConfig {
    #[serde(default)]
    pub attach: CoProcKind,

    #[serde(default)]
    pub teardown: TeardownPolicy,

    #[serde(default = "default_bridge_latency")]
    pub bridge_latency: u64,
}

impl Default for CoProcConfig {
    fn default() -> Self {
        Self {
            attach: CoProcKind::None,
            teardown: TeardownPolicy::Drain,
            bridge_latency: DEFAULT_BRIDGE_LATENCY,
        }
    }
}

fn parse_hex(s: &str, default: u64) -> u64 {
    let s = s.trim_start_matches("0x");
    u64::from_str_radix(s, 16).unwrap_or(default)
}

fn default_machine() -> String {
    DEFAULT_MACHINE.to_string()
}

fn default_start_pc() -> String {
    format!("{:#x}", DEFAULT_RAM_BASE)
}

fn default_ram_base() -> String {
    format!("{:#x}", DEFAULT_RAM_BASE)
}

fn default_ram_size() -> String {
    format!("{:#x}", DEFAULT_RAM_SIZE)
}

fn default_bridge_latency() -> u64 {
    DEFAULT_BRIDGE_LATENCY
}

fn default_true() -> bool {
    true
}
