//! Simulation statistics collection and reporting.
//!
//! Tracks cycle counts, the retired instruction mix, coprocessor activity,
//! and tracer output volume.

use std::time::Instant;

/// Simulation statistics structure tracking all performance metrics.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub instructions_retired: u64,

    pub inst_alu: u64,
    pub inst_load: u64,
    pub inst_store: u64,
    pub inst_branch: u64,
    pub inst_system: u64,

    pub coproc_issued: u64,
    pub coproc_retired: u64,

    pub trace_lines: u64,
    pub traps_taken: u64,
}

impl Default for SimStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_system: 0,
            coproc_issued: 0,
            coproc_retired: 0,
            trace_lines: 0,
            traps_taken: 0,
        }
    }
}

impl SimStats {
    /// Prints a formatted summary of all simulation statistics.
    ///
    /// Displays cycle/instruction counts, IPC/CPI, the instruction mix,
    /// coprocessor activity, and tracer output volume in a human-readable
    /// format.
    pub fn print(&self) {
        let duration = self.start_time.elapsed();
        let seconds = duration.as_secs_f64();

        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let instr = if self.instructions_retired == 0 {
            1
        } else {
            self.instructions_retired
        };

        let ipc = self.instructions_retired as f64 / cyc as f64;
        let cpi = cyc as f64 / instr as f64;
        let khz = (self.cycles as f64 / seconds) / 1000.0;

        println!("\n==========================================================");
        println!("RISC-V TRACE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_ipc                  {:.4}", ipc);
        println!("sim_cpi                  {:.4}", cpi);
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        let total_inst = instr as f64;
        println!(
            "  op.alu                 {} ({:.2}%)",
            self.inst_alu,
            (self.inst_alu as f64 / total_inst) * 100.0
        );
        println!(
            "  op.load                {} ({:.2}%)",
            self.inst_load,
            (self.inst_load as f64 / total_inst) * 100.0
        );
        println!(
            "  op.store               {} ({:.2}%)",
            self.inst_store,
            (self.inst_store as f64 / total_inst) * 100.0
        );
        println!(
            "  op.branch              {} ({:.2}%)",
            self.inst_branch,
            (self.inst_branch as f64 / total_inst) * 100.0
        );
        println!(
            "  op.system              {} ({:.2}%)",
            self.inst_system,
            (self.inst_system as f64 / total_inst) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("COPROCESSOR");
        println!("  coproc.issued          {}", self.coproc_issued);
        println!("  coproc.retired         {}", self.coproc_retired);
        println!("----------------------------------------------------------");
        println!("TRACER");
        println!("  trace.lines            {}", self.trace_lines);
        println!("  traps.taken            {}", self.traps_taken);
        println!("==========================================================");
    }
}
