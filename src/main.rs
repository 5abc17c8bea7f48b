//! RISC-V Trace Simulator CLI.
//!
//! The main executable for the simulator. It handles command-line argument
//! parsing, core initialization, binary loading, and the main simulation
//! loop.

use clap::Parser;
use std::{fs, process};

extern crate riscv_tracesim;

use riscv_tracesim::config::Config;
use riscv_tracesim::core::Proc;
use riscv_tracesim::sim::loader;

/// Command-line arguments for the trace simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "RISC-V Instruction Trace Simulator")]
struct Args {
    #[arg(short, long, default_value = "configs/default.toml")]
    config: String,

    #[arg(short, long)]
    file: Option<String>,

    /// Force instruction tracing on or off, overriding the config file.
    #[arg(long)]
    trace: Option<bool>,

    /// Cycle at which tracing is forced on (0 leaves it unset).
    #[arg(long)]
    trace_start: Option<u64>,

    /// Cycle at which tracing is forced off (0 leaves it unset).
    #[arg(long)]
    trace_stop: Option<u64>,
}

/// Main entry point for the trace simulator.
///
/// # Behavior
///
/// 1. **Configuration**: Parses command-line arguments and loads the TOML
///    configuration file, then applies any tracing overrides.
/// 2. **Initialization**: Constructs the core, the tracer, and the
///    configured coprocessor.
/// 3. **Loader**: Loads a raw binary at the RAM base for direct execution.
/// 4. **Simulation Loop**: Ticks the core cycle-by-cycle until the guest
///    exits and the coprocessor drains, or a fatal trap occurs.
/// 5. **Teardown**: Prints simulation statistics and exits with the
///    guest's exit code.
fn main() {
    let args = Args::parse();
    let config_content = fs::read_to_string(&args.config).expect("Failed to read config");
    let mut config: Config = toml::from_str(&config_content).expect("Failed to parse config");

    if let Some(trace) = args.trace {
        config.tracer.trace_instructions = trace;
    }
    if let Some(start) = args.trace_start {
        config.tracer.start_cycle = start;
    }
    if let Some(stop) = args.trace_stop {
        config.tracer.cycle_limit = stop;
    }

    let mut proc = match Proc::new(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("Global Configuration");
    println!("--------------------");
    println!("General:");
    println!("  Machine:            {}", config.general.machine);
    println!("  Start PC:           {:#x}", config.general.start_pc_val());
    println!("Memory:");
    println!("  RAM Base:           {:#x}", config.memory.ram_base_val());
    println!(
        "  RAM Size:           {} MB",
        config.memory.ram_size_val() / 1024 / 1024
    );
    println!("Tracer:");
    println!(
        "  Trace Instructions: {}",
        config.tracer.trace_instructions
    );
    println!("  Start Cycle:        {}", config.tracer.start_cycle);
    println!("  Cycle Limit:        {}", config.tracer.cycle_limit);
    println!("Coprocessor:");
    println!("  Attached:           {:?}", config.coproc.attach);
    println!("  Teardown:           {:?}", config.coproc.teardown);
    println!("--------------------");

    let Some(bin_path) = args.file else {
        eprintln!("Error: No binary specified.");
        eprintln!("Usage:");
        eprintln!("  riscv-tracesim --file <binary.bin> [--config <config.toml>]");
        process::exit(1);
    };

    println!("[*] Direct Execution Mode");
    let bin_data = loader::load_binary(&bin_path);
    loader::setup_direct_load(&mut proc, &config, &bin_data);

    loop {
        if let Err(e) = proc.tick() {
            eprintln!("\n[!] FATAL TRAP: {}", e);
            proc.dump_state();
            proc.stats.print();
            process::exit(1);
        }

        if let Some(code) = proc.take_exit() {
            proc.teardown();
            println!("\n[*] Exiting with code {}", code);
            proc.stats.print();

            use std::io::Write;
            std::io::stdout().flush().ok();

            process::exit(code as i32);
        }
    }
}
