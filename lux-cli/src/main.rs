//! Lux CLI: assemble, disassemble, and run bytecode.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/assembly error
//! - 3: Runtime fault
//! - 4: Step budget exhausted
//!
//! Logging is controlled by `LUX_LOG` (default `warn`); set it to
//! `trace` to see every executed instruction.

mod commands;

use std::process;

fn main() {
    let env = env_logger::Env::default()
        .filter_or("LUX_LOG", "warn")
        .write_style_or("LUX_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "assemble" => commands::assemble(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "run" => commands::run(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: lux <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  assemble <input.lasm> [-o output.luxb]        Assemble text to bytecode");
    eprintln!("  disassemble <input.luxb>                      Disassemble bytecode to text");
    eprintln!("  run <input.luxb> [--max-steps N] [--dump]     Execute bytecode");
}
