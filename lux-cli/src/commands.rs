//! CLI command implementations.

use std::fs;

use log::{debug, info};
use lux_common::Executable;
use lux_vm::{Memory, Stack, Status, VM};

/// Assemble a .lasm text file to .luxb bytecode.
pub fn assemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: assemble requires an input file");
        eprintln!("Usage: lux assemble <input.lasm> [-o output.luxb]");
        return Err(1);
    }

    let input = &args[0];

    // Parse -o flag
    let output = if args.len() >= 3 && args[1] == "-o" {
        args[2].clone()
    } else if let Some(stem) = input.strip_suffix(".lasm") {
        format!("{stem}.luxb")
    } else {
        format!("{input}.luxb")
    };

    let text = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    let program = lux_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    fs::write(&output, program.as_bytes()).map_err(|e| {
        eprintln!("error: cannot write '{output}': {e}");
        1
    })?;

    eprintln!("assembled {} bytes -> {output}", program.len());
    Ok(())
}

/// Disassemble a .luxb file to text.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: disassemble requires an input file");
        eprintln!("Usage: lux disassemble <input.luxb>");
        return Err(1);
    }

    let program = read_binary(&args[0])?;
    print!("{}", lux_assembler::disassemble(&program));
    Ok(())
}

/// Execute a .luxb file and print the final stack.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: lux run <input.luxb> [--max-steps N] [--dump]");
        return Err(1);
    }

    let input = &args[0];
    let options = parse_run_options(&args[1..])?;
    let mut program = read_binary(input)?;
    let len = program.len();

    let mut vm = VM::new(&mut program);
    let outcome = match options.max_steps {
        Some(budget) => run_with_budget(&mut vm, budget),
        None => vm.run(),
    };

    if let Err(e) = outcome {
        eprintln!("runtime error: {e}");
        if options.dump {
            dump(vm.memory(), vm.stack());
        }
        return Err(3);
    }

    if *vm.status() == Status::Running && vm.ip() < len {
        eprintln!(
            "error: step budget exhausted after {} instructions (next offset {:#06x})",
            vm.steps(),
            vm.ip()
        );
        if options.dump {
            dump(vm.memory(), vm.stack());
        }
        return Err(4);
    }

    debug!("{input}: {} instructions executed", vm.steps());
    println!("{}", format_bytes(vm.stack().contents()));
    if options.dump {
        dump(vm.memory(), vm.stack());
    }
    Ok(())
}

/// Flags accepted by `lux run`.
#[derive(Debug, Default, PartialEq, Eq)]
struct RunOptions {
    max_steps: Option<u64>,
    dump: bool,
}

fn parse_run_options(args: &[String]) -> Result<RunOptions, i32> {
    let mut options = RunOptions::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dump" => options.dump = true,
            "--max-steps" => {
                let value = args.get(i + 1).ok_or_else(|| {
                    eprintln!("error: --max-steps requires a value");
                    1
                })?;
                let steps = value.parse::<u64>().map_err(|_| {
                    eprintln!("error: invalid step count '{value}'");
                    1
                })?;
                options.max_steps = Some(steps);
                i += 1;
            }
            other => {
                eprintln!("error: unknown option '{other}'");
                eprintln!("Usage: lux run <input.luxb> [--max-steps N] [--dump]");
                return Err(1);
            }
        }
        i += 1;
    }
    Ok(options)
}

/// Execute at most `budget` instructions.
fn run_with_budget(vm: &mut VM<'_>, budget: u64) -> Result<(), lux_vm::RuntimeError> {
    for _ in 0..budget {
        if !vm.step()? {
            break;
        }
    }
    Ok(())
}

/// Print memory as 16-byte rows, then the live stack.
fn dump(memory: &Memory, stack: &Stack) {
    println!("memory:");
    for (row, chunk) in memory.as_bytes().chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        println!("  {:#04x}: {}", row * 16, hex.join(" "));
    }
    println!("stack ({} bytes): {}", stack.pointer(), format_bytes(stack.contents()));
}

/// Render bytes as space-separated hex, bottom of the stack first.
fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:#04x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read a bytecode file. Every byte sequence is a loadable program.
fn read_binary(path: &str) -> Result<Executable, i32> {
    let bytes = fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;
    info!("loaded {} bytes from {path}", bytes.len());
    Ok(Executable::new(bytes))
}
