//! Integration tests for the Lux CLI.
//!
//! These tests invoke the `lux` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn lux() -> Command {
    Command::cargo_bin("lux").unwrap()
}

/// Helper: assemble a .lasm source, returning the path to the .luxb output.
fn assemble_to_temp(dir: &TempDir, source: &str) -> PathBuf {
    let input = dir.path().join("test.lasm");
    let output = dir.path().join("test.luxb");
    fs::write(&input, source).unwrap();
    lux()
        .args([
            "assemble",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    output
}

/// Helper: write raw bytecode to a temp file.
fn bytes_to_temp(dir: &TempDir, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join("raw.luxb");
    fs::write(&path, bytes).unwrap();
    path
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    lux()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: lux"));
}

#[test]
fn help_flag_exits_0() {
    lux()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    lux()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown command"));
}

// ---- Assemble ----

#[test]
fn assemble_simple_program() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("test.lasm");
    let output = dir.path().join("test.luxb");
    fs::write(&input, "PUSH 0x0a\nADD TOP 3\n").unwrap();

    lux()
        .args([
            "assemble",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("assembled 5 bytes"));

    assert_eq!(fs::read(&output).unwrap(), vec![0xfd, 0x0a, 0xa0, 0xb0, 0x03]);
}

#[test]
fn assemble_default_output_name() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("prog.lasm");
    fs::write(&input, "POP\n").unwrap();

    lux()
        .args(["assemble", input.to_str().unwrap()])
        .assert()
        .success();

    assert!(dir.path().join("prog.luxb").exists());
}

#[test]
fn assemble_bad_input_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.lasm");
    fs::write(&input, "PUSH 1\nFOOBAR\n").unwrap();

    lux()
        .args(["assemble", input.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 2: unknown mnemonic 'FOOBAR'"));
}

#[test]
fn assemble_missing_file_exits_1() {
    lux()
        .args(["assemble", "nonexistent.lasm"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

// ---- Run ----

#[test]
fn run_prints_stack_bottom_to_top() {
    let dir = TempDir::new().unwrap();
    let luxb = assemble_to_temp(&dir, "PUSH 0x0a\nADD TOP 3\n");

    lux()
        .args(["run", luxb.to_str().unwrap()])
        .assert()
        .success()
        .stdout("0x0a 0x0d\n");
}

#[test]
fn run_empty_program() {
    let dir = TempDir::new().unwrap();
    let luxb = bytes_to_temp(&dir, &[]);

    lux()
        .args(["run", luxb.to_str().unwrap()])
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn run_fault_exits_3() {
    let dir = TempDir::new().unwrap();
    let luxb = assemble_to_temp(&dir, "PUSH 1\nDIV 4 0\n");

    lux()
        .args(["run", luxb.to_str().unwrap()])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("runtime error"));
}

#[test]
fn run_invalid_opcode_exits_3() {
    let dir = TempDir::new().unwrap();
    let luxb = bytes_to_temp(&dir, &[0xfd, 0x01, 0x07]);

    lux()
        .args(["run", luxb.to_str().unwrap()])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn run_infinite_loop_hits_step_budget() {
    let dir = TempDir::new().unwrap();
    let luxb = assemble_to_temp(&dir, "JMP 0\n");

    lux()
        .args(["run", luxb.to_str().unwrap(), "--max-steps", "100"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("step budget exhausted after 100"));
}

#[test]
fn run_budget_exactly_covering_program_succeeds() {
    let dir = TempDir::new().unwrap();
    let luxb = assemble_to_temp(&dir, "PUSH 1\nPUSH 2\n");

    lux()
        .args(["run", luxb.to_str().unwrap(), "--max-steps", "2"])
        .assert()
        .success()
        .stdout("0x01 0x02\n");
}

#[test]
fn run_dump_shows_memory() {
    let dir = TempDir::new().unwrap();
    let luxb = assemble_to_temp(&dir, "MOVW 0x00 0xbeef\nPUSH 7\n");

    lux()
        .args(["run", luxb.to_str().unwrap(), "--dump"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0x00: be ef 00"))
        .stdout(predicate::str::contains("stack (1 bytes): 0x07"));
}

#[test]
fn run_bad_option_exits_1() {
    let dir = TempDir::new().unwrap();
    let luxb = bytes_to_temp(&dir, &[]);

    lux()
        .args(["run", luxb.to_str().unwrap(), "--max-steps", "many"])
        .assert()
        .failure()
        .code(1);
}

// ---- Disassemble ----

#[test]
fn disassemble_roundtrip() {
    let dir = TempDir::new().unwrap();
    let original = "MOVE REF WORD 0x10 TOP\nJLE 0x01 0x02 0x00\nDB 0x07\n";
    let luxb = assemble_to_temp(&dir, original);

    lux()
        .args(["disassemble", luxb.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::eq(original));
}

#[test]
fn disassemble_missing_file_exits_1() {
    lux()
        .args(["disassemble", "nonexistent.luxb"])
        .assert()
        .failure()
        .code(1);
}
