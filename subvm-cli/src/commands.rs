//! CLI command implementations.
//!
//! Each command returns `Err(exit_code)` after reporting to stderr.

use std::fs;
use std::path::Path;

use log::debug;
use subvm_analysis::analyze as analyze_code;
use subvm_common::Code;
use subvm_vm::{AbortRecord, Config, StepRecord, Tracer};

/// Execute a program and print its outcome.
pub fn run(input: &str, gas: u64, trace: bool) -> Result<(), i32> {
    let code = load_code(input)?;
    let config = Config::with_gas_limit(gas);
    debug!("running {} bytes with gas limit {gas}", code.len());

    let mut tracer = RunTracer {
        json: trace,
        abort: None,
    };
    match subvm_vm::run_traced(&code, &config, &mut tracer) {
        Ok(outcome) => {
            println!("ok gas_used={}", outcome.gas_used);
            for word in outcome.stack.iter().rev() {
                println!("{word:#x}");
            }
            Ok(())
        }
        Err(e) => {
            match tracer.abort {
                Some(record) => eprintln!(
                    "runtime error: {} at pc {} ({})",
                    record.error, record.pc, record.op
                ),
                None => eprintln!("runtime error: {e}"),
            }
            Err(3)
        }
    }
}

/// Assemble a text file to hex.
pub fn assemble(input: &Path, output: Option<&Path>) -> Result<(), i32> {
    let text = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", input.display());
        1
    })?;

    let code = subvm_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let hex = code.to_hex();
    match output {
        Some(path) => {
            fs::write(path, format!("{hex}\n")).map_err(|e| {
                eprintln!("error: cannot write '{}': {e}", path.display());
                1
            })?;
            eprintln!("assembled {} bytes -> {}", code.len(), path.display());
        }
        None => println!("{hex}"),
    }
    Ok(())
}

/// Disassemble bytecode to text on stdout.
pub fn disassemble(input: &str) -> Result<(), i32> {
    let code = load_code(input)?;
    print!("{}", subvm_assembler::disassemble(&code));
    Ok(())
}

/// Print the analysis report. Fails with exit code 2 on any error issue.
pub fn analyze(input: &str, json: bool) -> Result<(), i32> {
    let code = load_code(input)?;
    let report = analyze_code(&code);

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| {
            eprintln!("error: cannot serialize report: {e}");
            1
        })?;
        println!("{text}");
    } else {
        println!("digest: {}", report.digest);
        println!("instructions: {}", report.instructions.len());
        println!("jump destinations: {}", offsets(&report.jump_destinations));
        println!("subroutine entries: {}", offsets(&report.subroutine_entries));
        for issue in &report.issues {
            let level = if issue.is_error() { "error" } else { "warning" };
            eprintln!("{level}: {issue}");
        }
    }

    if report.has_errors() {
        Err(2)
    } else {
        Ok(())
    }
}

/// Keeps the abort record, and with `json` set streams every record to
/// stdout as one JSON object per line.
struct RunTracer {
    json: bool,
    abort: Option<AbortRecord>,
}

impl Tracer for RunTracer {
    fn enabled(&self) -> bool {
        self.json
    }

    fn step(&mut self, record: StepRecord) {
        print_json(&record);
    }

    fn abort(&mut self, record: AbortRecord) {
        if self.json {
            print_json(&record);
        }
        self.abort = Some(record);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("error: cannot serialize trace record: {e}"),
    }
}

fn offsets(list: &[usize]) -> String {
    if list.is_empty() {
        return "-".to_string();
    }
    list.iter()
        .map(|o| o.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load code from a `.asm` file, a `.hex` file, or inline hex.
fn load_code(input: &str) -> Result<Code, i32> {
    let path = Path::new(input);
    if !path.is_file() {
        return Code::from_hex(input).map_err(|e| {
            eprintln!("error: '{input}' is neither a file nor valid hex: {e}");
            1
        });
    }

    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    if path.extension().is_some_and(|ext| ext == "asm") {
        subvm_assembler::assemble(&text).map_err(|e| {
            eprintln!("error: {input}: {e}");
            1
        })
    } else {
        Code::from_hex(&text).map_err(|e| {
            eprintln!("error: {input}: {e}");
            1
        })
    }
}
