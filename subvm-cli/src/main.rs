//! subvm CLI: run, assemble, disassemble, and analyze bytecode.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/decode/assembly error
//! - 2: Analysis failure
//! - 3: Runtime abort

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use subvm_vm::config::DEFAULT_GAS_LIMIT;

#[derive(Parser)]
#[command(name = "subvm")]
#[command(about = "Bytecode interpreter with native subroutines")]
#[command(version)]
struct Cli {
    /// Log interpreter events to stderr (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a program
    Run {
        /// Hex bytecode, or a path to a .hex or .asm file
        code: String,

        /// Gas budget for the execution context
        #[arg(long, default_value_t = DEFAULT_GAS_LIMIT)]
        gas: u64,

        /// Print one JSON record per step to stdout
        #[arg(long)]
        trace: bool,
    },

    /// Assemble text to hex bytecode
    Assemble {
        /// The assembly file
        input: PathBuf,

        /// Write hex here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Disassemble bytecode to text
    Disassemble {
        /// Hex bytecode, or a path to a .hex or .asm file
        code: String,
    },

    /// Report instructions, subroutine entries and issues
    Analyze {
        /// Hex bytecode, or a path to a .hex or .asm file
        code: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Run { code, gas, trace } => commands::run(&code, gas, trace),
        Commands::Assemble { input, output } => commands::assemble(&input, output.as_deref()),
        Commands::Disassemble { code } => commands::disassemble(&code),
        Commands::Analyze { code, json } => commands::analyze(&code, json),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
