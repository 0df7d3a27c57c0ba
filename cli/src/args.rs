use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shark")]
#[command(about = "Shark scripting language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile and run a script
    Run {
        /// Path to the script (.shark)
        path: PathBuf,
        /// Seed for dice/randint/random
        #[arg(long)]
        seed: Option<u64>,
        /// Log every executed instruction
        #[arg(long)]
        trace: bool,
        /// TOML file with [vm] and [log] sections
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the token stream as JSON, one token per line
    Tokens {
        path: PathBuf,
    },
    /// Print the syntax tree as JSON
    Ast {
        path: PathBuf,
    },
    /// Print the compiled bytecode
    Disassemble {
        path: PathBuf,
    },
}
