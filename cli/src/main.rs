use std::process::ExitCode;

use clap::Parser;

mod args;

use args::{Cli, Commands};
use cli::commands::{ast, disassemble, run, tokens};
use cli::config::HostConfig;
use cli::report;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            path,
            seed,
            trace,
            config,
        } => HostConfig::load(config.as_deref()).and_then(|mut host| {
            host.apply_flags(seed, trace);
            host.init_logging()?;
            run::run_file(&path, host.vm)
        }),
        Commands::Tokens { path } => tokens::tokens_file(&path),
        Commands::Ast { path } => ast::ast_file(&path),
        Commands::Disassemble { path } => disassemble::disassemble_file(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", report(&err));
            ExitCode::FAILURE
        }
    }
}
