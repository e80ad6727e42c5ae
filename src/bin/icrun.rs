// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run an Intcode program file on the interactive console device.

use std::fs::read_to_string;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use icvm::prelude::*;

#[derive(Debug, Parser)]
#[command(version, about = "Run an Intcode program, prompting for its inputs")]
struct Args {
    /// Path to the comma-separated program file
    source: PathBuf,
    /// Log each executed instruction to stderr
    #[arg(short, long)]
    trace: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let text = match read_to_string(&args.source) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("could not read {}: {e}", args.source.display());
            return ExitCode::FAILURE;
        }
    };
    let program: Program = match text.parse() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("could not parse {}: {e}", args.source.display());
            return ExitCode::FAILURE;
        }
    };

    let mut computer = Computer::new(program);
    if args.trace {
        computer.log_with(io::stderr());
    }
    match computer.run() {
        Ok(State::Halted) => ExitCode::SUCCESS,
        Ok(State::Awaiting) => {
            eprintln!("program stopped awaiting input");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("execution failed: {e}");
            ExitCode::FAILURE
        }
    }
}
