// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

mod cli;

use std::process::ExitCode;

use clap::Parser;
use colored::*;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    cli::logging::init(args.verbose, args.quiet);

    match cli::run(args) {
        Ok(code) => code,
        Err(err) => {
            println!("{} {:#}", "[-]".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
