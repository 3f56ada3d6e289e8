// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! DocLite command-line entry point

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::console::ConnectOptions;
use cli::{handle_console, handle_query, handle_script, handle_version, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let level = match (cli.log_level, cli.verbose) {
        (Some(level), _) => level.to_level_filter(),
        (None, true) => log::LevelFilter::Debug,
        (None, false) => log::LevelFilter::Warn,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .init();

    let options = ConnectOptions::from_cli(&cli);
    let outcome = match &cli.command {
        Commands::Version => {
            handle_version();
            Ok(())
        }
        Commands::Query {
            query,
            format,
            explain,
            describe,
        } => handle_query(&options, query, *format, *explain, *describe),
        Commands::Script { file, format } => handle_script(&options, file, *format),
        Commands::Console => handle_console(&options),
    };

    if let Err(e) = outcome {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}
