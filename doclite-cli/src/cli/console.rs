// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for DocLite

use colored::Colorize;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::io::Write;
use std::path::{Path, PathBuf};

use doclite::{split_script, Database, DatabaseConfig, ExecutionError, Session, StorageError, StorageType};

use super::commands::{Cli, OutputFormat};
use super::output::ResultFormatter;

const HISTORY_PATH: &str = ".doclite/history.txt";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Console error: {0}")]
    Readline(#[from] ReadlineError),
}

/// Connection options shared by every subcommand
pub struct ConnectOptions {
    pub user: Option<String>,
    pub password: Option<String>,
    pub path: Option<PathBuf>,
    pub storage: Option<StorageType>,
    pub config: Option<PathBuf>,
}

impl ConnectOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            user: cli.user.clone(),
            password: cli.password.clone(),
            path: cli.path.clone(),
            storage: cli.storage,
            config: cli.config.clone(),
        }
    }

    /// Defaults, then the config file, then `DOCLITE_*`, then flags
    fn database_config(&self) -> Result<DatabaseConfig, CliError> {
        let config = match &self.config {
            Some(file) => DatabaseConfig::from_json_file(file)?,
            None => DatabaseConfig::default(),
        };
        let mut config = config.apply_env()?;
        if let Some(path) = &self.path {
            config = config.with_path(path).with_storage(StorageType::Sled);
        }
        if let Some(storage) = self.storage {
            config = config.with_storage(storage);
        }
        config.validate()?;
        Ok(config)
    }

    /// Open the database and a session for the configured user
    pub fn connect(&self) -> Result<(Database, Session), CliError> {
        let config = self.database_config()?;
        log::info!(
            "Opening {} database{}",
            config.storage,
            config
                .path
                .as_ref()
                .map(|p| format!(" at {:?}", p))
                .unwrap_or_default()
        );
        let db = Database::open(config)?;

        let session = match &self.user {
            Some(user) => {
                let password = match &self.password {
                    Some(password) => password.clone(),
                    None => {
                        print!("Password for {}: ", user);
                        std::io::stdout().flush()?;
                        rpassword::read_password()?
                    }
                };
                db.open_session(user, &password)?
            }
            None => {
                log::debug!("No user given, using embedded root session");
                db.root_session()
            }
        };
        Ok((db, session))
    }
}

/// Handle the version command
pub fn handle_version() {
    println!("{} {}", "doclite".bold().green(), env!("CARGO_PKG_VERSION"));
    println!("Storage backends: sled, memory");
}

/// Handle the query command (one-off execution)
pub fn handle_query(
    options: &ConnectOptions,
    query: &str,
    format: OutputFormat,
    explain: bool,
    describe: bool,
) -> Result<(), CliError> {
    let (db, session) = options.connect()?;

    if describe {
        let description = db.describe(query)?;
        println!("{}", ResultFormatter::format_description(&description, format));
        return Ok(());
    }

    let command = if explain {
        format!("EXPLAIN {}", query.trim().trim_end_matches(';'))
    } else {
        query.to_string()
    };
    let result = db.command(&session, &command)?;
    println!("{}", ResultFormatter::format(&result, format));
    db.flush()?;
    Ok(())
}

/// Handle the script command; stops at the first failing command
pub fn handle_script(options: &ConnectOptions, file: &Path, format: OutputFormat) -> Result<(), CliError> {
    let text = std::fs::read_to_string(file)?;
    let (db, session) = options.connect()?;

    let commands = split_script(&text);
    log::info!("Executing {} commands from {:?}", commands.len(), file);
    for (n, command) in commands.iter().enumerate() {
        match db.command(&session, command) {
            Ok(result) => println!("{}", ResultFormatter::format(&result, format)),
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Command {} failed: {}\n  {}", n + 1, e, command).red()
                );
                return Err(e.into());
            }
        }
    }
    db.flush()?;
    Ok(())
}

/// Handle the console (REPL) command
pub fn handle_console(options: &ConnectOptions) -> Result<(), CliError> {
    let (db, session) = options.connect()?;

    println!("{}", "DocLite".bold().green());
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    println!("Multi-line commands supported - use ';' to terminate");
    println!("{}", format!("Authenticated as: {}", session.user()).cyan());
    println!("Session ID: {}", session.id());

    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();
    let mut rl = Editor::<(), _>::with_config(config)?;

    if let Some(parent) = Path::new(HISTORY_PATH).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.load_history(HISTORY_PATH);

    let mut buffer = String::new();
    loop {
        let marker = if db.in_transaction(&session) { "*" } else { "" };
        let prompt = if buffer.is_empty() {
            format!("{}{}> ", session.user().cyan(), marker)
        } else {
            format!("{}{}...> ", session.user().cyan(), marker)
        };

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if !buffer.is_empty() {
                    buffer.clear();
                    println!("{}", "\nCommand buffer cleared".yellow());
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        if buffer.is_empty() {
            match trimmed.to_lowercase().as_str() {
                "exit" | "quit" => {
                    println!("{}", "Goodbye!".green());
                    break;
                }
                "help" => {
                    print_help();
                    continue;
                }
                "clear" => {
                    print!("\x1B[2J\x1B[1;1H");
                    std::io::stdout().flush()?;
                    continue;
                }
                "" => continue,
                _ => {}
            }
        }

        buffer.push_str(&line);
        buffer.push('\n');
        if !trimmed.ends_with(';') {
            continue;
        }

        let text = buffer.trim().to_string();
        rl.add_history_entry(text.as_str())?;
        for command in split_script(&text) {
            match db.command(&session, command) {
                Ok(result) => println!("{}", ResultFormatter::format(&result, OutputFormat::Table)),
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                    break;
                }
            }
        }
        buffer.clear();
    }

    if db.in_transaction(&session) {
        println!("{}", "Rolling back open transaction".yellow());
        db.rollback(&session)?;
    }
    let _ = rl.save_history(HISTORY_PATH);
    db.flush()?;
    Ok(())
}

fn print_help() {
    println!("{}", "Available commands:".bold().green());
    println!("  {}  - Show this help message", "help".cyan());
    println!("  {}  - Exit the console", "exit/quit".cyan());
    println!("  {}  - Clear the screen", "clear".cyan());
    println!("\n{}", "Command syntax:".bold().green());
    println!("  Multi-line commands are supported");
    println!("  Terminate commands with semicolon (;)");
    println!("  A '*' in the prompt marks an open transaction");
    println!("\n{}", "Examples:".bold().green());
    println!("  {}", "CREATE CLUSTER archive;".yellow());
    println!("  {}", "CREATE SEQUENCE invoice TYPE ORDERED START 1000;".yellow());
    println!("  {}", "EXPLAIN TRUNCATE CLASS Draft POLYMORPHIC;".yellow());
    println!("  {}", "BEGIN; DROP CLUSTER archive; ROLLBACK;".yellow());
}
