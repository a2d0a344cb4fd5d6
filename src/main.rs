//! cellgrid - spreadsheet grid with arithmetic formulas, driven from the command line

mod command;
mod config;
mod error;

use anyhow::{Context, bail};
use cellgrid_core::{CellRef, FileSnapshotStore, Sheet};
use cellgrid_engine::engine::format_result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use command::Command;

#[derive(Parser)]
#[command(name = "cellgrid")]
#[command(about = "Spreadsheet grid with arithmetic formulas and dependency recalculation")]
#[command(version)]
struct Cli {
    /// Snapshot to open (.json or .grd); a missing file starts empty
    file: Option<PathBuf>,

    /// Run a shell command (can be repeated)
    #[arg(long, short = 'e', value_name = "CMD")]
    exec: Vec<String>,

    /// Evaluate one formula against the sheet and print the result
    #[arg(long, short = 'c', value_name = "FORMULA")]
    command: Option<String>,

    /// Write the resulting snapshot to this file
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the cells inside the sheet dimensions as JSON row arrays
    #[arg(long, value_name = "FILE")]
    rows_output: Option<PathBuf>,

    /// Write the resulting snapshot back to FILE
    #[arg(long)]
    save: bool,

    /// Read sheet options from this TOML file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long)]
    no_config: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let (options, warnings) = config::load_options(cli.config.as_ref(), cli.no_config);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut sheet = Sheet::with_options(options);
    let file_store = cli.file.as_ref().map(FileSnapshotStore::new);
    if let Some(store) = &file_store {
        sheet
            .load(store)
            .with_context(|| format!("Failed to open {}", store.path().display()))?;
    }

    for line in &cli.exec {
        let command: Command = line
            .parse()
            .with_context(|| format!("Invalid command '{}'", line))?;
        let out = command
            .execute(&mut sheet)
            .with_context(|| format!("Command '{}' failed", line))?;
        if !out.is_empty() {
            println!("{}", out);
        }
    }

    let mut code = ExitCode::SUCCESS;
    if let Some(formula) = &cli.command {
        let result = sheet.evaluate_at(formula, &CellRef::new(0, 0));
        println!("{}", format_result(&result));
        if let Err(e) = &result {
            log::info!("{}: {}", formula, e);
            code = ExitCode::from(1);
        }
    }

    if let Some(path) = &cli.output {
        sheet
            .save(&FileSnapshotStore::new(path))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if let Some(path) = &cli.rows_output {
        let json = sheet.rows_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if cli.save {
        let Some(store) = &file_store else {
            bail!("--save needs a FILE to write back to");
        };
        sheet
            .save(store)
            .with_context(|| format!("Failed to write {}", store.path().display()))?;
    }

    Ok(code)
}
