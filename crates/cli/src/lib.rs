//! Terminal front end: one-shot panel commands and the interactive shell.

pub mod args;
pub mod panel;
pub mod render;
pub mod shell;

use std::io::{BufRead, Write};

use anyhow::Context;

use carlot_infra::{InventoryService, JsonLinesStore, StoreConfig};

use crate::args::{Args, Command};
use crate::shell::Shell;

/// Open the record files named by `args` and execute its command.
pub fn run<R: BufRead, W: Write>(args: Args, input: R, out: &mut W) -> anyhow::Result<()> {
    let config = args
        .data_dir
        .map(StoreConfig::in_dir)
        .unwrap_or_else(StoreConfig::from_env);
    tracing::info!(data_dir = %config.data_dir.display(), "opening record files");

    let store = JsonLinesStore::open(&config)
        .with_context(|| format!("failed to open records in {}", config.data_dir.display()))?;
    let service = InventoryService::new(store);

    match args.command {
        Command::Customer(command) => panel::run_customer(&service, command, out),
        Command::Admin(command) => panel::run_admin(&service, command, out),
        Command::Shell { panel } => Shell::new(&service, input, out, panel).run(),
    }
}
