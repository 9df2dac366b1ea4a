use std::io;
use std::process::ExitCode;

use clap::Parser;

use carlot_cli::args::Args;
use carlot_infra::InventoryError;
use carlot_observability::LogFormat;

fn main() -> ExitCode {
    let args = Args::parse();
    carlot_observability::init(args.log_format.unwrap_or_else(LogFormat::from_env));

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    match carlot_cli::run(args, stdin, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<InventoryError>() {
            Some(inventory) if inventory.is_recoverable() => {
                eprintln!("notice: {inventory}");
                ExitCode::from(2)
            }
            _ => {
                tracing::error!("command failed: {err:#}");
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
