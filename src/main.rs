//! Binary entry point: reads requests from stdin until `exit` or end of input.

use std::io::{self, BufRead};

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use todo::cli::{Cli, Config};
use todo::cmd::{cmd_completions, process_request};
use todo::manager::TaskManager;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("todo=info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Some(shell) = cli.completions {
        cmd_completions(shell);
        return;
    }

    let config = Config::from(&cli);
    let mut manager = TaskManager::new(config.clone());
    if config.db_path.exists() {
        manager.load(&config.db_path);
    } else {
        debug!("{} not found, starting with no tasks", config.db_path.display());
    }

    for line in io::stdin().lock().lines() {
        match line {
            Ok(line) => {
                if !process_request(&mut manager, &line) {
                    break;
                }
            }
            Err(e) => {
                error!("Couldn't fetch the request: {e}; program will be terminated");
                break;
            }
        }
    }

    if let Err(e) = manager.store_changes(true) {
        error!("Couldn't save changes to {}: {e}", config.db_path.display());
        std::process::exit(1);
    }
}
