//! Weekly planner with a recorded, reversible history.
//!
//! Reads one command per line from stdin. Logs go to stderr; set `RUST_LOG`
//! for more detail.

mod app;
mod command;
mod config;
mod view;

use std::io::BufRead;

use eyre::WrapErr;
use tracing::{debug, info};
use weekboard_history::Engine;
use weekboard_persist::StateDb;

use crate::app::{App, Flow};
use crate::command::Command;
use crate::config::Config;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("weekboard_cli=info".parse()?)
                .add_directive("weekboard_history=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    info!("Database: {}", config.db_path.display());

    let db = StateDb::open(&config.db_path)
        .wrap_err_with(|| format!("failed to open {}", config.db_path.display()))?;
    let engine = Engine::open(db, config.engine);

    let mut app = App::new(engine);
    app.install_views();

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.wrap_err("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let result = Command::parse(&line)
            .map_err(|e| e.to_string())
            .and_then(|command| app.handle(command).map_err(|e| e.to_string()));

        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(message) => view::emit(&format!("error: {message}\n")),
        }
    }

    debug!("Input closed, {} entries recorded", app.engine().history().len());
    Ok(())
}
