mod config;
mod error;
mod ledger;
mod logging;
mod models;
mod pipeline;
mod run;
mod session;
mod store;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::session::Session;
use crate::store::{MemoryPort, SqlitePort};

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let ephemeral = take_flag(&mut args, "--ephemeral");

    let dirs = directories::ProjectDirs::from("com", "tallytui", "TallyTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = ensure_dir(dirs.data_dir())?;
    let settings = Settings::load(dirs.config_dir()).context("Failed to load settings")?;
    logging::init(&data_dir, &settings.log_filter)?;
    tracing::info!(
        "tallytui {} starting (ephemeral: {ephemeral})",
        env!("CARGO_PKG_VERSION")
    );

    let mut session = if ephemeral {
        Session::open(MemoryPort::new(), &settings)
    } else {
        let db_path = data_dir.join("tallytui.db");
        let port = SqlitePort::open(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
        Session::open(port, &settings)
    };

    if args.is_empty() {
        run::as_tui(&mut session)
    } else {
        run::as_cli(&args, &mut session)
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}
