//! Logging setup and log file lookup

use chrono::Local;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps HTTP client chatter out of the bot log
const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn";

/// Log to stderr and to `<dir>/bot_<date>.log`, returning the file path
pub fn init(dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("bot_{}.log", Local::now().format("%Y-%m-%d")));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(path)
}

/// Most recently created `.log` file in `dir`, if any
pub fn latest_log_file(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("log") || !path.is_file() {
            continue;
        }

        // created() is unsupported on some filesystems
        let meta = entry.metadata()?;
        let stamp = meta.created().or_else(|_| meta.modified())?;

        let is_newer = match &newest {
            Some((t, p)) => stamp > *t || (stamp == *t && path > *p),
            None => true,
        };
        if is_newer {
            newest = Some((stamp, path));
        }
    }
    Ok(newest.map(|(_, path)| path))
}
