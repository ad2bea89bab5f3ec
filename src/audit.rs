use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::config::data_dir;

/// Write an entry to the activity log in the data directory
pub fn log(entry: &str) -> Result<()> {
    log_to(&data_dir(), entry)
}

/// Append a timestamped entry to `activity.log` under `log_dir`
pub fn log_to(log_dir: &Path, entry: &str) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_path = log_dir.join("activity.log");

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        entry
    )?;
    Ok(())
}
