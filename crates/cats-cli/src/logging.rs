use std::fs;
use std::path::Path;

use anyhow::anyhow;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Sends all tracing output to `log_file` so the terminal stays free for the
/// UI. `RUST_LOG` takes precedence over `level`. Keep the returned guard
/// alive until exit or buffered lines are lost.
pub fn init(log_file: &Path, level: &str) -> Result<WorkerGuard> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        return EnvFilter::new(format!(
            "warn,cats_cli={level},cats_term={level},cats_catalog={level}"
        ));
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init()
        .map_err(|err| return anyhow!(err))?;

    return Ok(guard);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_log_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("nested").join("cats.log");

        let guard = init(&log_file, "debug").unwrap();
        tracing::info!("hello from the test");
        drop(guard);

        assert!(log_file.exists());
    }
}
