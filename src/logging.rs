/**
Setup of the per-run log file. Every run writes its own `evaluation-<timestamp>.log`, holding the
configuration, the examples and the final means. The same events are echoed on stderr.
*/
use chrono::NaiveDateTime;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Name of the log file of a run started at `start`.
pub fn log_file_name(start: NaiveDateTime) -> String {
    format!("evaluation-{}.log", start.format(TIMESTAMP_FORMAT))
}

/// Creates the log directory and the log file of the run, then installs the global subscriber.
/// The level is read from `RUST_LOG` and defaults to `info`. Returns the path of the log file.
pub fn init_run_logging<P: AsRef<Path>>(log_dir: P, start: NaiveDateTime) -> io::Result<PathBuf> {
    let log_dir = log_dir.as_ref();
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(log_file_name(start));
    let file = File::create(&path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init()
        .map_err(io::Error::other)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_log_file_name() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        assert_eq!(log_file_name(start), "evaluation-2024-03-07_09-05-42.log");
    }
}
