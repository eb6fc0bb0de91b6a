use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "FEEDBRIDGE_LOG";

/// Install the file logger when `FEEDBRIDGE_LOG` is set.
///
/// Off by default: the TUI owns stdout/stderr. `RUST_LOG` picks levels
/// (default `info`). Each run writes its own file, see [`unique_log_path`].
pub fn init_tracing() {
    let Some(base) = std::env::var_os(LOG_ENV) else {
        return;
    };
    let path = unique_log_path(&base.to_string_lossy(), std::process::id());

    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("feedbridge: cannot create log file {}: {}", path.display(), err);
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_names(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    match tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
    {
        Ok(()) => tracing::info!(path = %path.display(), "logging to file"),
        // Someone else installed a subscriber first; report through it.
        Err(err) => tracing::warn!(error = %err, "file logger not installed"),
    }
}

/// `{base}.{unix_seconds}.{pid}`, so concurrent instances never share a file.
pub fn unique_log_path(base: &str, pid: u32) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("{base}.{secs}.{pid}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_carries_base_and_pid() {
        let path = unique_log_path("/tmp/feedbridge.log", 4242);
        let name = path.to_string_lossy();
        assert!(name.starts_with("/tmp/feedbridge.log."));
        assert!(name.ends_with(".4242"));
    }
}
