use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Trim `evppi.log` once it grows past this many bytes
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Tail retained by a trim
const KEEP_SIZE: u64 = 1024 * 1024;

pub const LOG_FILE_NAME: &str = "evppi.log";

const TRIM_MARKER: &[u8] = b"[evppi] earlier runs trimmed from this log\n";

fn trim_log(log_path: &Path) -> std::io::Result<bool> {
    trim_to_tail(log_path, MAX_LOG_SIZE, KEEP_SIZE)
}

/// Cut the file down to its last `keep` bytes, starting at a line boundary,
/// when it is larger than `limit`. Returns whether anything was cut.
fn trim_to_tail(log_path: &Path, limit: u64, keep: u64) -> std::io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size <= limit {
        return Ok(false);
    }

    let mut tail = Vec::with_capacity(keep as usize);
    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::End(-(keep.min(size) as i64)))?;
    file.read_to_end(&mut tail)?;

    let first_line = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(tail.len(), |i| i + 1);
    let mut trimmed = TRIM_MARKER.to_vec();
    trimmed.extend_from_slice(&tail[first_line..]);
    fs::write(log_path, trimmed)?;
    Ok(true)
}

/// Initialize logging.
///
/// Without a directory, events go to stderr. With one, they go to
/// `{log_dir}/evppi.log` through a non-blocking writer, after size-based
/// trimming (above 5MB only the last 1MB is kept). The returned guard must be
/// held until exit so buffered lines are flushed.
///
/// The level applies to this binary; the core library logs warnings only
/// unless `RUST_LOG` says otherwise.
pub fn init_logging(log_dir: Option<&Path>, level: &str) -> color_eyre::Result<Option<WorkerGuard>> {
    let default_filter = format!("evppi={level},evppi_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    let Some(log_dir) = log_dir else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()?;
        return Ok(None);
    };

    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);

    let trim = trim_log(&log_path);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    registry
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    match trim {
        Ok(true) => tracing::info!(log_path = %log_path.display(), "Trimmed oversized log"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Could not trim log file"),
    }
    tracing::info!(log_path = %log_path.display(), "EVPPI logging initialized");
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_small_log_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "one\ntwo\n").unwrap();

        assert!(!trim_to_tail(&path, 100, 10).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_trim_keeps_recent_whole_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let content: String = (0..100).map(|i| format!("line {i:03}\n")).collect();
        fs::write(&path, &content).unwrap();

        // Each line is 9 bytes; keeping 40 bytes starts mid-line
        assert!(trim_to_tail(&path, 500, 40).unwrap());

        let trimmed = fs::read_to_string(&path).unwrap();
        let mut lines = trimmed.lines();
        assert_eq!(lines.next(), Some("[evppi] earlier runs trimmed from this log"));
        let rest: Vec<&str> = lines.collect();
        assert_eq!(rest, vec!["line 096", "line 097", "line 098", "line 099"]);
    }

    #[test]
    fn test_missing_log_is_fine() {
        let dir = tempdir().unwrap();
        assert!(!trim_log(&dir.path().join("absent.log")).unwrap());
    }
}
