//! Common test utilities, fixtures, and mocks

pub mod mocks;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Scratch directory Cargo provides to integration tests.
pub fn scratch_path() -> PathBuf {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("tgmusic")
}

/// Collects log lines emitted on the current thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Overrides the global test subscriber until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Number of captured lines at `level` containing `needle`.
    pub fn count(&self, level: &str, needle: &str) -> usize {
        self.contents()
            .lines()
            .filter(|line| line.contains(level) && line.contains(needle))
            .count()
    }
}

pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.buffer))
    }
}

/// Paths to the fake `ffprobe` executables used by the prober tests.
pub struct FakeProbes {
    /// Reports 10.7s, but only for files that exist.
    pub strict: PathBuf,
    /// Exits non-zero with a message on stderr.
    pub failing: PathBuf,
    /// Prints something that is not JSON.
    pub garbage: PathBuf,
    /// Prints a report without `format.duration`.
    pub no_duration: PathBuf,
    /// Never finishes in time.
    pub slow: PathBuf,
    /// A media file that exists on disk.
    pub media_file: PathBuf,
}

static FAKE_PROBES: OnceLock<FakeProbes> = OnceLock::new();

/// Writes the fake probes once, before any test spawns them.
#[cfg(unix)]
pub fn fake_probes() -> &'static FakeProbes {
    FAKE_PROBES.get_or_init(|| {
        let dir = scratch_path().join("fake_ffprobe");
        fs::create_dir_all(&dir).expect("Failed to create fake ffprobe directory");

        let media_file = dir.join("ten_seconds.ogg");
        fs::write(&media_file, b"OggS").expect("Failed to write media fixture");

        FakeProbes {
            strict: write_script(
                &dir,
                "strict",
                r#"[ -f "$7" ] || { echo "$7: No such file or directory" >&2; exit 1; }
echo '{"streams":[{"index":0,"codec_type":"audio","codec_name":"vorbis"}],"format":{"format_name":"ogg","duration":"10.700000"}}'"#,
            ),
            failing: write_script(&dir, "failing", r#"echo "Invalid data found" >&2; exit 1"#),
            garbage: write_script(&dir, "garbage", "echo 'this is not json'"),
            no_duration: write_script(&dir, "no_duration", r#"echo '{"format":{"format_name":"ogg"}}'"#),
            slow: write_script(&dir, "slow", "exec sleep 10"),
            media_file,
        }
    })
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write fake ffprobe");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake ffprobe executable");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_path() {
        assert!(scratch_path().ends_with("tgmusic"));
    }

    #[test]
    fn test_log_capture_counts_matching_lines() {
        let logs = LogCapture::default();
        {
            let _guard = logs.install();
            tracing::warn!("first failure");
            tracing::info!("all good");
            tracing::warn!("second failure");
        }
        tracing::warn!("after the guard");

        assert_eq!(logs.count("WARN", "failure"), 2);
        assert_eq!(logs.count("INFO", "all good"), 1);
        assert_eq!(logs.count("WARN", "after the guard"), 0);
    }
}
