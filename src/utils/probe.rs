//! Reads media durations by running `ffprobe` and parsing its JSON report.

use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::Config;
use crate::track::CachedTrack;

use super::format::{AsSeconds, FormatError, Seconds, whole_seconds};

pub const DEFAULT_PROBE_PROGRAM: &str = "ffprobe";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while probing a media file.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to start {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read probe output: {0}")]
    Io(#[from] io::Error),

    #[error("probe did not finish within {0:?}")]
    Timeout(Duration),

    #[error("probe exited with {status}: {stderr}")]
    ExitStatus { status: ExitStatus, stderr: String },

    #[error("unable to parse probe output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("probe output has no format.duration")]
    MissingDuration,

    #[error("invalid duration: {0}")]
    InvalidDuration(#[from] FormatError),
}

pub type ProbeResult<T> = Result<T, ProbeError>;

/// ffprobe prints durations as strings ("10.700000"), but accept numbers too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum RawSeconds {
    Number(f64),
    Text(String),
}

impl AsSeconds for RawSeconds {
    fn as_seconds(&self) -> Result<Seconds, FormatError> {
        match self {
            RawSeconds::Number(n) => n.as_seconds(),
            RawSeconds::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Seconds::Fractional)
                .map_err(|_| FormatError::NotANumber(s.clone())),
        }
    }
}

/// The `format` section of an ffprobe report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbeFormat {
    #[serde(default)]
    pub format_name: Option<String>,
    #[serde(default)]
    duration: Option<RawSeconds>,
}

/// One entry of the `streams` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProbeStream {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
}

/// Parsed `ffprobe -print_format json -show_format -show_streams` output.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub format: Option<ProbeFormat>,
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

impl ProbeReport {
    pub fn from_json(bytes: &[u8]) -> ProbeResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// `format.duration` truncated to whole seconds.
    pub fn duration_secs(&self) -> ProbeResult<u64> {
        let raw = self
            .format
            .as_ref()
            .and_then(|format| format.duration.as_ref())
            .ok_or(ProbeError::MissingDuration)?;
        Ok(whole_seconds(raw)?)
    }

    fn has_stream(&self, kind: &str) -> bool {
        self.streams
            .iter()
            .any(|stream| stream.codec_type.as_deref() == Some(kind))
    }

    pub fn has_audio(&self) -> bool {
        self.has_stream("audio")
    }

    pub fn has_video(&self) -> bool {
        self.has_stream("video")
    }
}

/// Runs ffprobe with a bounded wait.
#[derive(Debug, Clone)]
pub struct AudioProber {
    program: PathBuf,
    timeout: Duration,
}

impl Default for AudioProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_PROGRAM, DEFAULT_PROBE_TIMEOUT)
    }
}

impl AudioProber {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ffprobe_path.clone(), config.ffprobe_timeout)
    }

    /// Runs ffprobe on `file_path` and parses its report.
    ///
    /// The child is killed if the timeout elapses; stdout and stderr are
    /// drained while waiting for it to exit.
    pub async fn probe(&self, file_path: impl AsRef<Path>) -> ProbeResult<ProbeReport> {
        let file_path = file_path.as_ref();
        debug!("Probing {:?} with {:?}", file_path, self.program);

        let child = Command::new(&self.program)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(file_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(ProbeError::ExitStatus {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        ProbeReport::from_json(&output.stdout)
    }

    /// Duration of `file_path` in whole seconds.
    pub async fn probe_duration(&self, file_path: impl AsRef<Path>) -> ProbeResult<u64> {
        self.probe(file_path).await?.duration_secs()
    }

    /// Like [`probe_duration`](Self::probe_duration), but logs any failure
    /// and returns `0` ("unknown duration") instead.
    pub async fn duration(&self, file_path: impl AsRef<Path>) -> u64 {
        match self.probe_duration(file_path).await {
            Ok(seconds) => seconds,
            Err(e) => {
                warn!("Failed to get audio duration using ffprobe: {}", e);
                0
            }
        }
    }

    /// Probes the track's local file if its duration is still unknown.
    pub async fn fill_duration(&self, track: &mut CachedTrack) {
        if !track.needs_duration() {
            return;
        }
        if let Some(file_path) = track.file_path.as_deref() {
            track.duration = self.duration(file_path).await;
        }
    }
}

/// Duration of `file_path` using `ffprobe` from `PATH`; `0` on failure.
pub async fn get_audio_duration(file_path: impl AsRef<Path>) -> u64 {
    AudioProber::default().duration(file_path).await
}
