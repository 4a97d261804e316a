//! Playback helpers shared by the bot's command handlers.

/// Duration formatting (`sec_to_min`).
pub mod format;
/// "Now playing" notifications to the logging channel.
pub mod notifier;
/// Media duration probing via ffprobe.
pub mod probe;

#[cfg(test)]
pub(crate) mod log_capture;

pub use format::{AsSeconds, FormatError, Seconds, sec_to_min, whole_seconds};
pub use notifier::{PlaybackNotifier, now_playing_text};
pub use probe::{AudioProber, ProbeError, ProbeReport, get_audio_duration};
