//! Playback utilities for a Telegram music bot: duration formatting,
//! "now playing" logging, and ffprobe-based duration probing.

pub mod config;
pub mod telegram;
pub mod track;
pub mod utils;

pub use config::{Config, ConfigError};
pub use telegram::{BotClient, ChatId, MessageSender, SendOptions, TelegramError};
pub use track::CachedTrack;
pub use utils::{AudioProber, PlaybackNotifier, get_audio_duration, sec_to_min};

/// Top-level error type for the binary.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
