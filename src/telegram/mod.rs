//! Minimal Telegram Bot API surface used by the playback utilities:
//! chat identifiers, message options, and the `MessageSender` seam.

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use client::BotClient;

/// Errors returned by a messaging client.
#[derive(Error, Debug)]
pub enum TelegramError {
    /// Error during HTTP request communication.
    #[error("API communication failure: {0}")]
    Http(#[from] reqwest::Error),

    /// Error parsing the JSON response from the API.
    #[error("Unable to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// The Bot API answered with `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },
}

pub type TelegramResult<T> = Result<T, TelegramError>;

/// A Telegram chat: either a numeric id or a public `@username`.
///
/// `0` and the empty username are treated as "not set".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl ChatId {
    pub fn is_unset(&self) -> bool {
        match self {
            ChatId::Id(id) => *id == 0,
            ChatId::Username(name) => name.trim().is_empty(),
        }
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }
}

impl Default for ChatId {
    fn default() -> Self {
        ChatId::Id(0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }
}

impl FromStr for ChatId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(ChatId::default());
        }
        Ok(match s.parse::<i64>() {
            Ok(id) => ChatId::Id(id),
            Err(_) => ChatId::Username(s.to_string()),
        })
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Username(name) => f.write_str(name),
        }
    }
}

/// Text formatting mode understood by the Bot API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ParseMode {
    #[default]
    #[serde(rename = "HTML")]
    Html,
}

/// Per-message delivery options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub parse_mode: ParseMode,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
}

impl SendOptions {
    /// HTML message with no link preview and no notification sound.
    pub fn silent_html() -> Self {
        Self {
            parse_mode: ParseMode::Html,
            disable_web_page_preview: true,
            disable_notification: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// The part of a sent message the callers care about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

/// Something that can deliver a text message to a chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text_message(
        &self,
        chat_id: &ChatId,
        text: &str,
        options: &SendOptions,
    ) -> TelegramResult<Message>;
}

/// Escapes the characters Telegram's HTML parse mode treats specially.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
