//! Mirrors "now playing" events into the configured logging channel.

use tracing::{debug, error};

use crate::config::Config;
use crate::telegram::{ChatId, MessageSender, SendOptions, escape_html};
use crate::track::CachedTrack;

use super::format::sec_to_min;

/// Build the HTML log message for a track that started playing in `chat_id`.
pub fn now_playing_text(chat_id: &ChatId, song: &CachedTrack) -> String {
    let duration = sec_to_min(song.duration).unwrap_or_else(|| "Unknown".to_string());

    format!(
        "<b>Song Playing</b> in <code>{}</code>\n\n\
         ▶️ <b>Now Playing:</b> <a href='{}'>{}</a>\n\n\
         • <b>Duration:</b> {}\n\
         • <b>Requested by:</b> {}\n\
         • <b>Platform:</b> {}",
        escape_html(&chat_id.to_string()),
        escape_html(&song.url),
        escape_html(&song.name),
        duration,
        escape_html(&song.user),
        escape_html(&song.platform),
    )
}

/// Sends playback notifications through `C` to a single logging channel.
pub struct PlaybackNotifier<C> {
    client: C,
    logger_id: ChatId,
}

impl<C: MessageSender> PlaybackNotifier<C> {
    pub fn new(client: C, logger_id: ChatId) -> Self {
        Self { client, logger_id }
    }

    pub fn from_config(client: C, config: &Config) -> Self {
        Self::new(client, config.logger_id.clone())
    }

    pub fn logger_id(&self) -> &ChatId {
        &self.logger_id
    }

    /// Whether an event from `chat_id` should be mirrored at all.
    fn should_log(&self, chat_id: &ChatId) -> bool {
        chat_id.is_set() && self.logger_id.is_set() && *chat_id != self.logger_id
    }

    /// Log that `song` started playing in `chat_id`.
    ///
    /// Does nothing when either chat is unset, when the song is missing, or
    /// when the event comes from the logging channel itself. Send failures are
    /// logged and swallowed.
    pub async fn send_logger(&self, chat_id: &ChatId, song: Option<&CachedTrack>) {
        let Some(song) = song else {
            return;
        };
        if !self.should_log(chat_id) {
            return;
        }

        let text = now_playing_text(chat_id, song);
        match self
            .client
            .send_text_message(&self.logger_id, &text, &SendOptions::silent_html())
            .await
        {
            Ok(message) => debug!(
                "Logged playback of '{}' from {} as message {}",
                song.name, chat_id, message.message_id
            ),
            Err(e) => error!("Error sending message: {}", e),
        }
    }
}
