//! Mock implementations for external dependencies

use async_trait::async_trait;
use mockall::mock;
use tgmusic::telegram::{Chat, ChatId, Message, MessageSender, SendOptions, TelegramResult};

mock! {
    /// Mock messaging client for notifier tests
    pub Sender {}

    #[async_trait]
    impl MessageSender for Sender {
        async fn send_text_message(
            &self,
            chat_id: &ChatId,
            text: &str,
            options: &SendOptions,
        ) -> TelegramResult<Message>;
    }
}

/// A successful send acknowledgement for `chat_id`
pub fn sent_message(chat_id: i64) -> Message {
    Message {
        message_id: 1,
        chat: Chat { id: chat_id },
        text: None,
    }
}
