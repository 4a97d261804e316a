//! HTTP client for the Telegram Bot API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{ChatId, Message, MessageSender, ParseMode, SendOptions, TelegramError, TelegramResult};
use crate::config::Config;

/// Default public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct LinkPreviewOptions {
    is_disabled: bool,
}

/// Body of a `sendMessage` call.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
    parse_mode: ParseMode,
    link_preview_options: LinkPreviewOptions,
    disable_notification: bool,
}

/// Envelope every Bot API response is wrapped in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

/// Talks to the Bot API with a single bot token.
#[derive(Debug, Clone)]
pub struct BotClient {
    http: Client,
    base_url: String,
    token: String,
}

impl BotClient {
    /// Creates a client against `base_url` (no trailing `/bot<token>`).
    pub fn new(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> TelegramResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &Config) -> TelegramResult<Self> {
        Self::new(
            config.bot_token.clone(),
            config.api_url.as_str(),
            config.request_timeout,
        )
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> TelegramResult<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        debug!("Calling Bot API method {}", method);
        let response = self.http.post(self.method_url(method)).json(body).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        // Telegram reports failures as a JSON envelope, usually with a 4xx status.
        let envelope = match serde_json::from_slice::<ApiResponse<T>>(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    code: i64::from(status.as_u16()),
                    description: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(TelegramError::Api {
                code: error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

#[async_trait]
impl MessageSender for BotClient {
    async fn send_text_message(
        &self,
        chat_id: &ChatId,
        text: &str,
        options: &SendOptions,
    ) -> TelegramResult<Message> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: options.parse_mode,
            link_preview_options: LinkPreviewOptions {
                is_disabled: options.disable_web_page_preview,
            },
            disable_notification: options.disable_notification,
        };

        self.call("sendMessage", &request).await
    }
}
