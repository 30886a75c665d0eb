//! Introduction text for approved channels.
//!
//! An OpenAI-compatible chat completion endpoint writes a short, friendly
//! introduction when an API key is configured. Without a key, or when the
//! call fails, a deterministic sentence built from the channel's name and
//! description is used instead. The outcome is reported as an
//! [`Introduction`] so callers can tell the two apart.
//!
//! # Architecture
//!
//! - [`AskAsync`]: prompt in, text out
//! - [`ChatCompletions`]: the HTTP implementation
//! - [`IntroWriter`]: builds the prompt and applies the fallback

use crate::config::OpenAiConfig;
use crate::fetcher::Fetcher;
use crate::models::{Channel, RecentVideo};
use crate::utils::{format_subscriber_count, take_chars, truncate_for_log};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Trait for async text generation.
pub trait AskAsync {
    /// Send a prompt and receive the generated text.
    async fn ask(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

/// Chat completion client for an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct ChatCompletions {
    fetcher: Fetcher,
    config: OpenAiConfig,
    api_key: String,
}

impl ChatCompletions {
    pub fn new(fetcher: Fetcher, config: OpenAiConfig, api_key: String) -> Self {
        Self {
            fetcher,
            config,
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

impl AskAsync for ChatCompletions {
    #[instrument(level = "info", skip_all)]
    async fn ask(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        let response: ChatResponse = self
            .fetcher
            .post_json(&self.config.endpoint, &self.api_key, &request)
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or("completion contained no text")?;

        info!(elapsed_ms = t0.elapsed().as_millis(), chars = text.chars().count(), "Generated text");
        Ok(text)
    }
}

/// How an introduction was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Introduction {
    Generated(String),
    Fallback { text: String, reason: String },
}

impl Introduction {
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) | Self::Fallback { text, .. } => text,
        }
    }
}

/// Writes introductions, using the model when one is available.
#[derive(Debug)]
pub struct IntroWriter<A> {
    model: Option<A>,
}

impl<A: AskAsync> IntroWriter<A> {
    pub fn new(model: Option<A>) -> Self {
        Self { model }
    }

    /// Introduction for `channel` based on its profile and recent uploads.
    #[instrument(level = "info", skip_all, fields(channel_id = %channel.channel_id))]
    pub async fn write(&self, channel: &Channel, videos: &[RecentVideo]) -> Introduction {
        let Some(model) = &self.model else {
            return Introduction::Fallback {
                text: fallback_introduction(channel),
                reason: "no API key configured".to_string(),
            };
        };

        match model.ask(&build_prompt(channel, videos)).await {
            Ok(text) => Introduction::Generated(text),
            Err(e) => {
                warn!(error = %e, "Text generation failed; using fallback introduction");
                Introduction::Fallback {
                    text: fallback_introduction(channel),
                    reason: truncate_for_log(&e.to_string(), 200),
                }
            }
        }
    }
}

/// Prompt sent to the model.
pub fn build_prompt(channel: &Channel, videos: &[RecentVideo]) -> String {
    let video_titles = videos
        .iter()
        .take(5)
        .map(|v| format!("- {}", v.title))
        .collect::<Vec<_>>()
        .join("\n");
    let description = if channel.description.is_empty() {
        "なし".to_string()
    } else {
        take_chars(&channel.description, 200)
    };

    format!(
        "以下のVTuberチャンネル情報をもとに、応援する気持ちを込めた紹介文を3行で書いてください。\n\
         フレンドリーで明るいトーンで、視聴者が「見てみたい」と思うような紹介にしてください。\n\
         \n\
         チャンネル名: {}\n\
         チャンネル説明: {}\n\
         最近の動画:\n\
         {}\n\
         登録者数: {}\n\
         \n\
         ルール:\n\
         - 3行以内\n\
         - 絵文字は1〜2個まで\n\
         - 「応援しています」的な前向きな締め\n\
         - マークダウンは使わない",
        channel.title,
        description,
        video_titles,
        format_subscriber_count(channel.subscriber_count),
    )
}

/// Deterministic introduction from the channel's name and the first line of
/// its description.
pub fn fallback_introduction(channel: &Channel) -> String {
    let title = if channel.title.is_empty() {
        "名前不明"
    } else {
        channel.title.as_str()
    };
    let description = take_chars(&channel.description, 100);
    let first_line = description.lines().next().unwrap_or("").trim();

    if first_line.is_empty() {
        format!("{title}さんがVTuberとしてデビュー！ ぜひチャンネルをチェックしてみてください。")
    } else {
        format!("{title}さんがVTuberとしてデビュー！ {first_line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Canned(Result<&'static str, &'static str>);

    impl AskAsync for Canned {
        async fn ask(&self, _prompt: &str) -> Result<String, Box<dyn Error>> {
            self.0.map(str::to_string).map_err(|e| e.into())
        }
    }

    fn channel(description: &str) -> Channel {
        Channel {
            channel_id: "UC1".to_string(),
            title: "星野みらい".to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_uses_first_description_line() {
        let c = channel("歌とゲームが大好き！\n毎週金曜に配信しています");
        assert_eq!(
            fallback_introduction(&c),
            "星野みらいさんがVTuberとしてデビュー！ 歌とゲームが大好き！"
        );
    }

    #[test]
    fn test_fallback_without_description() {
        assert_eq!(
            fallback_introduction(&channel("")),
            "星野みらいさんがVTuberとしてデビュー！ ぜひチャンネルをチェックしてみてください。"
        );
    }

    #[test]
    fn test_prompt_mentions_channel_and_videos() {
        let videos = vec![RecentVideo {
            video_id: "v1".to_string(),
            title: "初配信".to_string(),
            ..Default::default()
        }];
        let prompt = build_prompt(&channel("説明"), &videos);
        assert!(prompt.contains("チャンネル名: 星野みらい"));
        assert!(prompt.contains("- 初配信"));
        assert!(prompt.contains("登録者数: 0人"));
    }

    #[tokio::test]
    async fn test_writer_without_model_falls_back() {
        let writer: IntroWriter<Canned> = IntroWriter::new(None);
        let intro = writer.write(&channel("よろしく"), &[]).await;
        assert!(matches!(intro, Introduction::Fallback { .. }));
        assert_eq!(intro.text(), "星野みらいさんがVTuberとしてデビュー！ よろしく");
    }

    #[tokio::test]
    async fn test_writer_failure_falls_back_with_reason() {
        let writer = IntroWriter::new(Some(Canned(Err("rate limited"))));
        match writer.write(&channel("よろしく"), &[]).await {
            Introduction::Fallback { reason, .. } => assert!(reason.contains("rate limited")),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_writer_uses_generated_text() {
        let writer = IntroWriter::new(Some(Canned(Ok("元気いっぱいの新人さんです✨"))));
        let intro = writer.write(&channel(""), &[]).await;
        assert_eq!(intro, Introduction::Generated("元気いっぱいの新人さんです✨".to_string()));
    }

    #[tokio::test]
    async fn test_chat_completions_parses_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"choices": [{"message": {"role": "assistant", "content": "  こんにちは！  "}}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&FetchConfig {
            base_delay_ms: 0,
            ..FetchConfig::default()
        })
        .unwrap();
        let config = OpenAiConfig {
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            ..OpenAiConfig::default()
        };
        let client = ChatCompletions::new(fetcher, config, "sk-test".to_string());
        assert_eq!(client.ask("hi").await.unwrap(), "こんにちは！");
    }
}
