use super::engine::{EngineError, SpeechEngine};
use crate::domain::tts::{AudioFormat, EngineKind, SynthesisPreferences};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// The hosted endpoint rejects requests longer than this many characters
const MAX_REQUEST_CHARS: usize = 100;

pub const DEFAULT_ONLINE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Hosted text-to-speech endpoint. Always produces MP3; voice gender is not
/// selectable.
pub struct OnlineEngine {
    client: Client,
    base_url: String,
}

impl OnlineEngine {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; voicequeue)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Split text into requests of at most [`MAX_REQUEST_CHARS`] characters,
    /// breaking on whitespace and slicing words that are longer on their own
    fn split_into_requests(text: &str) -> Vec<String> {
        let mut batches = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > MAX_REQUEST_CHARS {
                if !current.is_empty() {
                    batches.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let chars: Vec<char> = word.chars().collect();
                batches.extend(chars.chunks(MAX_REQUEST_CHARS).map(|c| c.iter().collect::<String>()));
                continue;
            }

            let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
            if needed > MAX_REQUEST_CHARS {
                batches.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        if !current.is_empty() {
            batches.push(current);
        }

        batches
    }

    async fn fetch(&self, text: &str, language: &str) -> Result<Vec<u8>, EngineError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", language),
                ("client", "tw-ob"),
            ])
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Network(format!("endpoint returned {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechEngine for OnlineEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Online
    }

    fn output_format(&self, _preferences: &SynthesisPreferences) -> AudioFormat {
        AudioFormat::Mp3
    }

    async fn synthesize(
        &self,
        text: &str,
        preferences: &SynthesisPreferences,
        output: &Path,
    ) -> Result<(), EngineError> {
        let batches = Self::split_into_requests(text);
        let mut merged_audio = Vec::new();

        // MP3 frames concatenate into a playable stream
        for (index, batch) in batches.iter().enumerate() {
            let audio = self.fetch(batch, &preferences.language_tag).await?;
            if audio.is_empty() {
                return Err(EngineError::Network(format!("empty audio for request {}", index)));
            }
            merged_audio.extend(audio);
        }

        tracing::debug!(
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "Online synthesis merged"
        );

        tokio::fs::write(output, &merged_audio).await?;
        Ok(())
    }
}
