//! Summary and Q&A generation from a transcript.

use crate::config::{Prompts, SummarySettings};
use crate::error::{RecapError, Result};
use crate::openai::{check_api_key, create_client_with_timeout};
use crate::page::VideoMetadata;
use crate::transcript::Transcript;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Sends transcripts to a chat completion model.
pub struct Summarizer {
    client: Client<OpenAIConfig>,
    settings: SummarySettings,
    prompts: Prompts,
}

impl Summarizer {
    /// Create a summarizer for the default OpenAI endpoint.
    ///
    /// Fails before any request when `OPENAI_API_KEY` is missing.
    pub fn new(settings: SummarySettings, prompts: Prompts) -> Result<Self> {
        check_api_key()?;
        let client = create_client_with_timeout(settings.timeout())?;
        Ok(Self::with_client(client, settings, prompts))
    }

    /// Create a summarizer around an existing client.
    pub fn with_client(
        client: Client<OpenAIConfig>,
        settings: SummarySettings,
        prompts: Prompts,
    ) -> Self {
        Self {
            client,
            settings,
            prompts,
        }
    }

    /// Write a structured summary of the video.
    #[instrument(skip_all, fields(title = %metadata.title))]
    pub async fn summarize(&self, metadata: &VideoMetadata, transcript: &Transcript) -> Result<String> {
        let prompt = self.build_prompt(&self.prompts.summary.user, metadata, transcript);
        self.complete(
            prompt,
            self.settings.summary_max_tokens,
            self.settings.summary_temperature,
        )
        .await
    }

    /// Extract the questions the video asks and answers.
    #[instrument(skip_all, fields(title = %metadata.title))]
    pub async fn extract_qa(&self, metadata: &VideoMetadata, transcript: &Transcript) -> Result<String> {
        let prompt = self.build_prompt(&self.prompts.qa.user, metadata, transcript);
        self.complete(prompt, self.settings.qa_max_tokens, self.settings.qa_temperature)
            .await
    }

    fn build_prompt(&self, template: &str, metadata: &VideoMetadata, transcript: &Transcript) -> String {
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), metadata.title.clone());
        vars.insert(
            "channel".to_string(),
            metadata.channel.clone().unwrap_or_else(|| "Unknown channel".to_string()),
        );
        vars.insert("url".to_string(), metadata.url.clone());
        vars.insert("transcript".to_string(), transcript.as_str().to_string());
        self.prompts.render_with_custom(template, &vars)
    }

    async fn complete(&self, prompt: String, max_tokens: u32, temperature: f32) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| RecapError::Summary(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(messages)
            .max_completion_tokens(max_tokens)
            .temperature(temperature)
            .build()
            .map_err(|e| RecapError::Summary(e.to_string()))?;

        info!("Requesting completion from {}", self.settings.model);
        let response = tokio::time::timeout(self.settings.timeout(), self.client.chat().create(request))
            .await
            .map_err(|_| RecapError::Timeout(self.settings.timeout_secs))?
            .map_err(|e| RecapError::OpenAI(format!("Failed to generate response: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| RecapError::Summary("Empty response from model".to_string()))?;

        debug!("Received {} characters", content.len());
        Ok(content)
    }
}

/// Rough token count of `text`: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Short display form of a token count, such as `~850` or `~1.2k`.
pub fn format_token_count(tokens: usize) -> String {
    if tokens >= 1000 {
        format!("~{:.1}k", tokens as f64 / 1000.0)
    } else {
        format!("~{}", tokens)
    }
}
