//! HTTP client for embedding and chat-completion collaborators.
//!
//! Two providers: OpenAI-compatible APIs and a local Ollama server. All calls
//! are synchronous; timeouts and retries belong to the caller's environment,
//! not here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Maximum characters to send per text to the embedding API. Keeps dense
/// content safely under typical embedding context windows.
const MAX_EMBED_CHARS: usize = 3_000;

const EMBED_BATCH_SIZE: usize = 64;

pub struct LlmClient {
    http: reqwest::blocking::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        LlmClient { http: reqwest::blocking::Client::new(), config }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Embed a batch of texts, preserving input order.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let truncated: Vec<String> =
            texts.iter().map(|t| truncate_for_embedding(t).to_string()).collect();

        match self.config.provider.as_str() {
            "openai" => self.embed_openai(&truncated),
            "ollama" => self.embed_ollama(&truncated),
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        }
    }

    pub fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let vectors = self.embed_batch(&[query.to_string()])?;
        vectors.into_iter().next().context("No embedding returned")
    }

    /// One-shot chat completion for explanation and summarization prompts.
    pub fn complete(&self, prompt: &str) -> Result<String> {
        match self.config.provider.as_str() {
            "openai" => self.complete_openai(prompt),
            "ollama" => self.complete_ollama(prompt),
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        }
    }

    fn embed_openai(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/v1/embeddings", self.config.base_url);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH_SIZE) {
            let request = OpenAiEmbedRequest {
                model: self.config.embedding_model.clone(),
                input: batch.to_vec(),
            };
            let response = self
                .http
                .post(&url)
                .bearer_auth(api_key)
                .json(&request)
                .send()
                .context("Failed to call OpenAI embeddings API")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().unwrap_or_default();
                anyhow::bail!("OpenAI embeddings API returned {status}: {body}");
            }

            let body: OpenAiEmbedResponse =
                response.json().context("Failed to parse OpenAI embeddings response")?;
            all.extend(body.data.into_iter().map(|d| d.embedding));
        }
        Ok(all)
    }

    fn embed_ollama(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.config.base_url);

        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH_SIZE) {
            let request = OllamaEmbedRequest {
                model: self.config.embedding_model.clone(),
                input: batch.to_vec(),
                truncate: true,
            };
            let response = self
                .http
                .post(&url)
                .json(&request)
                .send()
                .context("Failed to call Ollama embed API")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().unwrap_or_default();
                anyhow::bail!("Ollama embed API returned {status}: {body}");
            }

            let body: OllamaEmbedResponse =
                response.json().context("Failed to parse Ollama embed response")?;
            all.extend(body.embeddings);
        }
        Ok(all)
    }

    fn complete_openai(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let request = OpenAiChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
        };
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .context("Failed to call OpenAI chat API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            anyhow::bail!("OpenAI chat API returned {status}: {body}");
        }

        let body: OpenAiChatResponse =
            response.json().context("Failed to parse OpenAI chat response")?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("OpenAI chat response contained no choices")
    }

    fn complete_ollama(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.config.base_url);

        let request = OllamaChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
            stream: false,
        };
        let response =
            self.http.post(&url).json(&request).send().context("Failed to call Ollama chat API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            anyhow::bail!("Ollama chat API returned {status}: {body}");
        }

        let body: OllamaChatResponse =
            response.json().context("Failed to parse Ollama chat response")?;
        Ok(body.message.content)
    }
}

/// Truncate on a UTF-8 char boundary at or before the embed limit.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[derive(Serialize)]
struct OpenAiEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChatChoice>,
}

#[derive(Deserialize)]
struct OpenAiChatChoice {
    message: ChatMessage,
}

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}
