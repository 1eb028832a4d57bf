use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::application::ports::{FragmentStream, InferenceEngine, InferenceError};
use crate::domain::Message;
use crate::presentation::config::InferenceSettings;

/// Client for the Ollama HTTP API (`/api/chat`, `/api/tags`).
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OllamaChatChunk {
    #[serde(default)]
    message: Option<OllamaChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct OllamaChunkMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct OllamaErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

enum ChatLine {
    Fragment(String),
    Done(String),
    Blank,
}

impl OllamaClient {
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| InferenceError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn error_from_response(response: Response) -> InferenceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<OllamaErrorBody>(&body) {
            Ok(parsed) => InferenceError::Engine(parsed.error),
            Err(_) => InferenceError::RequestFailed(format!("HTTP {}: {}", status, body)),
        }
    }
}

fn parse_chat_line(line: &[u8]) -> Result<ChatLine, InferenceError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(ChatLine::Blank);
    }

    let chunk: OllamaChatChunk = serde_json::from_slice(line)
        .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

    if let Some(error) = chunk.error {
        return Err(InferenceError::Engine(error));
    }

    let content = chunk.message.map(|m| m.content).unwrap_or_default();
    if chunk.done {
        Ok(ChatLine::Done(content))
    } else {
        Ok(ChatLine::Fragment(content))
    }
}

#[async_trait]
impl InferenceEngine for OllamaClient {
    #[tracing::instrument(skip(self, messages), fields(message_count = messages.len()))]
    async fn chat_stream(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<FragmentStream, InferenceError> {
        let request_body = OllamaChatRequest {
            model,
            messages: messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: true,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| InferenceError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let mut bytes = Box::pin(response.bytes_stream());

        // NDJSON records may be split across HTTP chunks, so lines are reassembled here.
        let fragments = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();

            loop {
                while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=newline).collect();
                    match parse_chat_line(&line) {
                        Ok(ChatLine::Fragment(content)) => {
                            yield Ok(content);
                        }
                        Ok(ChatLine::Done(content)) => {
                            if !content.is_empty() {
                                yield Ok(content);
                            }
                            return;
                        }
                        Ok(ChatLine::Blank) => {}
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        yield Err(InferenceError::RequestFailed(e.to_string()));
                        return;
                    }
                    None => break,
                }
            }

            match parse_chat_line(&buffer) {
                Ok(ChatLine::Done(content)) => {
                    if !content.is_empty() {
                        yield Ok(content);
                    }
                }
                Ok(ChatLine::Fragment(_)) | Ok(ChatLine::Blank) => {
                    yield Err(InferenceError::InvalidResponse(
                        "stream ended before the final record".to_string(),
                    ));
                }
                Err(e) => {
                    yield Err(e);
                }
            }
        };

        Ok(Box::pin(fragments))
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| InferenceError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

pub fn create_ollama_client(settings: &InferenceSettings) -> Result<OllamaClient, InferenceError> {
    OllamaClient::new(
        &settings.base_url,
        Duration::from_secs(settings.connect_timeout_seconds),
    )
}
