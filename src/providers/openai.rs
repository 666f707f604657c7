use async_trait::async_trait;
use log::{debug, error, trace};
use serde::{Deserialize, Serialize};

use super::{ChatCompletionBackend, ChatCompletionParams, ChatMessage};
use crate::credential::Credential;
use crate::error::GenerationCause;

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a>
{   pub model: &'a str
  , pub temperature: f64
  , pub max_tokens: usize
  , pub messages: &'a [ChatMessage]
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse
{   pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ResponseMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub role: Option<String>
  , #[serde(default)]
    pub content: Option<String>
}

// ===== Modern Client =====

/// Object-style client: typed request in, typed response out
pub struct OpenAiChatClient
{   api_base: String
  , http_client: reqwest::Client
}

impl OpenAiChatClient
{   pub fn new(api_base: impl Into<String>) -> Self
    {   debug!("Creating OpenAiChatClient");
        OpenAiChatClient
        {   api_base: api_base.into()
          , http_client: reqwest::Client::new()
        }
    }
}

#[async_trait]
impl ChatCompletionBackend for OpenAiChatClient
{   async fn send_chat_completion(
      &self
    , credential: &Credential
    , params: &ChatCompletionParams
    ) -> Result<String, GenerationCause>
    {   debug!("Sending chat completion for: {}", params.model);

        let request = ChatCompletionRequest
        {   model: &params.model
          , temperature: params.temperature
          , max_tokens: params.max_tokens
          , messages: &params.messages
        };
        trace!("OpenAI request: {:?}", request);

        let response = super::post_chat_completion(
          &self.http_client,
          &self.api_base,
          credential,
          &request
        ).await?;

        let chat_response: ChatCompletionResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            GenerationCause::Parse(e.to_string())
          })?;

        let choice = chat_response.choices.into_iter().next()
          .ok_or_else(|| {
            error!("No choices in response");
            GenerationCause::NoChoicesInResponse
          })?;
        trace!("Finish reason: {:?}", choice.finish_reason);

        choice.message.content.ok_or_else(|| {
          error!("Choice has no content");
          GenerationCause::MissingContent
        })
    }
}
