//! Chat-completion backends

pub mod openai;
pub mod legacy;

use async_trait::async_trait;
use log::{error, trace};
use serde::{Deserialize, Serialize};

use crate::config::{ClientShape, NovelistConfig};
use crate::credential::Credential;
use crate::error::GenerationCause;

pub use legacy::LegacyChatCompletion;
pub use openai::OpenAiChatClient;

// ===== Message Types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "system".to_string()
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.into()
        }
    }
}

/// Everything one chat-completion call needs besides the key
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionParams
{   pub model: String
  , pub temperature: f64
  , pub max_tokens: usize
  , pub messages: Vec<ChatMessage>
}

/// Send chat completion; the one operation every client shape offers.
/// Returns the raw content of the first choice.
#[async_trait]
pub trait ChatCompletionBackend: Send + Sync
{   async fn send_chat_completion(
      &self
    , credential: &Credential
    , params: &ChatCompletionParams
    ) -> Result<String, GenerationCause>;
}

/// Build the backend for the configured client shape
pub fn select_backend(config: &NovelistConfig)
  -> Box<dyn ChatCompletionBackend>
{   match config.client_shape
    {   ClientShape::Modern => Box::new(
          OpenAiChatClient::new(config.api_base.clone())
        )
      , ClientShape::Legacy => Box::new(
          LegacyChatCompletion::new(config.api_base.clone())
        )
    }
}

/// POST a chat-completion body and hand back a successful response
pub(crate) async fn post_chat_completion<B>(
  http_client: &reqwest::Client
, api_base: &str
, credential: &Credential
, body: &B
) -> Result<reqwest::Response, GenerationCause>
where
  B: Serialize + ?Sized + Sync
{   let response = http_client
      .post(format!("{}/chat/completions", api_base))
      .header("Authorization", format!("Bearer {}", credential.expose()))
      .header("Content-Type", "application/json")
      .json(body)
      .send()
      .await
      .map_err(|e| {
        error!("HTTP error: {}", e);
        GenerationCause::Http(e.to_string())
      })?;

    let status = response.status();
    trace!("Chat completion response status: {}", status);

    if !status.is_success()
    {   let error_text = response.text().await
          .unwrap_or_else(|_|
            "Unknown error".to_string()
          );
        error!("OpenAI API error: {}", error_text);
        return Err(GenerationCause::Api
        {   status: status.as_u16()
          , body: error_text
        });
    }

    Ok(response)
}
