//! Completion client: story request in, story text out

use log::{debug, error, info};

use crate::config::NovelistConfig;
use crate::credential::{Credential, OPENAI_API_KEY};
use crate::error::Error;
use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::providers::{
  select_backend, ChatCompletionBackend, ChatCompletionParams, ChatMessage
};
use crate::request::StoryRequest;

/// Response ceiling sent with every call.
/// Deliberately independent of the requested story length.
pub const MAX_RESPONSE_TOKENS: usize = 4096;

pub struct CompletionClient
{   backend: Box<dyn ChatCompletionBackend>
  , credential: Option<Credential>
}

impl CompletionClient
{   pub fn new(
      backend: Box<dyn ChatCompletionBackend>
    , credential: Option<Credential>
    ) -> Self
    {   debug!(
          "Creating CompletionClient (credential present: {})",
          credential.is_some()
        );
        CompletionClient
        {   backend
          , credential
        }
    }

    /// Use the client shape named by the configuration
    pub fn from_config(
      config: &NovelistConfig
    , credential: Option<Credential>
    ) -> Self
    {   info!("Using {:?} chat-completion client", config.client_shape);
        CompletionClient::new(select_backend(config), credential)
    }

    /// The messages and sampling parameters sent for a request
    pub fn params_for(request: &StoryRequest) -> ChatCompletionParams
    {   ChatCompletionParams
        {   model: request.model.label().to_string()
          , temperature: request.temperature
          , max_tokens: MAX_RESPONSE_TOKENS
          , messages: vec![
              ChatMessage::system(SYSTEM_PROMPT)
            , ChatMessage::user(build_prompt(request))
            ]
        }
    }

    /// Generate one story. Fails before any call when the key is
    /// missing or the request is invalid; never retries.
    pub async fn generate(&self, request: &StoryRequest)
      -> Result<String, Error>
    {   let credential = self.credential.as_ref()
          .ok_or_else(|| {
            error!("No API key; refusing to call the API");
            Error::MissingApiKey(OPENAI_API_KEY.to_string())
          })?;

        request.validate()?;

        let params = Self::params_for(request);
        debug!(
          "Generating ~{} words with {} at temperature {}",
          request.target_words, params.model, params.temperature
        );

        let text = self.backend
          .send_chat_completion(credential, &params)
          .await
          .map_err(|cause| {
            error!("Generation failed: {}", cause);
            Error::Generation(cause)
          })?;

        let story = text.trim().to_string();
        info!("Generated story of {} chars", story.chars().count());
        Ok(story)
    }
}
