use async_trait::async_trait;
use log::{debug, error, trace};
use serde_json::{json, Value};

use super::{ChatCompletionBackend, ChatCompletionParams};
use crate::credential::Credential;
use crate::error::GenerationCause;

/// Module-call style client: the body is an ad hoc JSON document and
/// the reply is read by indexing into an untyped value.
pub struct LegacyChatCompletion
{   api_base: String
  , http_client: reqwest::Client
}

impl LegacyChatCompletion
{   pub fn new(api_base: impl Into<String>) -> Self
    {   debug!("Creating LegacyChatCompletion");
        LegacyChatCompletion
        {   api_base: api_base.into()
          , http_client: reqwest::Client::new()
        }
    }
}

/// Pull `choices[0].message.content` out of a reply document
pub fn extract_content(reply: &Value)
  -> Result<String, GenerationCause>
{   let choices = reply["choices"].as_array()
      .ok_or_else(|| GenerationCause::Parse(
        "reply has no choices array".to_string()
      ))?;

    let first = choices.first()
      .ok_or(GenerationCause::NoChoicesInResponse)?;

    match &first["message"]["content"]
    {   Value::String(text) => Ok(text.clone())
      , Value::Null => Err(GenerationCause::MissingContent)
      , other => Err(GenerationCause::Parse(format!(
          "message content is not a string: {}", other
        )))
    }
}

#[async_trait]
impl ChatCompletionBackend for LegacyChatCompletion
{   async fn send_chat_completion(
      &self
    , credential: &Credential
    , params: &ChatCompletionParams
    ) -> Result<String, GenerationCause>
    {   debug!("Sending legacy chat completion for: {}", params.model);

        let body = json!({
          "model": params.model,
          "temperature": params.temperature,
          "max_tokens": params.max_tokens,
          "messages": params.messages,
        });
        trace!("Legacy request: {}", body);

        let response = super::post_chat_completion(
          &self.http_client,
          &self.api_base,
          credential,
          &body
        ).await?;

        let reply: Value = response.json().await.map_err(|e| {
          error!("Parse error: {}", e);
          GenerationCause::Parse(e.to_string())
        })?;

        extract_content(&reply).map_err(|cause| {
          error!("Unusable legacy reply: {}", cause);
          cause
        })
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn reads_first_choice_content()
    {   let reply = json!({
          "choices": [
            { "message": { "role": "assistant", "content": " story " } },
            { "message": { "role": "assistant", "content": "second" } }
          ]
        });
        assert_eq!(extract_content(&reply), Ok(" story ".to_string()));
    }

    #[test]
    fn distinguishes_missing_pieces()
    {   assert_eq!(
          extract_content(&json!({ "choices": [] })),
          Err(GenerationCause::NoChoicesInResponse)
        );
        assert_eq!(
          extract_content(&json!({
            "choices": [{ "message": { "content": null } }]
          })),
          Err(GenerationCause::MissingContent)
        );
        assert!(matches!(
          extract_content(&json!({ "error": "nope" })),
          Err(GenerationCause::Parse(_))
        ));
        assert!(matches!(
          extract_content(&json!({
            "choices": [{ "message": { "content": 42 } }]
          })),
          Err(GenerationCause::Parse(_))
        ));
    }
}
