use std::fmt;

/// Why a chat-completion call failed.
/// Kept structured so callers can match on the kind of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationCause
{   /// Transport failure before a response arrived
    Http(String)
  , /// API answered with a non-success status
    Api
    {   status: u16
      , body: String
    }
  , /// Response body could not be read as a completion
    Parse(String)
  , /// No choices in API response
    NoChoicesInResponse
  , /// First choice carried no message content
    MissingContent
}

impl fmt::Display for GenerationCause
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   GenerationCause::Http(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , GenerationCause::Api { status, body } => {
              write!(f, "status {}: {}", status, body)
            }
          , GenerationCause::Parse(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , GenerationCause::NoChoicesInResponse => {
              write!(f, "API response contained no choices")
            }
          , GenerationCause::MissingContent => {
              write!(f, "API response message had no content")
            }
        }
    }
}

impl std::error::Error for GenerationCause {}

/// Custom error type for novelist operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// API key is missing; names the secret that was looked up
    MissingApiKey(String)
  , /// The chat-completion call failed
    Generation(GenerationCause)
  , /// Story request failed validation
    InvalidRequest(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(name) => {
              write!(f, "Missing API key: {} is not set", name)
            }
          , Error::Generation(cause) => {
              write!(f, "OpenAI API error: {}", cause)
            }
          , Error::InvalidRequest(msg) => {
              write!(f, "Invalid request: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error
{   fn source(&self)
      -> Option<&(dyn std::error::Error + 'static)>
    {   match self
        {   Error::Generation(cause) => Some(cause)
          , _ => None
        }
    }
}

impl From<GenerationCause> for Error
{   fn from(cause: GenerationCause) -> Self
    {   Error::Generation(cause)
    }
}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
