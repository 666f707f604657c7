//! Configuration for the novelist client

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_SECRETS_PATH: &str = "secrets.json";

pub const API_BASE_VAR: &str = "NOVELIST_API_BASE";
pub const CLIENT_SHAPE_VAR: &str = "NOVELIST_CLIENT_SHAPE";
pub const SECRETS_PATH_VAR: &str = "NOVELIST_SECRETS_PATH";

/// Which chat-completion client shape to talk through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientShape
{   /// Typed request and response structs
    Modern
  , /// Loose JSON documents indexed by key
    Legacy
}

impl Default for ClientShape
{   fn default() -> Self
    {   if cfg!(feature = "legacy-shape")
        {   ClientShape::Legacy
        } else
        {   ClientShape::Modern
        }
    }
}

impl FromStr for ClientShape
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_ascii_lowercase().as_str()
        {   "modern" | "new" => Ok(ClientShape::Modern)
          , "legacy" => Ok(ClientShape::Legacy)
          , other => Err(crate::error::Error::InvalidConfiguration(
              format!("unknown client shape: {}", other)
            ))
        }
    }
}

/// Novelist configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovelistConfig
{   /// API base URL, without the trailing /chat/completions
    pub api_base: String
  , /// Client shape used for the life of the process
    pub client_shape: ClientShape
  , /// JSON secrets file consulted before the environment
    pub secrets_path: PathBuf
}

impl Default for NovelistConfig
{   fn default() -> Self
    {   NovelistConfig
        {   api_base: DEFAULT_API_BASE.to_string()
          , client_shape: ClientShape::default()
          , secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH)
        }
    }
}

impl NovelistConfig
{   /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F)
      -> Result<Self, crate::error::Error>
    where
      F: Fn(&str) -> Option<String>
    {   let mut config = NovelistConfig::default();

        if let Some(base) = lookup(API_BASE_VAR)
        {   config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(shape) = lookup(CLIENT_SHAPE_VAR)
        {   config.client_shape = shape.parse()?;
        }
        if let Some(path) = lookup(SECRETS_PATH_VAR)
        {   config.secrets_path = PathBuf::from(path);
        }

        Ok(config)
    }
}
