//! API key lookup: secrets store first, then the process environment

use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Name of the secret holding the OpenAI key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// API key for the chat-completion service.
/// Debug output never shows the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential
{   pub fn new(key: impl Into<String>) -> Self
    {   Credential(key.into())
    }

    pub fn expose(&self) -> &str
    {   &self.0
    }
}

impl fmt::Debug for Credential
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str("Credential(***)")
    }
}

/// Anything that can answer "what is the value of this secret?"
pub trait SecretSource
{   fn lookup(&self, name: &str) -> Option<String>;
}

impl SecretSource for HashMap<String, String>
{   fn lookup(&self, name: &str) -> Option<String>
    {   self.get(name).cloned()
    }
}

/// Process environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SecretSource for ProcessEnv
{   fn lookup(&self, name: &str) -> Option<String>
    {   std::env::var(name).ok()
    }
}

/// Secrets store backed by a JSON object file of string values
#[derive(Debug, Clone, Default)]
pub struct SecretsFile
{   values: HashMap<String, String>
}

impl SecretsFile
{   /// Load a secrets file. A missing file is an empty store.
    pub fn load(path: &Path)
      -> Result<Self, crate::error::Error>
    {   if !path.exists()
        {   debug!("No secrets file at {}", path.display());
            return Ok(SecretsFile::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
          warn!("Cannot read secrets file {}: {}", path.display(), e);
          crate::error::Error::InvalidConfiguration(format!(
            "cannot read secrets file {}: {}", path.display(), e
          ))
        })?;

        let values: HashMap<String, String>
          = serde_json::from_str(&text).map_err(|e| {
            warn!("Malformed secrets file {}: {}", path.display(), e);
            crate::error::Error::InvalidConfiguration(format!(
              "malformed secrets file {}: {}", path.display(), e
            ))
          })?;

        debug!(
          "Loaded {} secrets from {}",
          values.len(), path.display()
        );
        Ok(SecretsFile { values })
    }
}

impl SecretSource for SecretsFile
{   fn lookup(&self, name: &str) -> Option<String>
    {   self.values.lookup(name)
    }
}

/// Resolve the OpenAI key, preferring the secrets store.
/// Blank values count as unset.
pub fn resolve_api_key(
  secrets: &dyn SecretSource
, env: &dyn SecretSource
) -> Option<Credential>
{   let non_blank = |v: String| {
      if v.trim().is_empty() { None } else { Some(v) }
    };

    if let Some(key) = secrets.lookup(OPENAI_API_KEY).and_then(non_blank)
    {   debug!("Using {} from secrets store", OPENAI_API_KEY);
        return Some(Credential::new(key));
    }

    if let Some(key) = env.lookup(OPENAI_API_KEY).and_then(non_blank)
    {   debug!("Using {} from environment", OPENAI_API_KEY);
        return Some(Credential::new(key));
    }

    warn!("{} not found in secrets store or environment", OPENAI_API_KEY);
    None
}

#[cfg(test)]
mod tests
{   use super::*;
    use std::io::Write;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String>
    {   pairs.iter()
          .map(|(k, v)| (k.to_string(), v.to_string()))
          .collect()
    }

    #[test]
    fn secrets_store_wins_over_environment()
    {   let secrets = source(&[(OPENAI_API_KEY, "from-store")]);
        let env = source(&[(OPENAI_API_KEY, "from-env")]);
        let key = resolve_api_key(&secrets, &env);
        assert_eq!(key, Some(Credential::new("from-store")));
    }

    #[test]
    fn environment_is_the_fallback()
    {   let secrets = source(&[("OTHER", "x")]);
        let env = source(&[(OPENAI_API_KEY, "from-env")]);
        assert_eq!(
          resolve_api_key(&secrets, &env),
          Some(Credential::new("from-env"))
        );
    }

    #[test]
    fn absent_everywhere_is_none()
    {   assert_eq!(resolve_api_key(&source(&[]), &source(&[])), None);
    }

    #[test]
    fn blank_store_value_falls_through()
    {   let secrets = source(&[(OPENAI_API_KEY, "  ")]);
        let env = source(&[(OPENAI_API_KEY, "from-env")]);
        assert_eq!(
          resolve_api_key(&secrets, &env),
          Some(Credential::new("from-env"))
        );
        assert_eq!(resolve_api_key(&secrets, &source(&[])), None);
    }

    #[test]
    fn debug_hides_the_key()
    {   let shown = format!("{:?}", Credential::new("sk-secret"));
        assert!(!shown.contains("sk-secret"));
    }

    #[test]
    fn secrets_file_loads_json_object()
    {   let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"OPENAI_API_KEY": "sk-file"}}"#).unwrap();

        let store = SecretsFile::load(file.path()).unwrap();
        assert_eq!(store.lookup(OPENAI_API_KEY), Some("sk-file".to_string()));
    }

    #[test]
    fn missing_secrets_file_is_empty()
    {   let dir = tempfile::tempdir().unwrap();
        let store = SecretsFile::load(&dir.path().join("secrets.json"))
          .unwrap();
        assert_eq!(store.lookup(OPENAI_API_KEY), None);
    }

    #[test]
    fn malformed_secrets_file_is_a_configuration_error()
    {   let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "OPENAI_API_KEY = 'toml'").unwrap();

        assert!(matches!(
          SecretsFile::load(file.path()),
          Err(crate::error::Error::InvalidConfiguration(_))
        ));
    }
}
