pub mod error;
pub mod config;
pub mod request;
pub mod prompt;
pub mod credential;
pub mod providers;
pub mod completion;
pub mod client;

pub use client::NovelistBackend;
pub use completion::{CompletionClient, MAX_RESPONSE_TOKENS};
pub use config::{ClientShape, NovelistConfig};
pub use credential::{resolve_api_key, Credential};
pub use error::{Error, GenerationCause};
pub use request::{ChatModel, Genre, Language, StoryRequest};

/*

novelist writes a short story from two character names, a genre and a
premise by asking a hosted chat-completion model.

novelist/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and backend command types
│   ├── error.rs        # Error and GenerationCause
│   ├── config.rs       # NovelistConfig and ClientShape
│   ├── request.rs      # StoryRequest and its enumerations
│   ├── prompt.rs       # Prompt builder
│   ├── credential.rs   # OPENAI_API_KEY lookup
│   ├── providers/      # One trait, two client shapes
│   │   ├── mod.rs
│   │   ├── openai.rs   # Typed request/response
│   │   └── legacy.rs   # Untyped JSON request/response
│   ├── completion.rs   # CompletionClient
│   ├── client.rs       # NovelistBackend task
│   └── main.rs         # Command-line form
└── tests/

*/

/// NOVELIST BACKEND INTERFACE:

// ===== GenerateNovel =====

pub type GenerateNovelReply = Result<String, crate::error::Error>;
pub type GenerateNovelReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerateNovelReply>;

pub struct GenerateNovelArgs
{   pub request: crate::request::StoryRequest
  , pub reply: GenerateNovelReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== NovelistHand (sender side) =====

pub struct NovelistHand
{   pub generate_novel_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateNovelArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== NovelistFoot (receiver side) =====

pub struct NovelistFoot
{   pub generate_novel_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateNovelArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}
