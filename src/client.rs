use tokio::sync::mpsc;
use log::{debug, error, info};
use crate::NovelistFoot;

/// Public API for the novelist backend - owns the task
pub struct NovelistBackend
{   hand: crate::NovelistHand
  , _task_handle: tokio::task::JoinHandle<()>
}

impl NovelistBackend
{   /// Create and spawn a new backend around a completion client
    /// Returns immediately - spawns background task
    pub fn new(
      completion: crate::completion::CompletionClient
    ) -> Self
    {   debug!("Creating NovelistBackend with task ownership");

        let (generate_novel_tx, generate_novel_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::NovelistHand
        {   generate_novel_tx
          , kill_process_tx
        };

        let foot = crate::NovelistFoot
        {   generate_novel_rx
          , kill_process_rx
        };

        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, completion).await
        });

        NovelistBackend
        {   hand
          , _task_handle
        }
    }

    /// Queue a story request - returns almost immediately
    pub async fn generate_novel(
      &self
    , request: crate::request::StoryRequest
    ) -> Result<
        mpsc::UnboundedReceiver<crate::GenerateNovelReply>,
        crate::error::Error
      >
    {   debug!(
          "generate_novel queuing command for {} / {}",
          request.protagonist1, request.protagonist2
        );
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GenerateNovelArgs
        {   request
          , reply: reply_tx
        };

        self.hand.generate_novel_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Gracefully shutdown the backend
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down NovelistBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::Other(
              "Backend already shutdown".to_string()
            )
          })?;

        // Wait for shutdown confirmation
        if let Some(result) = reply_rx.recv().await
        {   debug!("Backend shutdown confirmed");
            result
        } else
        {   error!("Backend shutdown timeout");
            Err(crate::error::Error::Timeout)
        }
    }
}

/// Main backend event loop
///
/// Generation is awaited inside its select arm, so submissions are
/// served one at a time in arrival order.
async fn run_backend_loop(
  foot: crate::NovelistFoot
, completion: crate::completion::CompletionClient
)
{   debug!("Starting NovelistBackend event loop");
    let NovelistFoot
    {   mut generate_novel_rx
      , mut kill_process_rx
    } = foot;

    loop
    { tokio::select!
      { Some(cmd) = generate_novel_rx.recv() => {
          debug!("Received GenerateNovel");
          let result = completion.generate(&cmd.request).await;
          let _ = cmd.reply.send(result);
        }
      , Some(cmd) = kill_process_rx.recv() => {
          debug!("Received KillProcess");
          let _ = cmd.reply.send(Ok(()));
          info!("NovelistBackend shutting down");
          break;
        }
      , else => {
          debug!("Command channels closed");
          break;
        }
      }
    }
}
