//! Cross-feature "open in editor" requests.
//!
//! The gallery browser publishes an [`EditorRequest`]; whichever editors are
//! mounted pick it up through [`spawn_editor_listener`]. Neither side holds a
//! reference to the other.

use estudio_core::{Character, Propaganda, Scene, StoredProduct};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Entity to load into an editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorRequest {
    /// Load into the character builder
    LoadCharacter(Character),
    /// Load into the scene builder
    LoadScene(Scene),
    /// Load into the scene builder's product slot
    LoadProduct(StoredProduct),
    /// Load into the propaganda generator
    LoadPropaganda(Propaganda),
}

impl EditorRequest {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EditorRequest::LoadCharacter(_) => "character",
            EditorRequest::LoadScene(_) => "scene",
            EditorRequest::LoadProduct(_) => "product",
            EditorRequest::LoadPropaganda(_) => "propaganda",
        }
    }
}

/// Broadcast channel for editor requests.
#[derive(Debug, Clone)]
pub struct EditorChannel {
    sender: broadcast::Sender<EditorRequest>,
}

impl EditorChannel {
    /// Default channel capacity.
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Create a channel buffering up to `capacity` requests per listener.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a request. Returns how many listeners received it.
    pub fn publish(&self, request: EditorRequest) -> usize {
        debug!(kind = request.kind(), "Editor request");
        self.sender.send(request).unwrap_or(0)
    }

    /// Receive requests published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorRequest> {
        self.sender.subscribe()
    }
}

impl Default for EditorChannel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// An editor that can take entities from the channel.
pub trait EditorTarget: Send + Sync + 'static {
    /// Name for logs.
    fn editor_name(&self) -> &'static str;

    /// Handle one request. Returns `true` when the request was for this
    /// editor and was applied.
    fn apply(&self, request: &EditorRequest) -> bool;
}

/// Listen on `channel` and feed every request to `editor` until the
/// channel closes or the returned handle is aborted.
///
/// The receiver is created before this returns, so requests published right
/// after the call are not missed.
pub fn spawn_editor_listener<E: EditorTarget>(
    channel: &EditorChannel,
    editor: E,
) -> JoinHandle<()> {
    let mut receiver = channel.subscribe();
    tokio::spawn(async move {
        info!(editor = editor.editor_name(), "Editor listener started");
        loop {
            match receiver.recv().await {
                Ok(request) => {
                    if editor.apply(&request) {
                        debug!(
                            editor = editor.editor_name(),
                            kind = request.kind(),
                            "Loaded into editor"
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(editor = editor.editor_name(), skipped, "Editor listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
        info!(editor = editor.editor_name(), "Editor listener stopped");
    })
}
