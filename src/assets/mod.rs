use crate::screen::{AssetRef, ImageHandle};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum AssetEvent {
    Loaded { asset_ref: AssetRef, image: ImageHandle },
    Failed { asset_ref: AssetRef, reason: String },
}

impl AssetEvent {
    pub fn asset_ref(&self) -> &str {
        match self {
            AssetEvent::Loaded { asset_ref, .. } | AssetEvent::Failed { asset_ref, .. } => asset_ref,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read image at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Completion queue between loader threads and the frame tick.
pub struct AssetQueue {
    sender: Sender<AssetEvent>,
    receiver: Receiver<AssetEvent>,
}

impl Default for AssetQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> Sender<AssetEvent> {
        self.sender.clone()
    }

    /// Take every event delivered so far without blocking.
    pub fn drain(&self) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

/// Loads asset refs relative to `root` on background threads.
pub struct FileAssetLoader {
    root: PathBuf,
    sender: Sender<AssetEvent>,
}

impl FileAssetLoader {
    pub fn new(root: impl Into<PathBuf>, queue: &AssetQueue) -> Self {
        Self {
            root: root.into(),
            sender: queue.sender(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Spawn one decode per asset. Results arrive through the queue in
    /// completion order.
    pub fn request_all<I>(&self, asset_refs: I) -> Vec<std::thread::JoinHandle<()>>
    where
        I: IntoIterator<Item = AssetRef>,
    {
        asset_refs
            .into_iter()
            .map(|asset_ref| self.request(asset_ref))
            .collect()
    }

    pub fn request(&self, asset_ref: AssetRef) -> std::thread::JoinHandle<()> {
        let path = self.root.join(&asset_ref);
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let event = match load_image(&path) {
                Ok(image) => AssetEvent::Loaded { asset_ref, image },
                Err(err) => AssetEvent::Failed {
                    asset_ref,
                    reason: err.to_string(),
                },
            };
            // The receiving side is gone once the scene is torn down.
            let _ = sender.send(event);
        })
    }
}

pub fn load_image(path: &Path) -> Result<ImageHandle, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Arc::new(decoded.to_rgba8()))
}
