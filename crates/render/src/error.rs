use outs_core::{DeckEntry, DrawError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {entry}: {source}")]
    Io {
        entry: DeckEntry,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {entry}: {message}")]
    Decode { entry: DeckEntry, message: String },
    #[error("load task for {entry} did not finish: {message}")]
    Task { entry: DeckEntry, message: String },
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to encode png: {0}")]
    Encode(String),
    #[error("no cards to compose")]
    NothingToCompose,
    #[error("{tiles} tiles do not fit on one canvas")]
    CanvasTooLarge { tiles: usize },
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("system clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
    #[error("composed image could not be decoded for the clipboard: {0}")]
    Decode(String),
    #[error("this platform cannot write images to the clipboard")]
    Unsupported,
    #[error("failed to prepare image preview: {0}")]
    Preview(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
}
