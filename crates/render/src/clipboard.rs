//! Getting a composed picture onto the clipboard.
//!
//! The route is picked from [`PlatformCapabilities`] alone. Routes that cannot
//! write unattended hand back a [`PendingCopy`] holding a preview URL; the
//! front end either confirms it from a user action or dismisses it.

use crate::compose::ComposedImage;
use crate::display::DisplayUrl;
use crate::error::ClipboardError;
use outs_core::{DeliveryRoute, PlatformCapabilities};
use std::path::PathBuf;
use std::sync::Arc;

/// Writes may block on the OS; unattended deliveries call them from the
/// blocking pool.
pub trait ClipboardSink: Send + Sync + 'static {
    fn write_png(&self, image: &ComposedImage) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualAction {
    /// One explicit user action performs the write, synchronously.
    ConfirmWrite,
    /// The user saves or copies the previewed image themselves.
    SaveFromPreview,
}

#[derive(Debug)]
pub struct PendingCopy {
    image: ComposedImage,
    url: DisplayUrl,
    action: ManualAction,
}

impl PendingCopy {
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn action(&self) -> ManualAction {
        self.action
    }

    pub fn image(&self) -> &ComposedImage {
        &self.image
    }

    /// Performs the write from the user's action. The preview is released
    /// whether or not the write succeeds.
    pub fn confirm<S: ClipboardSink + ?Sized>(self, sink: &S) -> Result<(), ClipboardError> {
        let result = match self.action {
            ManualAction::ConfirmWrite => sink.write_png(&self.image),
            ManualAction::SaveFromPreview => Err(ClipboardError::Unsupported),
        };
        self.url.revoke();
        result
    }

    pub fn dismiss(self) {
        self.url.revoke();
    }
}

#[derive(Debug)]
pub enum ClipboardOutcome {
    Delivered,
    NeedsManualConfirmation(PendingCopy),
    Failed(ClipboardError),
}

impl ClipboardOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub struct ClipboardDelivery<S> {
    sink: Arc<S>,
    capabilities: PlatformCapabilities,
    preview_dir: PathBuf,
}

impl<S: ClipboardSink> ClipboardDelivery<S> {
    pub fn new(sink: S, capabilities: PlatformCapabilities) -> Self {
        Self {
            sink: Arc::new(sink),
            capabilities,
            preview_dir: std::env::temp_dir(),
        }
    }

    pub fn with_preview_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.preview_dir = dir.into();
        self
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }

    pub fn sink(&self) -> &S {
        self.sink.as_ref()
    }

    pub async fn deliver(&self, image: ComposedImage) -> ClipboardOutcome {
        let route = self.capabilities.route();
        log::debug!(
            "delivering {}x{} image via {route:?}",
            image.width(),
            image.height()
        );
        match route {
            DeliveryRoute::Unattended => {
                let sink = Arc::clone(&self.sink);
                let written = tokio::task::spawn_blocking(move || sink.write_png(&image))
                    .await
                    .unwrap_or_else(|err| Err(ClipboardError::WriteFailed(err.to_string())));
                match written {
                    Ok(()) => ClipboardOutcome::Delivered,
                    Err(err) => {
                        log::warn!("{err}");
                        ClipboardOutcome::Failed(err)
                    }
                }
            }
            DeliveryRoute::GestureConfirm => self.pending(image, ManualAction::ConfirmWrite),
            DeliveryRoute::ManualSave => self.pending(image, ManualAction::SaveFromPreview),
        }
    }

    pub fn confirm(&self, pending: PendingCopy) -> Result<(), ClipboardError> {
        pending.confirm(self.sink.as_ref())
    }

    fn pending(&self, image: ComposedImage, action: ManualAction) -> ClipboardOutcome {
        match DisplayUrl::create_in(&self.preview_dir, &image) {
            Ok(url) => ClipboardOutcome::NeedsManualConfirmation(PendingCopy { image, url, action }),
            Err(err) => ClipboardOutcome::Failed(ClipboardError::Preview(err)),
        }
    }
}
