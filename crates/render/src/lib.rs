//! Image side of the pipeline: loading card images, composing them into one
//! PNG and delivering it to the clipboard.

pub mod clipboard;
pub mod compose;
pub mod display;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod probe;
#[cfg(feature = "system-clipboard")]
pub mod system;

pub use clipboard::{ClipboardDelivery, ClipboardOutcome, ClipboardSink, ManualAction, PendingCopy};
pub use compose::{draw_tiles, encode_png, ComposedImage, TileComposer};
pub use display::DisplayUrl;
pub use error::*;
pub use image::codecs::png::CompressionType;
pub use loader::{load_in_order, FsImageLoader, ImageLoader};
pub use pipeline::{DrawReport, Pipeline};
pub use probe::probe_platform;
#[cfg(feature = "system-clipboard")]
pub use system::{ClipboardHold, SystemClipboard};
