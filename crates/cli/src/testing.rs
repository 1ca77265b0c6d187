use crate::app::App;
use crate::locale::UiLocale;
use crate::session::Session;
use image::{DynamicImage, Rgba, RgbaImage};
use outs_core::{DeckEntry, DeckRegistry, PlatformCapabilities, RngState};
use outs_render::{
    ClipboardDelivery, ClipboardError, ClipboardSink, ComposedImage, CompressionType, ImageLoader,
    LoadError, Pipeline, TileComposer,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct BlankLoader {
    broken: bool,
}

impl ImageLoader for BlankLoader {
    fn load(&self, entry: &DeckEntry) -> Result<DynamicImage, LoadError> {
        if self.broken {
            return Err(LoadError::Decode {
                entry: entry.clone(),
                message: "broken".to_string(),
            });
        }
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            569,
            820,
            Rgba([0, 0, 0, 255]),
        )))
    }
}

#[derive(Default)]
pub struct CountingSink {
    writes: AtomicUsize,
}

impl CountingSink {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ClipboardSink for CountingSink {
    fn write_png(&self, _image: &ComposedImage) -> Result<(), ClipboardError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn test_app(caps: PlatformCapabilities, broken: bool) -> App<BlankLoader, CountingSink> {
    let composer =
        TileComposer::new(Arc::new(BlankLoader { broken })).with_compression(CompressionType::Fast);
    let dir = std::env::temp_dir().join(format!("outs_app_test_{}", std::process::id()));
    let delivery = ClipboardDelivery::new(CountingSink::default(), caps).with_preview_dir(dir);
    let pipeline = Pipeline::new(DeckRegistry::numbered("", "png"), composer, delivery);
    App::new(UiLocale::EnUs, Session::new(), pipeline, RngState::from_seed(4))
}
