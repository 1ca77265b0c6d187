use crate::error::ComposeError;
use crate::loader::{load_in_order, ImageLoader};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use outs_core::{DeckEntry, Grid, TileLayout, MAX_CANVAS_PIXELS};
use std::sync::Arc;

/// A finished picture: PNG bytes and the canvas size they encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl ComposedImage {
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn from_canvas(canvas: &RgbaImage, compression: CompressionType) -> Result<Self, ComposeError> {
        Ok(Self {
            png: encode_png(canvas, compression)?,
            width: canvas.width(),
            height: canvas.height(),
        })
    }
}

pub struct TileComposer<L> {
    loader: Arc<L>,
    layout: TileLayout,
    load_window: usize,
    compression: CompressionType,
}

impl<L: ImageLoader> TileComposer<L> {
    pub fn new(loader: Arc<L>) -> Self {
        Self {
            loader,
            layout: TileLayout::default(),
            load_window: 1,
            compression: CompressionType::Best,
        }
    }

    pub fn with_layout(mut self, layout: TileLayout) -> Self {
        self.layout = layout;
        self
    }

    /// How many loads may be in flight at once. 1 keeps loading sequential.
    pub fn with_load_window(mut self, window: usize) -> Self {
        self.load_window = window.max(1);
        self
    }

    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Loads every entry in order and draws them onto one canvas. The canvas
    /// size is checked before the first load starts.
    pub async fn compose(&self, entries: &[DeckEntry]) -> Result<ComposedImage, ComposeError> {
        if entries.is_empty() {
            return Err(ComposeError::NothingToCompose);
        }
        let grid = self
            .layout
            .grid(entries.len())
            .filter(|grid| grid.pixels() <= MAX_CANVAS_PIXELS)
            .ok_or(ComposeError::CanvasTooLarge {
                tiles: entries.len(),
            })?;
        log::debug!(
            "composing {} tiles on a {}x{} grid ({}x{} px)",
            entries.len(),
            grid.columns,
            grid.rows,
            grid.width,
            grid.height
        );
        let images = load_in_order(&self.loader, entries, self.load_window).await?;
        let layout = self.layout;
        let compression = self.compression;
        tokio::task::spawn_blocking(move || {
            let canvas = draw_tiles(&layout, &grid, &images);
            ComposedImage::from_canvas(&canvas, compression)
        })
        .await
        .map_err(|err| ComposeError::Encode(err.to_string()))?
    }
}

/// Draws each image stretched to exactly one tile, row-major. Uncovered
/// pixels stay transparent.
pub fn draw_tiles(layout: &TileLayout, grid: &Grid, images: &[DynamicImage]) -> RgbaImage {
    let mut canvas = RgbaImage::new(grid.width, grid.height);
    for (index, image) in images.iter().enumerate() {
        let (x, y) = layout.origin(index, grid.columns);
        let tile = fit_tile(image, layout.tile_width, layout.tile_height);
        imageops::replace(&mut canvas, &tile, i64::from(x), i64::from(y));
    }
    canvas
}

fn fit_tile(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    if image.width() == width && image.height() == height {
        return image.to_rgba8();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

pub fn encode_png(canvas: &RgbaImage, compression: CompressionType) -> Result<Vec<u8>, ComposeError> {
    let mut png = Vec::new();
    PngEncoder::new_with_quality(&mut png, compression, PngFilter::Adaptive)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|err| ComposeError::Encode(err.to_string()))?;
    Ok(png)
}
