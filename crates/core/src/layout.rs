//! Grid geometry for the composed picture.

pub const TILE_WIDTH: u32 = 569;
pub const TILE_HEIGHT: u32 = 820;
pub const TILE_MARGIN: u32 = 20;
pub const GRID_COLUMNS: u32 = 3;
/// Largest canvas the composer allocates: 2^26 pixels, 256 MiB as RGBA.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    pub tile_width: u32,
    pub tile_height: u32,
    pub margin: u32,
    pub max_columns: u32,
}

impl Default for TileLayout {
    fn default() -> Self {
        Self {
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            margin: TILE_MARGIN,
            max_columns: GRID_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
    pub width: u32,
    pub height: u32,
}

impl Grid {
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl TileLayout {
    /// Grid for `count` tiles. `None` when there is nothing to lay out or
    /// the canvas size does not fit in `u32`.
    pub fn grid(&self, count: usize) -> Option<Grid> {
        if count == 0 || self.max_columns == 0 {
            return None;
        }
        let count = u32::try_from(count).ok()?;
        let columns = count.min(self.max_columns);
        let rows = count.div_ceil(self.max_columns);
        Some(Grid {
            columns,
            rows,
            width: span(columns, self.tile_width, self.margin)?,
            height: span(rows, self.tile_height, self.margin)?,
        })
    }

    /// Top-left pixel of tile `index` in a grid with `columns` columns, row-major.
    pub fn origin(&self, index: usize, columns: u32) -> (u32, u32) {
        let index = index as u32;
        let row = index / columns;
        let col = index % columns;
        (
            col * (self.tile_width + self.margin),
            row * (self.tile_height + self.margin),
        )
    }
}

/// `cells` tiles of `cell` pixels with `margin` between neighbours.
fn span(cells: u32, cell: u32, margin: u32) -> Option<u32> {
    cells
        .checked_mul(cell)?
        .checked_add(margin.checked_mul(cells - 1)?)
}
