use crate::models::Rect;

/// Gap between tiles and between tiles and the viewport edge.
pub const SPACING: i32 = 4;
/// Width of the scrollbar thumb.
pub const SCROLLBAR_WIDTH: i32 = 6;
/// Gap between the scrollbar and the viewport's right edge.
pub const SCROLLBAR_SPACING: i32 = 2;

pub const MIN_COLUMNS: usize = 2;
pub const MAX_COLUMNS: usize = 8;

/// Tiles are slightly taller than the window aspect so the file name fits
/// under the image.
pub const TILE_HEIGHT_RATIO: f32 = 1.08;

/// Fixed-column grid layout.
///
/// Tiles share one size, derived from the viewport width, the column count and
/// the window aspect ratio. They are placed left-to-right and wrap after
/// `columns` tiles. Nothing here is cached: callers recompute on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub spacing: i32,
}

impl GridLayout {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: clamp_columns(columns),
            spacing: SPACING,
        }
    }

    /// Tile `(width, height)` for a viewport of `viewport_width` pixels.
    ///
    /// Room is left for `columns + 1` gaps and the scrollbar.
    pub fn tile_size(&self, viewport_width: i32, window_aspect: f32) -> (i32, i32) {
        let columns = self.columns.max(1) as i32;
        let reserved = (columns + 1) * self.spacing + SCROLLBAR_WIDTH + SCROLLBAR_SPACING;
        let width = ((viewport_width - reserved) / columns).max(0);

        let aspect = if window_aspect.is_finite() && window_aspect > 0.0 {
            window_aspect
        } else {
            1.0
        };
        let height = (TILE_HEIGHT_RATIO * width as f32 / aspect) as i32;
        (width, height.max(0))
    }

    /// Number of rows needed for `count` tiles.
    pub fn rows(&self, count: usize) -> usize {
        count.div_ceil(self.columns.max(1))
    }

    /// Height of all rows including the gaps between them.
    pub fn total_height(&self, count: usize, tile_height: i32) -> i32 {
        let rows = self.rows(count) as i32;
        if rows == 0 {
            return 0;
        }
        rows * tile_height + self.spacing * (rows - 1)
    }

    /// Height available to content inside the viewport margins.
    pub fn view_height(&self, viewport: &Rect) -> i32 {
        viewport.height - 2 * self.spacing
    }

    /// Largest scroll offset that still shows content, never negative.
    pub fn max_scroll(&self, total_height: i32, viewport: &Rect) -> i32 {
        (total_height - self.view_height(viewport)).max(0)
    }

    /// Computes the unscrolled `(x, base_y)` of each of `count` tiles.
    ///
    /// # Algorithm
    /// 1. Start at the top-left corner inset by `spacing`.
    /// 2. Advance by `tile_width + spacing` per tile.
    /// 3. After `columns` tiles, return to the left and move down one row.
    pub fn positions(
        &self,
        count: usize,
        viewport: &Rect,
        tile_width: i32,
        tile_height: i32,
    ) -> Vec<(i32, i32)> {
        let max_x_off = self.columns.max(1) - 1;
        let left = viewport.x + self.spacing;

        let mut positions = Vec::with_capacity(count);
        let mut x = left;
        let mut y = viewport.y + self.spacing;
        let mut x_off = 0usize;

        for _ in 0..count {
            positions.push((x, y));

            if x_off == max_x_off {
                x_off = 0;
                x = left;
                y += tile_height + self.spacing;
            } else {
                x_off += 1;
                x += tile_width + self.spacing;
            }
        }

        positions
    }
}

pub fn clamp_columns(columns: usize) -> usize {
    columns.clamp(MIN_COLUMNS, MAX_COLUMNS)
}
