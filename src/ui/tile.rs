// Screenshot tile: one thumbnail in the grid
// Holds its decoded image only while it is on screen

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use image::RgbaImage;
use tracing::{trace, warn};

use super::surface::DrawSurface;
use crate::config::GridConfig;
use crate::image_loader::ThumbnailLoader;
use crate::layout::TILE_HEIGHT_RATIO;
use crate::models::{Color, Rect, ScreenshotFile};

/// Inset between the tile border and its image.
const TILE_PADDING: i32 = 2;

const TILE_BACKGROUND: Color = Color::argb(0xFF, 0x1E, 0x1E, 0x1E);
const PLACEHOLDER: Color = Color::argb(0xFF, 0x3A, 0x3A, 0x3A);
const HOVER_OVERLAY: Color = Color::argb(0x40, 0xFF, 0xFF, 0xFF);

/// Identifies a tile across reorders and removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// Navigation direction between tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Grid order and column count, written by the grid and read by tiles.
#[derive(Debug, Default)]
pub struct TileIndex {
    columns: Cell<usize>,
    order: RefCell<Vec<TileId>>,
}

impl TileIndex {
    pub fn new(columns: usize) -> Rc<Self> {
        Rc::new(Self {
            columns: Cell::new(columns),
            order: RefCell::new(Vec::new()),
        })
    }

    pub(super) fn update(&self, columns: usize, order: Vec<TileId>) {
        self.columns.set(columns);
        *self.order.borrow_mut() = order;
    }
}

/// Read-only view a tile gets of its place in the grid.
#[derive(Debug, Clone)]
pub struct TileContext {
    index: Rc<TileIndex>,
}

impl TileContext {
    pub fn new(index: Rc<TileIndex>) -> Self {
        Self { index }
    }

    pub fn current_column_count(&self) -> usize {
        self.index.columns.get()
    }

    pub fn index_of(&self, id: TileId) -> Option<usize> {
        self.index.order.borrow().iter().position(|&t| t == id)
    }

    pub fn len(&self) -> usize {
        self.index.order.borrow().len()
    }

    pub fn id_at(&self, index: usize) -> Option<TileId> {
        self.index.order.borrow().get(index).copied()
    }

    /// The tile next to `id` in `direction`.
    ///
    /// Left/Right walk the sequence and so wrap across rows. Moving down onto
    /// a shorter last row lands on its final tile.
    pub fn neighbor(&self, id: TileId, direction: Direction) -> Option<TileId> {
        let index = self.index_of(id)?;
        let len = self.len();
        let columns = self.current_column_count().max(1);

        let target = match direction {
            Direction::Left => index.checked_sub(1)?,
            Direction::Right => index + 1,
            Direction::Up => index.checked_sub(columns)?,
            Direction::Down => {
                if index + columns < len {
                    index + columns
                } else if index / columns < (len - 1) / columns {
                    len - 1
                } else {
                    return None;
                }
            }
        };
        self.id_at(target)
    }
}

/// How tiles draw themselves, taken from `GridConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStyle {
    pub background: Color,
    pub text_color: Color,
    pub font_shadow: bool,
}

impl TileStyle {
    pub fn from_config(config: &GridConfig) -> Self {
        let alpha = (config.background_opacity.min(100) as u32 * 255 / 100) as u8;
        Self {
            background: TILE_BACKGROUND.with_alpha(alpha),
            text_color: config.text_color,
            font_shadow: config.font_shadow,
        }
    }
}

impl Default for TileStyle {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

pub struct Tile {
    id: TileId,
    file: ScreenshotFile,
    context: TileContext,
    x: i32,
    base_y: i32,
    y: i32,
    width: i32,
    height: i32,
    hovered: bool,
    image: Option<RgbaImage>,
    // Size at which decoding last failed; retried only after a resize.
    failed_size: Option<(i32, i32)>,
}

impl Tile {
    pub fn new(id: TileId, file: ScreenshotFile, context: TileContext) -> Self {
        Self {
            id,
            file,
            context,
            x: 0,
            base_y: 0,
            y: 0,
            width: 0,
            height: 0,
            hovered: false,
            image: None,
            failed_size: None,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn file(&self) -> &ScreenshotFile {
        &self.file
    }

    pub fn context(&self) -> &TileContext {
        &self.context
    }

    /// Position in the grid, if the tile is still part of it.
    pub fn index(&self) -> Option<usize> {
        self.context.index_of(self.id)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn base_y(&self) -> i32 {
        self.base_y
    }

    pub fn set_position(&mut self, x: i32, base_y: i32) {
        self.x = x;
        self.base_y = base_y;
        self.y = base_y;
    }

    /// Resizing drops the decoded image so it is decoded again at the new size.
    pub fn set_size(&mut self, width: i32, height: i32) {
        if (width, height) != (self.width, self.height) {
            self.close();
            self.failed_size = None;
        }
        self.width = width;
        self.height = height;
    }

    pub fn update_y(&mut self, scroll: i32) {
        self.y = self.base_y - scroll;
    }

    /// Hovered only when `update` is set and the pointer is over the part of
    /// the tile inside `[viewport_top, viewport_bottom)`.
    pub fn update_hover_state(
        &mut self,
        mouse_x: f64,
        mouse_y: f64,
        viewport_top: i32,
        viewport_bottom: i32,
        update: bool,
    ) {
        self.hovered = update
            && self.rect().contains(mouse_x, mouse_y)
            && mouse_y >= viewport_top as f64
            && mouse_y < viewport_bottom as f64;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Releases the decoded image.
    pub fn close(&mut self) {
        if self.image.take().is_some() {
            trace!(path = ?self.file.path, "Released thumbnail");
        }
    }

    /// Area the thumbnail is fitted into; the file name goes below it.
    fn image_area(&self) -> Rect {
        let label_height = self.label_height();
        Rect::new(
            self.x + TILE_PADDING,
            self.y + TILE_PADDING,
            (self.width - 2 * TILE_PADDING).max(0),
            (self.height - label_height - 2 * TILE_PADDING).max(0),
        )
    }

    fn label_height(&self) -> i32 {
        self.height - (self.height as f32 / TILE_HEIGHT_RATIO) as i32
    }

    fn ensure_image(&mut self, loader: &dyn ThumbnailLoader, area: Rect) {
        if self.image.is_some() || area.width <= 0 || area.height <= 0 {
            return;
        }
        let size = (self.width, self.height);
        if self.failed_size == Some(size) {
            return;
        }

        match loader.load(&self.file.path, area.width as u32, area.height as u32) {
            Ok(image) => {
                trace!(path = ?self.file.path, w = image.width(), h = image.height(), "Loaded thumbnail");
                self.image = Some(image);
            }
            Err(err) => {
                warn!(error = ?err, "Failed to load screenshot thumbnail");
                self.failed_size = Some(size);
            }
        }
    }

    /// Draws the tile, clipped to `[viewport_top, viewport_bottom]`.
    ///
    /// The thumbnail is decoded on the first call that has something to show.
    pub fn render(
        &mut self,
        surface: &mut dyn DrawSurface,
        loader: &dyn ThumbnailLoader,
        viewport_top: i32,
        viewport_bottom: i32,
        style: &TileStyle,
    ) {
        let rect = self.rect();
        let Some(visible) = rect.clip_vertical(viewport_top, viewport_bottom) else {
            return;
        };

        surface.fill_rect(visible, style.background);

        let area = self.image_area();
        self.ensure_image(loader, area);

        if let Some(clip) = area.clip_vertical(viewport_top, viewport_bottom) {
            match &self.image {
                Some(image) => {
                    let dest = fit_centered(image.width(), image.height(), area);
                    surface.draw_image(image, dest, clip);
                }
                None => surface.fill_rect(clip, PLACEHOLDER),
            }
        }

        let label_y = self.y + self.height - self.label_height();
        surface.draw_text(
            &self.file.file_name(),
            self.x + TILE_PADDING,
            label_y,
            style.text_color,
            style.font_shadow,
            visible,
        );

        if self.hovered {
            surface.fill_rect(visible, HOVER_OVERLAY);
        }
    }
}

impl Drop for Tile {
    fn drop(&mut self) {
        self.close();
    }
}

/// Largest rect with the image's aspect ratio that fits in `area`, centered.
pub fn fit_centered(image_width: u32, image_height: u32, area: Rect) -> Rect {
    if image_width == 0 || image_height == 0 || area.width <= 0 || area.height <= 0 {
        return Rect::new(area.x, area.y, 0, 0);
    }
    let scale = f64::min(
        area.width as f64 / image_width as f64,
        area.height as f64 / image_height as f64,
    );
    let width = ((image_width as f64 * scale).round() as i32).min(area.width);
    let height = ((image_height as f64 * scale).round() as i32).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
