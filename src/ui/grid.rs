// Screenshot grid: the scrollable list of screenshot tiles
// Lays tiles out in fixed columns, scrolls them, and culls the ones off screen

use std::rc::Rc;

use tracing::{debug, info};

use super::element::{Element, BUTTON_PRIMARY};
use super::scrollbar::ScrollTrack;
use super::surface::DrawSurface;
use super::tile::{Tile, TileContext, TileId, TileIndex, TileStyle};
use crate::config::GridConfig;
use crate::image_loader::ThumbnailLoader;
use crate::layout::{clamp_columns, GridLayout, MAX_COLUMNS, MIN_COLUMNS};
use crate::models::{Color, Rect, ScreenshotFile};

const BACKGROUND: Color = Color::argb(178, 0, 0, 0);
const NO_SCREENSHOTS: &str = "No screenshots found";
const MESSAGE_COLOR: Color = Color::WHITE;
const MIN_SCROLL_SPEED: i32 = 1;
const MAX_SCROLL_SPEED: i32 = 50;

/// What a click on the grid landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridClick {
    /// The scrollbar thumb; a drag is now in progress.
    Scrollbar,
    Tile(TileId),
    Nothing,
}

pub struct Grid {
    viewport: Rect,
    window_aspect: f32,
    tiles: Vec<Tile>,
    index: Rc<TileIndex>,
    next_id: u64,
    scrollbar: ScrollTrack,
    layout: GridLayout,
    // Offset from top
    scroll_y: i32,
    scroll_speed: i32,
    tile_width: i32,
    tile_height: i32,
    inverted_order: bool,
    config: GridConfig,
    style: TileStyle,
    loader: Rc<dyn ThumbnailLoader>,
    dragging_scrollbar: bool,
}

impl Grid {
    pub fn new(
        viewport: Rect,
        window_aspect: f32,
        config: GridConfig,
        loader: Rc<dyn ThumbnailLoader>,
    ) -> Self {
        let layout = GridLayout::new(config.columns);
        let mut grid = Self {
            viewport,
            window_aspect,
            tiles: Vec::new(),
            index: TileIndex::new(layout.columns),
            next_id: 0,
            scrollbar: ScrollTrack::new(),
            layout,
            scroll_y: 0,
            scroll_speed: config.scroll_speed.clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED),
            tile_width: 0,
            tile_height: 0,
            inverted_order: config.inverted_order,
            style: TileStyle::from_config(&config),
            config,
            loader,
            dragging_scrollbar: false,
        };
        grid.update_variables();
        grid
    }

    /// Applies a new viewport and window aspect ratio and lays out again.
    pub fn update_size(&mut self, viewport: Rect, window_aspect: f32) {
        self.viewport = viewport;
        self.window_aspect = window_aspect;
        self.update_children();
    }

    /// Re-reads the grid options. A changed list order option flips the order.
    pub fn on_config_update(&mut self, config: GridConfig) {
        self.layout = GridLayout::new(config.columns);
        self.scroll_speed = config.scroll_speed.clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED);
        self.style = TileStyle::from_config(&config);
        let order_changed = config.inverted_order != self.config.inverted_order;
        self.config = config;
        debug!(columns = self.layout.columns, speed = self.scroll_speed, "Grid config updated");

        if order_changed && self.inverted_order != self.config.inverted_order {
            self.invert_order();
        } else {
            self.update_children();
        }
    }

    /// Replaces all tiles with one per file.
    ///
    /// Previous tiles release their images first. The current order flag is
    /// applied to the new list.
    pub fn init(&mut self, files: Vec<ScreenshotFile>) {
        self.clear_children();

        let context = TileContext::new(self.index.clone());
        for file in files {
            let id = TileId(self.next_id);
            self.next_id += 1;
            self.tiles.push(Tile::new(id, file, context.clone()));
        }
        if self.inverted_order {
            self.tiles.reverse();
        }
        info!("Grid populated with {} screenshots", self.tiles.len());

        self.update_children();
    }

    /// Adds or removes one column depending on the sign of `amount`.
    pub fn update_screenshots_per_row(&mut self, amount: f64) {
        let columns = self.layout.columns;
        if amount > 0.0 && columns < MAX_COLUMNS {
            self.layout.columns = clamp_columns(columns + 1);
        } else if amount < 0.0 && columns > MIN_COLUMNS {
            self.layout.columns = clamp_columns(columns - 1);
        }
        self.update_children();
    }

    /// Recomputes tile sizes and positions.
    ///
    /// Scrolls back to the top as a side effect.
    pub fn update_children(&mut self) {
        self.scroll_y = 0;
        self.update_variables();

        let positions =
            self.layout
                .positions(self.tiles.len(), &self.viewport, self.tile_width, self.tile_height);
        for (tile, (x, y)) in self.tiles.iter_mut().zip(positions) {
            tile.set_position(x, y);
            tile.set_size(self.tile_width, self.tile_height);
        }

        self.index
            .update(self.layout.columns, self.tiles.iter().map(Tile::id).collect());
        self.scrollbar
            .reposition(&self.viewport, self.layout.spacing, self.total_height_of_children());

        debug!(
            tiles = self.tiles.len(),
            columns = self.layout.columns,
            tile_w = self.tile_width,
            tile_h = self.tile_height,
            total_h = self.total_height_of_children(),
            "Grid layout updated"
        );
    }

    /// Removes a tile and lays out again, which scrolls back to the top.
    pub fn remove_entry(&mut self, id: TileId) -> Option<ScreenshotFile> {
        let position = self.tiles.iter().position(|t| t.id() == id)?;
        let mut tile = self.tiles.remove(position);
        tile.close();
        let file = tile.file().clone();
        self.update_children();
        Some(file)
    }

    fn update_variables(&mut self) {
        let (width, height) = self
            .layout
            .tile_size(self.viewport.width, self.window_aspect);
        self.tile_width = width;
        self.tile_height = height;
    }

    fn clear_children(&mut self) {
        self.close();
        self.tiles.clear();
        self.index.update(self.layout.columns, Vec::new());
    }

    /// Releases every tile's decoded image.
    pub fn close(&mut self) {
        self.tiles.iter_mut().for_each(Tile::close);
    }

    /// Draws the grid.
    ///
    /// `update_hover` is false while something covers the grid, so no tile
    /// reacts to the pointer.
    pub fn render_with_hover(
        &mut self,
        surface: &mut dyn DrawSurface,
        mouse_x: f64,
        mouse_y: f64,
        update_hover: bool,
    ) {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.viewport;
        surface.fill_rect(self.viewport, BACKGROUND);
        if self.tiles.is_empty() {
            surface.draw_centered_text(NO_SCREENSHOTS, x + width / 2, y + height / 2 - 4, MESSAGE_COLOR);
        }

        let viewport_top = y + self.layout.spacing;
        let viewport_bottom = y + height - self.layout.spacing;
        let loader = self.loader.clone();

        for tile in &mut self.tiles {
            tile.update_y(self.scroll_y);
            tile.update_hover_state(mouse_x, mouse_y, viewport_top, viewport_bottom, update_hover);
            let rect = tile.rect();
            // Nothing of it is on screen: free the decoded image now
            if rect.bottom() < y || rect.y > y + height {
                tile.close();
                continue;
            }
            tile.render(surface, loader.as_ref(), viewport_top, viewport_bottom, &self.style);
        }

        if self.can_scroll() {
            self.scrollbar.render(surface, mouse_x, mouse_y, self.scroll_y);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id() == id)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|t| t.id() == id)
    }

    /// Context handle giving the same view tiles get.
    pub fn context(&self) -> TileContext {
        TileContext::new(self.index.clone())
    }

    /// The tile under the pointer as of the last render.
    pub fn hovered(&self) -> Option<TileId> {
        self.tiles.iter().find(|t| t.is_hovered()).map(Tile::id)
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn columns(&self) -> usize {
        self.layout.columns
    }

    pub fn spacing(&self) -> i32 {
        self.layout.spacing
    }

    pub fn tile_size(&self) -> (i32, i32) {
        (self.tile_width, self.tile_height)
    }

    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    pub fn scrollbar(&self) -> &ScrollTrack {
        &self.scrollbar
    }

    /// Reverses the tile order, keeping the current scroll offset.
    pub fn invert_order(&mut self) {
        self.tiles.reverse();
        self.inverted_order = !self.inverted_order;
        let previous_scroll_y = self.scroll_y;
        self.update_children();
        self.scroll_y = previous_scroll_y.clamp(0, self.max_scroll());
    }

    pub fn is_inverted_order(&self) -> bool {
        self.inverted_order
    }

    pub fn can_scroll(&self) -> bool {
        self.total_height_of_children() > self.layout.view_height(&self.viewport)
    }

    fn can_scroll_down(&self) -> bool {
        self.scroll_y < self.left_over()
    }

    /// Maximum offset from the top; negative when everything fits.
    fn left_over(&self) -> i32 {
        self.total_height_of_children() - self.layout.view_height(&self.viewport)
    }

    fn max_scroll(&self) -> i32 {
        self.layout
            .max_scroll(self.total_height_of_children(), &self.viewport)
    }

    pub fn total_height_of_children(&self) -> i32 {
        self.layout.total_height(self.tiles.len(), self.tile_height)
    }

    /// Scrolls by one wheel step. Positive `amount` scrolls up.
    ///
    /// Returns false when the content fits and there is nothing to scroll.
    pub fn scroll(&mut self, amount: f64) -> bool {
        if !self.can_scroll() {
            return false;
        }

        let step = (self.scroll_speed as f32 * (6.0 / self.layout.columns as f32) * amount as f32)
            as i32;
        let speed = step.unsigned_abs().min(i32::MAX as u32) as i32;
        if self.scroll_y > 0 && amount > 0.0 {
            self.scroll_y = self.scroll_y.saturating_sub(speed).max(0);
        }
        if self.can_scroll_down() && amount < 0.0 {
            self.scroll_y = self.scroll_y.saturating_add(speed).min(self.left_over());
        }
        true
    }

    /// Scrolls just enough to show the whole tile.
    pub fn scroll_to_tile(&mut self, id: TileId) {
        let Some(tile) = self.tile(id) else {
            return;
        };
        let top = tile.base_y() - (self.viewport.y + self.layout.spacing);
        let bottom = top + self.tile_height;
        let view_height = self.layout.view_height(&self.viewport);

        let target = if top < self.scroll_y {
            top
        } else if bottom > self.scroll_y + view_height {
            bottom - view_height
        } else {
            self.scroll_y
        };
        self.scroll_y = target.clamp(0, self.max_scroll());
    }

    /// Resolves a click. A primary click on the thumb starts a scrollbar drag.
    pub fn click(&mut self, mouse_x: f64, mouse_y: f64, button: u32) -> GridClick {
        self.dragging_scrollbar = false;
        if button == BUTTON_PRIMARY
            && self.can_scroll()
            && self.scrollbar.thumb_contains(mouse_x, mouse_y, self.scroll_y)
        {
            self.dragging_scrollbar = true;
            return GridClick::Scrollbar;
        }

        let viewport_top = (self.viewport.y + self.layout.spacing) as f64;
        let viewport_bottom = (self.viewport.bottom() - self.layout.spacing) as f64;
        if mouse_y < viewport_top || mouse_y >= viewport_bottom {
            return GridClick::Nothing;
        }

        let scroll_y = self.scroll_y;
        self.tiles
            .iter_mut()
            .find_map(|tile| {
                tile.update_y(scroll_y);
                tile.rect()
                    .contains(mouse_x, mouse_y)
                    .then(|| tile.id())
            })
            .map_or(GridClick::Nothing, GridClick::Tile)
    }

    /// Moves the scroll offset along with a dragged thumb.
    pub fn drag_scrollbar(&mut self, delta_y: f64) -> bool {
        if !self.dragging_scrollbar || !self.can_scroll() {
            return false;
        }
        let delta = self.scrollbar.scroll_delta_for(delta_y);
        self.scroll_y = self.scroll_y.saturating_add(delta).clamp(0, self.max_scroll());
        true
    }

    pub fn is_dragging_scrollbar(&self) -> bool {
        self.dragging_scrollbar
    }

    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.dragging_scrollbar, false)
    }
}

impl Element for Grid {
    fn render(&mut self, surface: &mut dyn DrawSurface, mouse_x: f64, mouse_y: f64) {
        self.render_with_hover(surface, mouse_x, mouse_y, true);
    }

    fn mouse_scrolled(&mut self, _mouse_x: f64, _mouse_y: f64, amount: f64) -> bool {
        self.scroll(amount)
    }

    fn mouse_clicked(&mut self, mouse_x: f64, mouse_y: f64, button: u32) -> bool {
        self.click(mouse_x, mouse_y, button) != GridClick::Nothing
    }

    fn mouse_released(&mut self, _mouse_x: f64, _mouse_y: f64, _button: u32) -> bool {
        self.release()
    }

    fn mouse_dragged(&mut self, _mouse_x: f64, _mouse_y: f64, delta_y: f64) -> bool {
        self.drag_scrollbar(delta_y)
    }
}

impl Drop for Grid {
    fn drop(&mut self) {
        self.close();
    }
}
