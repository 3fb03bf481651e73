// Screenshot manager screen
// Hosts the grid and decides what input means: ctrl+scroll resizes columns,
// plain scroll moves the list. Also owns the enlarged preview and deletion.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::RgbaImage;
use tracing::{info, warn};

use super::element::{Element, BUTTON_PRIMARY, BUTTON_SECONDARY};
use super::grid::{Grid, GridClick};
use super::keybindings::KeyAction;
use super::surface::DrawSurface;
use super::tile::{fit_centered, Direction, TileId};
use crate::config::{Config, GridConfig, LIST_INVERTED_ORDER, PROMPT_WHEN_DELETING_SCREENSHOT};
use crate::image_loader::ThumbnailLoader;
use crate::models::{Color, Rect};
use crate::scanner::scan_screenshots;

const MARGIN: i32 = 10;
const HEADER_HEIGHT: i32 = 30;
const FOOTER_HEIGHT: i32 = 24;

const SCREEN_BACKGROUND: Color = Color::argb(0xFF, 0x10, 0x10, 0x10);
const PREVIEW_BACKGROUND: Color = Color::argb(0xE0, 0, 0, 0);
const TITLE_COLOR: Color = Color::WHITE;
const STATUS_COLOR: Color = Color::argb(0xFF, 0xC0, 0xC0, 0xC0);
const WARNING_COLOR: Color = Color::argb(0xFF, 0xFF, 0x55, 0x55);

struct Preview {
    id: TileId,
    image: Option<RgbaImage>,
    failed: bool,
}

impl Preview {
    fn new(id: TileId) -> Self {
        Self {
            id,
            image: None,
            failed: false,
        }
    }
}

pub struct ScreenshotScreen {
    grid: Grid,
    config: Config,
    screenshot_dir: PathBuf,
    loader: Rc<dyn ThumbnailLoader>,
    width: i32,
    height: i32,
    preview: Option<Preview>,
    pending_delete: Option<TileId>,
    status: Option<String>,
}

fn grid_viewport(width: i32, height: i32) -> Rect {
    Rect::new(
        MARGIN,
        HEADER_HEIGHT,
        (width - 2 * MARGIN).max(0),
        (height - HEADER_HEIGHT - FOOTER_HEIGHT).max(0),
    )
}

fn window_aspect(width: i32, height: i32) -> f32 {
    if height <= 0 {
        return 1.0;
    }
    width as f32 / height as f32
}

impl ScreenshotScreen {
    pub fn new(
        width: i32,
        height: i32,
        screenshot_dir: PathBuf,
        config: Config,
        loader: Rc<dyn ThumbnailLoader>,
    ) -> Self {
        let grid = Grid::new(
            grid_viewport(width, height),
            window_aspect(width, height),
            GridConfig::from_config(&config),
            loader.clone(),
        );
        let mut screen = Self {
            grid,
            config,
            screenshot_dir,
            loader,
            width,
            height,
            preview: None,
            pending_delete: None,
            status: None,
        };
        screen.init();
        screen
    }

    /// Rescans the screenshot directory and rebuilds the grid.
    pub fn init(&mut self) {
        self.close_preview();
        self.pending_delete = None;
        let files = scan_screenshots(&self.screenshot_dir);
        self.grid.init(files);
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        if let Some(preview) = &mut self.preview {
            // Decoded for the old size
            preview.image = None;
            preview.failed = false;
        }
        self.grid
            .update_size(grid_viewport(width, height), window_aspect(width, height));
    }

    /// Replaces the configuration and pushes the grid options down.
    pub fn on_config_update(&mut self, config: Config) {
        self.config = config;
        self.grid
            .on_config_update(GridConfig::from_config(&self.config));
    }

    /// Re-reads the config file, keeping the current values when it fails.
    pub fn reload_config(&mut self) {
        let Some(path) = self.config.path().map(Path::to_path_buf) else {
            return;
        };
        match Config::load(&path) {
            Ok(config) => self.on_config_update(config),
            Err(err) => warn!(error = ?err, "Failed to reload config"),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn previewed(&self) -> Option<TileId> {
        self.preview.as_ref().map(|p| p.id)
    }

    pub fn pending_delete(&self) -> Option<TileId> {
        self.pending_delete
    }

    /// Routes a wheel event: with ctrl held it changes the column count,
    /// otherwise it scrolls the list.
    pub fn scroll(&mut self, mouse_x: f64, mouse_y: f64, amount: f64, ctrl: bool) -> bool {
        if self.preview.is_some() {
            return false;
        }
        if ctrl {
            self.grid.update_screenshots_per_row(amount);
            return true;
        }
        self.grid.mouse_scrolled(mouse_x, mouse_y, amount)
    }

    pub fn handle_key(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Close => {
                if self.pending_delete.take().is_some() {
                    self.status = None;
                    true
                } else if self.preview.is_some() {
                    self.close_preview();
                    true
                } else {
                    false
                }
            }
            KeyAction::OpenPreview => match self.grid.hovered() {
                Some(id) if self.preview.is_none() => {
                    self.open_preview(id);
                    true
                }
                _ => false,
            },
            KeyAction::Navigate(direction) => self.navigate(direction),
            KeyAction::InvertOrder => {
                self.invert_order();
                true
            }
            KeyAction::Rescan => {
                self.reload_config();
                self.init();
                self.status = Some(format!("Found {} screenshots", self.grid.len()));
                true
            }
            KeyAction::Delete => {
                let target = self
                    .pending_delete
                    .or_else(|| self.previewed())
                    .or_else(|| self.grid.hovered());
                match target {
                    Some(id) => {
                        self.request_delete(id);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Flips the list order and remembers the choice in the config file.
    pub fn invert_order(&mut self) {
        self.grid.invert_order();
        let inverted = self.grid.is_inverted_order();
        self.config.set(&LIST_INVERTED_ORDER, inverted);
        if self.config.path().is_some() {
            if let Err(err) = self.config.save() {
                warn!(error = ?err, "Failed to save list order");
            }
        }
    }

    pub fn open_preview(&mut self, id: TileId) {
        if self.grid.tile(id).is_none() {
            return;
        }
        self.preview = Some(Preview::new(id));
        self.grid.scroll_to_tile(id);
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    /// Moves the preview to the neighboring screenshot.
    fn navigate(&mut self, direction: Direction) -> bool {
        let Some(current) = self.previewed() else {
            return false;
        };
        let next = self.grid.context().neighbor(current, direction);
        match next {
            Some(id) => {
                self.open_preview(id);
                true
            }
            None => false,
        }
    }

    /// Deletes right away, or asks first when the config says to.
    pub fn request_delete(&mut self, id: TileId) {
        let Some(tile) = self.grid.tile(id) else {
            return;
        };
        let name = tile.file().file_name();

        if self.pending_delete == Some(id) || !self.config.get(&PROMPT_WHEN_DELETING_SCREENSHOT) {
            self.pending_delete = None;
            self.delete_now(id);
            return;
        }

        self.pending_delete = Some(id);
        self.status = Some(format!(
            "Delete {}? Press Delete again to confirm, Escape to cancel",
            name
        ));
    }

    fn delete_now(&mut self, id: TileId) {
        let Some(tile) = self.grid.tile(id) else {
            return;
        };
        let path = tile.file().path.clone();
        let name = tile.file().file_name();
        let next_preview = self.previewed().filter(|&p| p == id).and_then(|_| {
            let context = self.grid.context();
            context
                .neighbor(id, Direction::Right)
                .or_else(|| context.neighbor(id, Direction::Left))
        });

        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted screenshot {}", path.display());
                self.grid.remove_entry(id);
                self.status = Some(format!("Deleted {}", name));
                if self.previewed() == Some(id) {
                    self.preview = None;
                    if let Some(next) = next_preview {
                        self.open_preview(next);
                    }
                }
            }
            Err(err) => {
                warn!(error = ?err, "Failed to delete screenshot");
                self.status = Some(format!("Failed to delete {}", name));
            }
        }
    }

    fn preview_area(&self) -> Rect {
        let viewport = self.grid.viewport();
        Rect::new(
            viewport.x + MARGIN,
            viewport.y + MARGIN,
            (viewport.width - 2 * MARGIN).max(0),
            (viewport.height - 2 * MARGIN).max(0),
        )
    }

    fn render_preview(&mut self, surface: &mut dyn DrawSurface) {
        let area = self.preview_area();
        let viewport = self.grid.viewport();
        let Some(preview) = &mut self.preview else {
            return;
        };
        let Some(tile) = self.grid.tile(preview.id) else {
            self.preview = None;
            return;
        };

        surface.fill_rect(viewport, PREVIEW_BACKGROUND);

        if preview.image.is_none() && !preview.failed && area.width > 0 && area.height > 0 {
            match self
                .loader
                .load(&tile.file().path, area.width as u32, area.height as u32)
            {
                Ok(image) => preview.image = Some(image),
                Err(err) => {
                    warn!(error = ?err, "Failed to load screenshot preview");
                    preview.failed = true;
                }
            }
        }

        match &preview.image {
            Some(image) => {
                let dest = fit_centered(image.width(), image.height(), area);
                surface.draw_image(image, dest, area);
            }
            None => surface.draw_centered_text(
                "Could not load screenshot",
                area.x + area.width / 2,
                area.y + area.height / 2,
                WARNING_COLOR,
            ),
        }
        let label = format!("{} ({})", tile.file().file_name(), tile.file().size_label());
        surface.draw_text(
            &label,
            area.x,
            area.bottom() - 10,
            TITLE_COLOR,
            true,
            viewport,
        );
    }
}

impl Element for ScreenshotScreen {
    fn render(&mut self, surface: &mut dyn DrawSurface, mouse_x: f64, mouse_y: f64) {
        surface.fill_rect(Rect::new(0, 0, self.width, self.height), SCREEN_BACKGROUND);

        let mut title = format!("Screenshots ({})", self.grid.len());
        if self.grid.is_inverted_order() {
            title.push_str(" - newest first");
        }
        surface.draw_centered_text(&title, self.width / 2, MARGIN, TITLE_COLOR);

        let covered = self.preview.is_some() || self.pending_delete.is_some();
        self.grid
            .render_with_hover(surface, mouse_x, mouse_y, !covered);

        if self.preview.is_some() {
            self.render_preview(surface);
        }

        if let Some(status) = &self.status {
            let color = if self.pending_delete.is_some() {
                WARNING_COLOR
            } else {
                STATUS_COLOR
            };
            surface.draw_centered_text(status, self.width / 2, self.height - FOOTER_HEIGHT + 6, color);
        }
    }

    fn mouse_scrolled(&mut self, mouse_x: f64, mouse_y: f64, amount: f64) -> bool {
        self.scroll(mouse_x, mouse_y, amount, false)
    }

    /// Primary click opens a screenshot, secondary click asks to delete it.
    /// Any click while the preview is open closes it. While a delete waits for
    /// confirmation, a secondary click on that screenshot confirms and any
    /// other click cancels.
    fn mouse_clicked(&mut self, mouse_x: f64, mouse_y: f64, button: u32) -> bool {
        if self.preview.is_some() {
            self.close_preview();
            return true;
        }
        if let Some(pending) = self.pending_delete {
            match self.grid.click(mouse_x, mouse_y, button) {
                GridClick::Tile(id) if id == pending && button == BUTTON_SECONDARY => {
                    self.request_delete(id);
                }
                _ => {
                    self.pending_delete = None;
                    self.status = None;
                }
            }
            return true;
        }

        match self.grid.click(mouse_x, mouse_y, button) {
            GridClick::Scrollbar => true,
            GridClick::Tile(id) if button == BUTTON_PRIMARY => {
                self.open_preview(id);
                true
            }
            GridClick::Tile(id) if button == BUTTON_SECONDARY => {
                self.request_delete(id);
                true
            }
            _ => false,
        }
    }

    fn mouse_released(&mut self, mouse_x: f64, mouse_y: f64, button: u32) -> bool {
        self.grid.mouse_released(mouse_x, mouse_y, button)
    }

    fn mouse_dragged(&mut self, mouse_x: f64, mouse_y: f64, delta_y: f64) -> bool {
        self.grid.mouse_dragged(mouse_x, mouse_y, delta_y)
    }
}

impl Drop for ScreenshotScreen {
    fn drop(&mut self) {
        self.close_preview();
        self.grid.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::INITIAL_SCREENSHOT_AMOUNT_PER_ROW;
    use crate::ui::surface::recording::{DrawOp, RecordingSurface};
    use std::fs::File;
    use tempfile::{tempdir, TempDir};

    struct BlankLoader;

    impl ThumbnailLoader for BlankLoader {
        fn load(&self, _path: &Path, max_width: u32, max_height: u32) -> anyhow::Result<RgbaImage> {
            Ok(RgbaImage::new(max_width.min(8), max_height.min(8)))
        }
    }

    fn shots_dir(count: usize) -> TempDir {
        let dir = tempdir().unwrap();
        for i in 0..count {
            File::create(dir.path().join(format!("shot_{:02}.png", i))).unwrap();
        }
        dir
    }

    fn make_screen(dir: &TempDir, config: Config) -> ScreenshotScreen {
        ScreenshotScreen::new(
            800,
            600,
            dir.path().to_path_buf(),
            config,
            Rc::new(BlankLoader),
        )
    }

    fn no_prompt_config() -> Config {
        let mut config = Config::empty();
        config.set(&PROMPT_WHEN_DELETING_SCREENSHOT, false);
        config
    }

    #[test]
    fn test_new_scans_directory() {
        let dir = shots_dir(5);
        let screen = make_screen(&dir, Config::empty());
        assert_eq!(screen.grid().len(), 5);
        assert_eq!(screen.grid().viewport(), Rect::new(10, 30, 780, 546));
    }

    #[test]
    fn test_missing_directory_gives_empty_grid() {
        let dir = tempdir().unwrap();
        let screen = ScreenshotScreen::new(
            800,
            600,
            dir.path().join("nope"),
            Config::empty(),
            Rc::new(BlankLoader),
        );
        assert!(screen.grid().is_empty());
    }

    #[test]
    fn test_ctrl_scroll_changes_columns() {
        let dir = shots_dir(30);
        let mut screen = make_screen(&dir, Config::empty());
        assert_eq!(screen.grid().columns(), 4);

        assert!(screen.scroll(100.0, 100.0, 1.0, true));
        assert_eq!(screen.grid().columns(), 5);
        assert_eq!(screen.grid().scroll_y(), 0);

        assert!(screen.scroll(100.0, 100.0, -1.0, false));
        assert!(screen.grid().scroll_y() > 0);
        assert_eq!(screen.grid().columns(), 5);
    }

    #[test]
    fn test_delete_without_prompt_removes_file() {
        let dir = shots_dir(3);
        let mut screen = make_screen(&dir, no_prompt_config());
        let id = screen.grid().get(0).unwrap().id();
        let path = screen.grid().get(0).unwrap().file().path.clone();

        screen.request_delete(id);
        assert!(!path.exists());
        assert_eq!(screen.grid().len(), 2);
        assert_eq!(screen.status(), Some("Deleted shot_00.png"));
    }

    #[test]
    fn test_delete_with_prompt_needs_confirmation() {
        let dir = shots_dir(3);
        let mut screen = make_screen(&dir, Config::empty());
        let id = screen.grid().get(1).unwrap().id();
        let path = screen.grid().get(1).unwrap().file().path.clone();

        let rect = screen.grid().get(1).unwrap().rect();
        let (x, y) = ((rect.x + 5) as f64, (rect.y + 5) as f64);
        let mut surface = RecordingSurface::new();

        screen.render(&mut surface, x, y);
        assert!(screen.handle_key(KeyAction::Delete));
        assert_eq!(screen.pending_delete(), Some(id));
        assert!(path.exists());

        // Escape cancels
        assert!(screen.handle_key(KeyAction::Close));
        assert_eq!(screen.pending_delete(), None);
        assert!(path.exists());

        screen.render(&mut surface, x, y);
        assert!(screen.handle_key(KeyAction::Delete));
        // Hover is suspended while the confirmation shows
        screen.render(&mut surface, x, y);
        assert_eq!(screen.grid().hovered(), None);
        assert!(screen.handle_key(KeyAction::Delete));
        assert!(!path.exists());
        assert_eq!(screen.grid().len(), 2);
        assert_eq!(screen.pending_delete(), None);
    }

    #[test]
    fn test_secondary_click_confirms_pending_delete() {
        let dir = shots_dir(3);
        let mut screen = make_screen(&dir, Config::empty());
        let first = screen.grid().get(0).unwrap();
        let (id, rect) = (first.id(), first.rect());
        let path = first.file().path.clone();
        let (x, y) = ((rect.x + 5) as f64, (rect.y + 5) as f64);
        let mut surface = RecordingSurface::new();

        assert!(screen.mouse_clicked(x, y, BUTTON_SECONDARY));
        assert_eq!(screen.pending_delete(), Some(id));

        // A primary click elsewhere cancels
        screen.render(&mut surface, x, y);
        assert!(screen.mouse_clicked(x, y, BUTTON_PRIMARY));
        assert_eq!(screen.pending_delete(), None);
        assert_eq!(screen.previewed(), None);
        assert!(path.exists());

        assert!(screen.mouse_clicked(x, y, BUTTON_SECONDARY));
        screen.render(&mut surface, x, y);
        assert!(screen.mouse_clicked(x, y, BUTTON_SECONDARY));
        assert!(!path.exists());
        assert_eq!(screen.grid().len(), 2);
    }

    #[test]
    fn test_failed_delete_keeps_tile() {
        let dir = shots_dir(2);
        let mut screen = make_screen(&dir, no_prompt_config());
        let id = screen.grid().get(0).unwrap().id();
        std::fs::remove_file(&screen.grid().get(0).unwrap().file().path).unwrap();

        screen.request_delete(id);
        assert_eq!(screen.grid().len(), 2);
        assert_eq!(screen.status(), Some("Failed to delete shot_00.png"));
    }

    #[test]
    fn test_preview_navigation() {
        let dir = shots_dir(10);
        let mut screen = make_screen(&dir, Config::empty());
        let first = screen.grid().get(0).unwrap().id();

        assert!(!screen.handle_key(KeyAction::Navigate(Direction::Right)));
        screen.open_preview(first);
        assert!(screen.handle_key(KeyAction::Navigate(Direction::Right)));
        assert_eq!(screen.previewed(), screen.grid().get(1).map(|t| t.id()));
        assert!(screen.handle_key(KeyAction::Navigate(Direction::Down)));
        assert_eq!(screen.previewed(), screen.grid().get(5).map(|t| t.id()));

        assert!(screen.handle_key(KeyAction::Close));
        assert_eq!(screen.previewed(), None);
    }

    #[test]
    fn test_deleting_previewed_moves_to_next() {
        let dir = shots_dir(3);
        let mut screen = make_screen(&dir, no_prompt_config());
        let first = screen.grid().get(0).unwrap().id();
        let second = screen.grid().get(1).unwrap().id();

        screen.open_preview(first);
        assert!(screen.handle_key(KeyAction::Delete));
        assert_eq!(screen.previewed(), Some(second));
    }

    #[test]
    fn test_preview_suspends_hover_and_scroll() {
        let dir = shots_dir(30);
        let mut screen = make_screen(&dir, Config::empty());
        let mut surface = RecordingSurface::new();

        screen.render(&mut surface, 30.0, 50.0);
        let hovered = screen.grid().hovered();
        assert!(hovered.is_some());
        assert!(screen.handle_key(KeyAction::OpenPreview));
        assert_eq!(screen.previewed(), hovered);

        surface.clear();
        screen.render(&mut surface, 30.0, 50.0);
        assert_eq!(screen.grid().hovered(), None);
        assert!(!surface.images().is_empty());
        assert!(!screen.scroll(30.0, 50.0, -1.0, false));

        // Any click closes the preview
        assert!(screen.mouse_clicked(30.0, 50.0, BUTTON_PRIMARY));
        assert_eq!(screen.previewed(), None);
    }

    #[test]
    fn test_preview_label_shows_file_size() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("big.png"), vec![0u8; 2048]).unwrap();
        let mut screen = make_screen(&dir, Config::empty());
        let id = screen.grid().get(0).unwrap().id();
        let mut surface = RecordingSurface::new();

        screen.open_preview(id);
        screen.render(&mut surface, -1.0, -1.0);
        assert!(surface
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Text(text, _, _) if text == "big.png (2.0 KiB)")));
    }

    #[test]
    fn test_click_opens_preview() {
        let dir = shots_dir(4);
        let mut screen = make_screen(&dir, Config::empty());
        let tile = screen.grid().get(0).unwrap();
        let rect = tile.rect();
        let id = tile.id();

        assert!(screen.mouse_clicked((rect.x + 5) as f64, (rect.y + 5) as f64, BUTTON_PRIMARY));
        assert_eq!(screen.previewed(), Some(id));
    }

    #[test]
    fn test_invert_order_persists() {
        let dir = shots_dir(3);
        let config_dir = tempdir().unwrap();
        let config_path = config_dir.path().join("config.toml");
        let config = Config::load(&config_path).unwrap();
        let mut screen = make_screen(&dir, config);

        assert!(screen.handle_key(KeyAction::InvertOrder));
        assert!(screen.grid().is_inverted_order());
        assert_eq!(screen.grid().get(0).unwrap().file().file_name(), "shot_02.png");

        let reloaded = Config::load(&config_path).unwrap();
        assert!(reloaded.get(&LIST_INVERTED_ORDER));
    }

    #[test]
    fn test_rescan_picks_up_new_files() {
        let dir = shots_dir(2);
        let mut screen = make_screen(&dir, Config::empty());
        File::create(dir.path().join("shot_99.png")).unwrap();

        assert!(screen.handle_key(KeyAction::Rescan));
        assert_eq!(screen.grid().len(), 3);
        assert_eq!(screen.status(), Some("Found 3 screenshots"));
    }

    #[test]
    fn test_config_update_reaches_grid() {
        let dir = shots_dir(2);
        let mut screen = make_screen(&dir, Config::empty());
        let mut config = Config::empty();
        config.set(&INITIAL_SCREENSHOT_AMOUNT_PER_ROW, 7);

        screen.on_config_update(config);
        assert_eq!(screen.grid().columns(), 7);
    }

    #[test]
    fn test_rescan_reloads_config_file() {
        let dir = shots_dir(2);
        let config_dir = tempdir().unwrap();
        let config_path = config_dir.path().join("config.toml");
        let mut screen = make_screen(&dir, Config::load(&config_path).unwrap());
        assert_eq!(screen.grid().columns(), 4);

        std::fs::write(&config_path, "initial_screenshot_amount_per_row = 6\n").unwrap();
        assert!(screen.handle_key(KeyAction::Rescan));
        assert_eq!(screen.grid().columns(), 6);
    }

    #[test]
    fn test_resize_relayouts_grid() {
        let dir = shots_dir(2);
        let mut screen = make_screen(&dir, Config::empty());
        screen.resize(1000, 700);
        assert_eq!(screen.grid().viewport(), Rect::new(10, 30, 980, 646));
    }
}
