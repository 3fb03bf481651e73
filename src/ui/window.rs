// Main window for the screenshot manager
// GTK4 ApplicationWindow with a single DrawingArea; all drawing goes through cairo

use gdk4::ModifierType;
use gtk4::cairo::{self, Context, FontSlant, FontWeight, Format, ImageSurface};
use gtk4::prelude::*;
use gtk4::{
    glib, Application, ApplicationWindow, DrawingArea, EventControllerKey, EventControllerMotion,
    EventControllerScroll, EventControllerScrollFlags, GestureClick,
};
use image::RgbaImage;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

use super::element::Element;
use super::keybindings::action_for_key;
use super::screen::ScreenshotScreen;
use super::surface::DrawSurface;
use crate::config::Config;
use crate::image_loader::DecodingLoader;
use crate::models::{Color, Rect};

const DEFAULT_WIDTH: i32 = 1000;
const DEFAULT_HEIGHT: i32 = 700;
const FONT_FAMILY: &str = "Sans";
const FONT_SIZE: f64 = 12.0;
const SHADOW_OFFSET: f64 = 1.0;
const SHADOW_COLOR: Color = Color::argb(0xC0, 0, 0, 0);

fn log_cairo(result: Result<(), cairo::Error>) {
    if let Err(err) = result {
        warn!(error = ?err, "Cairo drawing failed");
    }
}

/// `DrawSurface` over a cairo context handed to the draw function.
struct CairoSurface<'a> {
    cr: &'a Context,
}

impl<'a> CairoSurface<'a> {
    fn new(cr: &'a Context) -> Self {
        cr.select_font_face(FONT_FAMILY, FontSlant::Normal, FontWeight::Normal);
        cr.set_font_size(FONT_SIZE);
        Self { cr }
    }

    fn set_color(&self, color: Color) {
        let (r, g, b, a) = color.to_unit_rgba();
        self.cr.set_source_rgba(r, g, b, a);
    }

    fn show_text_at(&self, text: &str, x: f64, baseline: f64, color: Color) {
        self.set_color(color);
        self.cr.move_to(x, baseline);
        log_cairo(self.cr.show_text(text));
    }

    fn clipped<F: FnOnce(&Context) -> Result<(), cairo::Error>>(&self, clip: Rect, draw: F) {
        if clip.width <= 0 || clip.height <= 0 {
            return;
        }
        log_cairo(self.cr.save());
        self.cr.rectangle(
            clip.x as f64,
            clip.y as f64,
            clip.width as f64,
            clip.height as f64,
        );
        self.cr.clip();
        log_cairo(draw(self.cr));
        log_cairo(self.cr.restore());
    }
}

/// Converts RGBA pixels to cairo's premultiplied native-endian ARGB32.
fn to_cairo_surface(image: &RgbaImage) -> Result<ImageSurface, cairo::Error> {
    let width = image.width() as i32;
    let height = image.height() as i32;
    let stride = Format::ARgb32.stride_for_width(image.width())?;

    let mut data = vec![0u8; stride as usize * height as usize];
    for (y, row) in image.rows().enumerate() {
        let offset = y * stride as usize;
        for (x, pixel) in row.enumerate() {
            let [r, g, b, a] = pixel.0;
            let premultiply = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
            let argb = u32::from_be_bytes([a, premultiply(r), premultiply(g), premultiply(b)]);
            let at = offset + x * 4;
            data[at..at + 4].copy_from_slice(&argb.to_ne_bytes());
        }
    }

    ImageSurface::create_for_data(data, Format::ARgb32, width, height, stride)
}

impl DrawSurface for CairoSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.width <= 0 || rect.height <= 0 {
            return;
        }
        self.set_color(color);
        self.cr.rectangle(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
        log_cairo(self.cr.fill());
    }

    fn draw_centered_text(&mut self, text: &str, center_x: i32, y: i32, color: Color) {
        let width = match self.cr.text_extents(text) {
            Ok(extents) => extents.x_advance(),
            Err(err) => {
                warn!(error = ?err, "Failed to measure text");
                return;
            }
        };
        let x = center_x as f64 - width / 2.0;
        self.show_text_at(text, x, y as f64 + FONT_SIZE, color);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color, shadow: bool, clip: Rect) {
        let baseline = y as f64 + FONT_SIZE;
        self.clipped(clip, |_| {
            if shadow {
                self.show_text_at(
                    text,
                    x as f64 + SHADOW_OFFSET,
                    baseline + SHADOW_OFFSET,
                    SHADOW_COLOR,
                );
            }
            self.show_text_at(text, x as f64, baseline, color);
            Ok(())
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect, clip: Rect) {
        if image.width() == 0 || image.height() == 0 || dest.width <= 0 || dest.height <= 0 {
            return;
        }
        let source = match to_cairo_surface(image) {
            Ok(surface) => surface,
            Err(err) => {
                warn!(error = ?err, "Failed to create image surface");
                return;
            }
        };
        let scale_x = dest.width as f64 / image.width() as f64;
        let scale_y = dest.height as f64 / image.height() as f64;

        self.clipped(clip, |cr| {
            cr.translate(dest.x as f64, dest.y as f64);
            cr.scale(scale_x, scale_y);
            cr.set_source_surface(&source, 0.0, 0.0)?;
            cr.paint()
        });
    }
}

pub struct MainWindow {
    window: ApplicationWindow,
    area: DrawingArea,
    screen: Rc<RefCell<ScreenshotScreen>>,
    // Last pointer position in drawing area coordinates
    pointer: Rc<Cell<(f64, f64)>>,
}

impl MainWindow {
    pub fn new(app: &Application, screenshot_dir: &Path, config: Config) -> Rc<Self> {
        let window = ApplicationWindow::builder()
            .application(app)
            .title("Screenshots")
            .default_width(DEFAULT_WIDTH)
            .default_height(DEFAULT_HEIGHT)
            .build();

        let area = DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);
        area.set_focusable(true);
        window.set_child(Some(&area));

        let screen = ScreenshotScreen::new(
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            screenshot_dir.to_path_buf(),
            config,
            Rc::new(DecodingLoader),
        );

        let main_window = Rc::new(Self {
            window,
            area,
            screen: Rc::new(RefCell::new(screen)),
            pointer: Rc::new(Cell::new((-1.0, -1.0))),
        });

        main_window.setup_drawing();
        main_window.setup_pointer();
        main_window.setup_keyboard();
        main_window
    }

    pub fn present(&self) {
        self.window.present();
        self.area.grab_focus();
    }

    fn setup_drawing(&self) {
        let screen = self.screen.clone();
        let pointer = self.pointer.clone();
        self.area.set_draw_func(move |_area, cr, _width, _height| {
            let (x, y) = pointer.get();
            let mut surface = CairoSurface::new(cr);
            screen.borrow_mut().render(&mut surface, x, y);
        });

        let screen = self.screen.clone();
        self.area.connect_resize(move |area, width, height| {
            debug!(width, height, "Window resized");
            screen.borrow_mut().resize(width, height);
            area.queue_draw();
        });
    }

    fn setup_pointer(&self) {
        let motion = EventControllerMotion::new();
        let screen = self.screen.clone();
        let pointer = self.pointer.clone();
        let area = self.area.clone();
        motion.connect_motion(move |_, x, y| {
            let (_, last_y) = pointer.get();
            pointer.set((x, y));
            let mut screen = screen.borrow_mut();
            if screen.grid().is_dragging_scrollbar() {
                screen.mouse_dragged(x, y, y - last_y);
            }
            area.queue_draw();
        });
        let pointer = self.pointer.clone();
        let area = self.area.clone();
        motion.connect_leave(move |_| {
            pointer.set((-1.0, -1.0));
            area.queue_draw();
        });
        self.area.add_controller(motion);

        // Wheel: ctrl changes the column count
        let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
        let screen = self.screen.clone();
        let pointer = self.pointer.clone();
        let area = self.area.clone();
        scroll.connect_scroll(move |controller, _dx, dy| {
            if dy == 0.0 {
                return glib::Propagation::Proceed;
            }
            let ctrl = controller
                .current_event_state()
                .contains(ModifierType::CONTROL_MASK);
            let (x, y) = pointer.get();
            // GTK reports wheel-down as positive, the screen expects up as positive
            screen.borrow_mut().scroll(x, y, -dy, ctrl);
            area.queue_draw();
            glib::Propagation::Stop
        });
        self.area.add_controller(scroll);

        // Any button
        let click = GestureClick::new();
        click.set_button(0);
        let screen = self.screen.clone();
        let pointer = self.pointer.clone();
        let area = self.area.clone();
        click.connect_pressed(move |gesture, _n, x, y| {
            pointer.set((x, y));
            let button = gesture.current_button();
            screen.borrow_mut().mouse_clicked(x, y, button);
            area.queue_draw();
        });
        let screen = self.screen.clone();
        let area = self.area.clone();
        click.connect_released(move |gesture, _n, x, y| {
            let button = gesture.current_button();
            screen.borrow_mut().mouse_released(x, y, button);
            area.queue_draw();
        });
        self.area.add_controller(click);
    }

    fn setup_keyboard(&self) {
        let key_controller = EventControllerKey::new();
        let screen = self.screen.clone();
        let area = self.area.clone();
        key_controller.connect_key_pressed(move |_, key, _code, _state| {
            let Some(action) = action_for_key(key) else {
                return glib::Propagation::Proceed;
            };
            let handled = screen.borrow_mut().handle_key(action);
            area.queue_draw();
            if handled {
                glib::Propagation::Stop
            } else {
                glib::Propagation::Proceed
            }
        });
        self.window.add_controller(key_controller);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cairo_surface_is_premultiplied() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, image::Rgba([255, 255, 255, 128]));

        let mut surface = to_cairo_surface(&image).unwrap();
        assert_eq!(surface.width(), 2);
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let pixel = |x: usize| {
            let at = x * 4;
            u32::from_ne_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
        };
        assert!(stride >= 8);
        assert_eq!(pixel(0), 0xFFFF_0000);
        assert_eq!(pixel(1), 0x8080_8080);
    }
}
