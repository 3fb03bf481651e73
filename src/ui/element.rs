// Capabilities a host hands pointer input and frames to
// Unhandled events return false so the host can fall back to its own handling

use super::surface::DrawSurface;

/// Primary (left) mouse button, numbered the way GDK numbers buttons.
pub const BUTTON_PRIMARY: u32 = 1;
/// Secondary (right) mouse button.
pub const BUTTON_SECONDARY: u32 = 3;

pub trait Element {
    fn render(&mut self, surface: &mut dyn DrawSurface, mouse_x: f64, mouse_y: f64);

    fn mouse_scrolled(&mut self, _mouse_x: f64, _mouse_y: f64, _amount: f64) -> bool {
        false
    }

    fn mouse_clicked(&mut self, _mouse_x: f64, _mouse_y: f64, _button: u32) -> bool {
        false
    }

    fn mouse_released(&mut self, _mouse_x: f64, _mouse_y: f64, _button: u32) -> bool {
        false
    }

    /// Pointer moved by `delta_y` while a button is held.
    fn mouse_dragged(&mut self, _mouse_x: f64, _mouse_y: f64, _delta_y: f64) -> bool {
        false
    }
}
