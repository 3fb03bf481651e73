// Drawing surface the grid renders through
// The GTK window implements it on top of cairo; tests record the calls

use image::RgbaImage;

use crate::models::{Color, Rect};

/// Immediate-mode drawing primitives. Every call draws synchronously.
pub trait DrawSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws `text` horizontally centered on `center_x` with its top at `y`.
    fn draw_centered_text(&mut self, text: &str, center_x: i32, y: i32, color: Color);

    /// Draws `text` with its top-left corner at `(x, y)`, clipped to `clip`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color, shadow: bool, clip: Rect);

    /// Scales `image` into `dest`, showing only the part inside `clip`.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect, clip: Rect);
}

#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Fill(Rect, Color),
        CenteredText(String, i32, i32),
        Text(String, i32, i32),
        Image(Rect, Rect),
    }

    /// Surface that remembers what was drawn.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn clear(&mut self) {
            self.ops.clear();
        }

        pub fn images(&self) -> Vec<Rect> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Image(dest, _) => Some(*dest),
                    _ => None,
                })
                .collect()
        }

        pub fn fills_with(&self, color: Color) -> Vec<Rect> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Fill(rect, c) if *c == color => Some(*rect),
                    _ => None,
                })
                .collect()
        }

        pub fn has_centered_text(&self, needle: &str) -> bool {
            self.ops
                .iter()
                .any(|op| matches!(op, DrawOp::CenteredText(text, _, _) if text.contains(needle)))
        }
    }

    impl DrawSurface for RecordingSurface {
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(DrawOp::Fill(rect, color));
        }

        fn draw_centered_text(&mut self, text: &str, center_x: i32, y: i32, _color: Color) {
            self.ops
                .push(DrawOp::CenteredText(text.to_string(), center_x, y));
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32, _color: Color, _shadow: bool, _clip: Rect) {
            self.ops.push(DrawOp::Text(text.to_string(), x, y));
        }

        fn draw_image(&mut self, _image: &RgbaImage, dest: Rect, clip: Rect) {
            self.ops.push(DrawOp::Image(dest, clip));
        }
    }
}
