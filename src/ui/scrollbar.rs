// Scrollbar geometry and drawing for the screenshot grid

use super::surface::DrawSurface;
use crate::layout::{SCROLLBAR_SPACING, SCROLLBAR_WIDTH};
use crate::models::{Color, Rect};

const TRACK_WIDTH: i32 = 2;
const TRACK_COLOR: Color = Color::WHITE;
const THUMB_COLOR: Color = Color::argb(0xFF, 0x1E, 0x1E, 0x1E);
const THUMB_HOVER_COLOR: Color = Color::argb(0xFF, 0x6D, 0x6D, 0x6D);

/// Maps a scroll offset to a thumb rectangle inside a vertical track.
///
/// Geometry is cached by `reposition`, which the grid calls whenever its
/// viewport, column count or tile count changes.
#[derive(Debug, Clone, Default)]
pub struct ScrollTrack {
    x: i32,
    thumb_height: i32,
    track_x: i32,
    track_y: i32,
    track_height: i32,
    // Track height widened by the scrollbar's own spacing on both ends
    scaled_track_height: i32,
    total_height: i32,
}

impl ScrollTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reposition(&mut self, viewport: &Rect, spacing: i32, total_height: i32) {
        self.x = viewport.right() - SCROLLBAR_SPACING - SCROLLBAR_WIDTH;
        self.track_x = self.x + SCROLLBAR_SPACING;
        self.track_y = viewport.y + spacing;
        self.track_height = (viewport.height - 2 * spacing).max(0);
        self.scaled_track_height = self.track_height + 2 * SCROLLBAR_SPACING;
        self.total_height = total_height.max(0);

        self.thumb_height = if self.total_height > 0 {
            let h = self.track_height as i64 * self.scaled_track_height as i64
                / self.total_height as i64;
            (h as i32).clamp(0, self.track_height)
        } else {
            0
        };
    }

    pub fn track_rect(&self) -> Rect {
        Rect::new(self.track_x, self.track_y, TRACK_WIDTH, self.track_height)
    }

    pub fn thumb_height(&self) -> i32 {
        self.thumb_height
    }

    /// Top of the thumb for scroll offset `scroll`, kept inside the track.
    pub fn thumb_y(&self, scroll: i32) -> i32 {
        if self.total_height <= 0 {
            return self.track_y;
        }
        let offset = (scroll as f32 * self.scaled_track_height as f32 / self.total_height as f32)
            .ceil() as i32;
        let lowest = self.track_y + (self.track_height - self.thumb_height).max(0);
        (offset + self.track_y).clamp(self.track_y, lowest)
    }

    pub fn thumb_rect(&self, scroll: i32) -> Rect {
        Rect::new(self.x, self.thumb_y(scroll), SCROLLBAR_WIDTH, self.thumb_height)
    }

    pub fn thumb_contains(&self, mouse_x: f64, mouse_y: f64, scroll: i32) -> bool {
        self.thumb_rect(scroll).contains(mouse_x, mouse_y)
    }

    /// Scroll offset change for moving the thumb by `pixel_delta`.
    pub fn scroll_delta_for(&self, pixel_delta: f64) -> i32 {
        if self.scaled_track_height <= 0 {
            return 0;
        }
        let delta = pixel_delta * self.total_height as f64 / self.scaled_track_height as f64;
        if delta >= 0.0 {
            delta.ceil() as i32
        } else {
            delta.floor() as i32
        }
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, mouse_x: f64, mouse_y: f64, scroll: i32) {
        surface.fill_rect(self.track_rect(), TRACK_COLOR);

        let thumb = self.thumb_rect(scroll);
        let color = if thumb.contains(mouse_x, mouse_y) {
            THUMB_HOVER_COLOR
        } else {
            THUMB_COLOR
        };
        surface.fill_rect(thumb, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::surface::recording::{DrawOp, RecordingSurface};

    fn track() -> ScrollTrack {
        let mut track = ScrollTrack::new();
        track.reposition(&Rect::new(0, 0, 460, 400), 4, 516);
        track
    }

    #[test]
    fn test_reposition_geometry() {
        let track = track();
        assert_eq!(track.track_rect(), Rect::new(454, 4, 2, 392));
        // 392 * 396 / 516
        assert_eq!(track.thumb_height(), 300);
        assert_eq!(track.thumb_y(0), 4);
        assert_eq!(track.thumb_rect(0).x, 452);
    }

    #[test]
    fn test_thumb_stays_in_track() {
        for total in [393, 400, 516, 1_000, 25_000] {
            let mut track = ScrollTrack::new();
            let viewport = Rect::new(0, 30, 460, 400);
            track.reposition(&viewport, 4, total);
            let track_rect = track.track_rect();
            let max_scroll = total - (viewport.height - 8);

            for scroll in 0..=max_scroll {
                let thumb = track.thumb_rect(scroll);
                assert!(thumb.y >= track_rect.y, "total {} scroll {}", total, scroll);
                assert!(
                    thumb.bottom() <= track_rect.bottom(),
                    "total {} scroll {}",
                    total,
                    scroll
                );
            }
        }
    }

    #[test]
    fn test_thumb_moves_monotonically() {
        let track = track();
        let mut last = track.thumb_y(0);
        for scroll in 1..=124 {
            let y = track.thumb_y(scroll);
            assert!(y >= last);
            last = y;
        }
        assert!(last > track.thumb_y(0));
    }

    #[test]
    fn test_zero_total_is_guarded() {
        let mut track = ScrollTrack::new();
        track.reposition(&Rect::new(0, 0, 460, 400), 4, 0);
        assert_eq!(track.thumb_height(), 0);
        assert_eq!(track.thumb_y(50), 4);
    }

    #[test]
    fn test_scroll_delta_for_drag() {
        let track = track();
        // 396 track pixels cover 516 content pixels
        assert_eq!(track.scroll_delta_for(0.0), 0);
        assert_eq!(track.scroll_delta_for(10.0), 14);
        assert_eq!(track.scroll_delta_for(-10.0), -14);
        assert_eq!(track.scroll_delta_for(1e300), i32::MAX);
        assert_eq!(track.scroll_delta_for(-1e300), i32::MIN);
    }

    #[test]
    fn test_render_highlights_hovered_thumb() {
        let track = track();
        let mut surface = RecordingSurface::new();

        track.render(&mut surface, 0.0, 0.0, 0);
        assert_eq!(surface.ops[0], DrawOp::Fill(track.track_rect(), TRACK_COLOR));
        assert_eq!(surface.ops[1], DrawOp::Fill(track.thumb_rect(0), THUMB_COLOR));

        surface.clear();
        track.render(&mut surface, 455.0, 10.0, 0);
        assert_eq!(
            surface.ops[1],
            DrawOp::Fill(track.thumb_rect(0), THUMB_HOVER_COLOR)
        );
    }
}
