/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && y >= self.y as f64
            && x < self.right() as f64
            && y < self.bottom() as f64
    }

    /// Returns the vertical slice of this rect that lies within `[top, bottom]`,
    /// or `None` when nothing is left.
    pub fn clip_vertical(&self, top: i32, bottom: i32) -> Option<Rect> {
        let y0 = self.y.max(top);
        let y1 = self.bottom().min(bottom);
        if y1 <= y0 || self.width <= 0 {
            return None;
        }
        Some(Rect::new(self.x, y0, self.width, y1 - y0))
    }
}

/// Packed `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Opaque color from a `0xRRGGBB` value; the high byte is ignored.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    pub fn rgb(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    pub fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }

    /// Components as `(r, g, b, a)` in `0.0..=1.0`, the form cairo expects.
    pub fn to_unit_rgba(self) -> (f64, f64, f64, f64) {
        (
            self.red() as f64 / 255.0,
            self.green() as f64 / 255.0,
            self.blue() as f64 / 255.0,
            self.alpha() as f64 / 255.0,
        )
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_rgb)
    }

    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.rgb())
    }
}
