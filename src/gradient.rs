use anyhow::Result;
use image::{Rgb, RgbImage};
use std::str::FromStr;

/// `#6366f1`
pub const START_COLOR: Rgb<u8> = Rgb([99, 102, 241]);
/// `#4f46e5`
pub const END_COLOR: Rgb<u8> = Rgb([79, 70, 229]);

/// Vertical two-color gradient used as the icon background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub start: Rgb<u8>,
    pub end: Rgb<u8>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new(START_COLOR, END_COLOR)
    }
}

impl Gradient {
    pub fn new(start: Rgb<u8>, end: Rgb<u8>) -> Self {
        Self { start, end }
    }

    /// Build a gradient from two CSS color strings (e.g. "#6366f1", "rebeccapurple")
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_color(start)?, parse_color(end)?))
    }

    /// Color of row `y` on a canvas `size` rows tall.
    /// Each channel is interpolated linearly and truncated, not rounded.
    pub fn color_at(&self, y: u32, size: u32) -> Rgb<u8> {
        let mut channels = [0u8; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            *channel = lerp_channel(self.start[i], self.end[i], y, size);
        }
        Rgb(channels)
    }

    /// Fill every row of the canvas with its flat gradient color
    pub fn fill(&self, canvas: &mut RgbImage) {
        let size = canvas.height();
        for (y, row) in canvas.rows_mut().enumerate() {
            let color = self.color_at(y as u32, size);
            for pixel in row {
                *pixel = color;
            }
        }
    }
}

fn lerp_channel(start: u8, end: u8, y: u32, size: u32) -> u8 {
    if size == 0 {
        return start;
    }
    let delta = (i64::from(end) - i64::from(start)) * i64::from(y);
    let value = f64::from(start) + delta as f64 / f64::from(size);
    value.clamp(0.0, 255.0) as u8
}

/// Parse a CSS color into an opaque RGB triple
pub fn parse_color(value: &str) -> Result<Rgb<u8>> {
    let color = css_color::Srgb::from_str(value)
        .map_err(|_| anyhow::anyhow!("Invalid color: {value} (expected a CSS color)"))?;

    Ok(Rgb([
        (color.red * 255.).round() as u8,
        (color.green * 255.).round() as u8,
        (color.blue * 255.).round() as u8,
    ]))
}
