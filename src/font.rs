//! Fonts for the icon labels
//!
//! Text is drawn with a TrueType/OpenType font loaded from disk when one is
//! available. When the file is missing or unreadable a small built-in 5x7
//! bitmap font takes its place, scaled by an integer factor to roughly the
//! requested pixel size.
//!
//! Both variants share the same measuring convention: bounds are the ink box
//! of the rendered text relative to the draw origin, and the draw origin is the
//! top-left corner of the line box (the ascent line, not the ink).

use anyhow::{Context, Result};
use image::{Rgba, RgbImage};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::Path;

/// Bold system font used when no other font is configured
pub const DEFAULT_FONT_PATH: &str = "/System/Library/Fonts/Helvetica.ttc";

const GLYPH_WIDTH: i32 = 5;
const GLYPH_HEIGHT: i32 = 7;
const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;
// 7 rows of ink plus leading, in glyph units
const BUILTIN_EM: u32 = GLYPH_HEIGHT as u32 + 2;

/// Ink bounding box of a text run, relative to its draw origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    fn union(self, other: TextBounds) -> TextBounds {
        TextBounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

pub enum LabelFont {
    TrueType(Font<'static>),
    Builtin,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::TrueType(_) => f.write_str("LabelFont::TrueType"),
            LabelFont::Builtin => f.write_str("LabelFont::Builtin"),
        }
    }
}

impl LabelFont {
    /// Load the first face of a font file (.ttf, .otf or .ttc collection)
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        let font = Font::try_from_vec_and_index(data, 0)
            .with_context(|| format!("Failed to parse font file: {}", path.display()))?;
        Ok(LabelFont::TrueType(font))
    }

    /// Load the font at `path`, falling back to the built-in bitmap font
    pub fn load_or_builtin(path: &Path) -> Self {
        Self::load(path).unwrap_or(LabelFont::Builtin)
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, LabelFont::Builtin)
    }

    /// Measure the ink box of `text` at a pixel size of `px`
    pub fn measure(&self, text: &str, px: u32) -> TextBounds {
        if px == 0 {
            return TextBounds::default();
        }

        match self {
            LabelFont::TrueType(font) => layout(font, text, px)
                .iter()
                .filter_map(|glyph| glyph.pixel_bounding_box())
                .map(|bb| TextBounds {
                    left: bb.min.x,
                    top: bb.min.y,
                    right: bb.max.x,
                    bottom: bb.max.y,
                })
                .reduce(TextBounds::union)
                .unwrap_or_default(),
            LabelFont::Builtin => {
                let scale = builtin_scale(px);
                builtin_cells(text)
                    .map(|(x, y)| TextBounds {
                        left: x * scale,
                        top: y * scale,
                        right: (x + 1) * scale,
                        bottom: (y + 1) * scale,
                    })
                    .reduce(TextBounds::union)
                    .unwrap_or_default()
            }
        }
    }

    /// Draw `text` with its line box at `origin`, alpha-blending `color`
    /// over the canvas. Pixels falling outside the canvas are clipped.
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        origin: (i32, i32),
        text: &str,
        px: u32,
        color: Rgba<u8>,
    ) {
        if px == 0 {
            return;
        }

        let (ox, oy) = origin;
        match self {
            LabelFont::TrueType(font) => {
                for glyph in layout(font, text, px) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            let x = ox + bb.min.x + gx as i32;
                            let y = oy + bb.min.y + gy as i32;
                            blend_pixel(canvas, x, y, color, coverage);
                        });
                    }
                }
            }
            LabelFont::Builtin => {
                let scale = builtin_scale(px);
                for (cx, cy) in builtin_cells(text) {
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let x = ox + cx * scale + dx;
                            let y = oy + cy * scale + dy;
                            blend_pixel(canvas, x, y, color, 1.0);
                        }
                    }
                }
            }
        }
    }
}

/// Scale for a font size given in pixels per em
fn em_scale(font: &Font<'_>, px: u32) -> Scale {
    let metrics = font.v_metrics_unscaled();
    let units_per_em = f32::from(font.units_per_em());
    Scale::uniform(px as f32 * (metrics.ascent - metrics.descent) / units_per_em)
}

fn layout<'f>(font: &'f Font<'static>, text: &str, px: u32) -> Vec<PositionedGlyph<'f>> {
    let scale = em_scale(font, px);
    let ascent = font.v_metrics(scale).ascent;
    font.layout(text, scale, point(0.0, ascent)).collect()
}

fn blend_pixel(canvas: &mut RgbImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }

    let alpha = (coverage * f32::from(color[3]) / 255.0).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let src = f32::from(color[c]);
        let dst = f32::from(pixel[c]);
        pixel[c] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
    }
}

fn builtin_scale(px: u32) -> i32 {
    (px / BUILTIN_EM).max(1) as i32
}

/// Lit cells of the built-in font for `text`, in glyph units from the origin
fn builtin_cells(text: &str) -> impl Iterator<Item = (i32, i32)> + '_ {
    text.chars().enumerate().flat_map(|(index, ch)| {
        let rows = glyph_rows(ch);
        let left = index as i32 * GLYPH_ADVANCE;
        (0..GLYPH_HEIGHT).flat_map(move |row| {
            let bits = rows[row as usize];
            (0..GLYPH_WIDTH)
                .filter(move |col| (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 1)
                .map(move |col| (left + col, row))
        })
    })
}

/// Row bitmaps of a 5x7 glyph, most significant of the low five bits on the left
fn glyph_rows(ch: char) -> [u8; 7] {
    match ch {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
        'b' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E],
        'c' => [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E],
        'd' => [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        'f' => [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08],
        'g' => [0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'h' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11],
        'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        'j' => [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C],
        'k' => [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
        'l' => [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'm' => [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11],
        'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        'o' => [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
        'p' => [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10],
        'q' => [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        's' => [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E],
        't' => [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
        'u' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D],
        'v' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'w' => [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A],
        'x' => [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11],
        'y' => [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'z' => [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        // Unknown characters render as an empty box
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}
