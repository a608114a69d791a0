//! Rasterisation of [`Summary`] lines onto a fixed-size PNG.
//!
//! Glyphs come from the `font8x8` bitmap set; each line is stamped at its
//! fixed baseline with no wrapping. Pixels past the canvas edge are dropped.

use std::io::Cursor;

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts as _};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::{Result, Summary};

pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 400;

const BACKGROUND: Rgba<u8> = Rgba([240, 240, 250, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GLYPH: u32 = 8;

/// Render the summary and encode it as PNG bytes.
pub fn render_png(summary: &Summary) -> Result<Vec<u8>> {
  let mut img = RgbaImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
  for line in summary.lines() {
    draw_text(&mut img, line.x, line.baseline, &line.text);
  }

  let mut buf = Cursor::new(Vec::new());
  img.write_to(&mut buf, ImageFormat::Png)?;
  Ok(buf.into_inner())
}

fn glyph(c: char) -> [u8; 8] {
  BASIC_FONTS
    .get(c)
    .or_else(|| LATIN_FONTS.get(c))
    .or_else(|| BASIC_FONTS.get('?'))
    .unwrap_or([0; 8])
}

/// Stamp `text` so that the bottom row of each glyph sits on `baseline`.
fn draw_text(img: &mut RgbaImage, x: u32, baseline: u32, text: &str) {
  let top = baseline.saturating_sub(GLYPH);
  for (i, c) in text.chars().enumerate() {
    let left = x + i as u32 * GLYPH;
    if left >= WIDTH {
      break;
    }
    for (row, bits) in glyph(c).iter().enumerate() {
      for col in 0..GLYPH {
        // Bit 0 is the leftmost pixel.
        if bits & (1 << col) == 0 {
          continue;
        }
        let (px, py) = (left + col, top + row as u32);
        if px < WIDTH && py < HEIGHT {
          img.put_pixel(px, py, INK);
        }
      }
    }
  }
}
