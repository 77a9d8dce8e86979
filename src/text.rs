//! Glyph-level text rasterization for the compositor.
//!
//! A line of text becomes an anti-aliased coverage mask positioned in
//! document space. Text outlines are produced by dilating the mask and
//! compositing the dilated mask in the stroke color underneath the fill,
//! which matches the stroke-behind-fill draw order of the compositor.

use ab_glyph::{Font, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

use crate::fonts::{FontFamily, FontStore};
use crate::raster;

/// Anti-aliased coverage for one rendered line, with its placement in
/// document pixels. `data[y * width + x]` is coverage in [0, 1].
pub struct LineMask {
    pub width: usize,
    pub height: usize,
    /// Document-space position of the mask's top-left pixel.
    pub origin_x: i32,
    pub origin_y: i32,
    pub data: Vec<f32>,
}

/// Rasterize one line centered horizontally at `cx` with its vertical
/// midpoint at `cy` (middle-baseline anchoring). `pad` reserves room around
/// the glyphs for a later dilation pass. Returns `None` when the family has
/// no loaded font or the line is empty.
pub fn rasterize_line(
    fonts: &FontStore,
    family: FontFamily,
    size: f32,
    line: &str,
    cx: f32,
    cy: f32,
    pad: f32,
) -> Option<LineMask> {
    let font = fonts.get(family)?;
    if line.is_empty() {
        return None;
    }

    let scaled = font.as_scaled(PxScale::from(size));
    let ascent = scaled.ascent();
    let descent = scaled.descent(); // negative
    let line_width = fonts.measure_line(family, size, line);

    // Middle baseline: the midpoint between ascender top and descender
    // bottom sits at cy.
    let baseline_y = cy + (ascent + descent) / 2.0;
    let start_x = cx - line_width / 2.0;

    let pad = pad.ceil().max(2.0);
    let origin_x = (start_x - pad).floor() as i32;
    let origin_y = (baseline_y - ascent - pad).floor() as i32;
    let width = (line_width + 2.0 * pad).ceil() as usize + 1;
    let height = (ascent - descent + 2.0 * pad).ceil() as usize + 1;
    let mut data = vec![0.0f32; width * height];

    let mut caret = start_x - origin_x as f32;
    let baseline = baseline_y - origin_y as f32;
    let mut prev = None;
    for ch in line.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(PxScale::from(size), point(caret, baseline));
        caret += scaled.h_advance(id);
        prev = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0 && (x as usize) < width && y >= 0 && (y as usize) < height {
                    let idx = y as usize * width + x as usize;
                    data[idx] = (data[idx] + coverage).min(1.0);
                }
            });
        }
    }

    Some(LineMask {
        width,
        height,
        origin_x,
        origin_y,
        data,
    })
}

/// Grow a mask's coverage by `radius` pixels using a separable max filter.
/// The square structuring element is close enough to canvas-style round
/// joins at the stroke widths in play.
pub fn dilate(mask: &LineMask, radius: f32) -> LineMask {
    let r = radius.round().max(1.0) as usize;
    let (w, h) = (mask.width, mask.height);
    let mut horiz = vec![0.0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(w - 1);
            let mut m = 0.0f32;
            for xx in lo..=hi {
                m = m.max(mask.data[y * w + xx]);
            }
            horiz[y * w + x] = m;
        }
    }
    let mut out = vec![0.0f32; w * h];
    for y in 0..h {
        let lo = y.saturating_sub(r);
        let hi = (y + r).min(h - 1);
        for x in 0..w {
            let mut m = 0.0f32;
            for yy in lo..=hi {
                m = m.max(horiz[yy * w + x]);
            }
            out[y * w + x] = m;
        }
    }
    LineMask {
        width: w,
        height: h,
        origin_x: mask.origin_x,
        origin_y: mask.origin_y,
        data: out,
    }
}

/// Blend a mask onto the target raster in a single color.
pub fn composite_mask(img: &mut RgbaImage, mask: &LineMask, color: Rgba<u8>) {
    for y in 0..mask.height {
        for x in 0..mask.width {
            let coverage = mask.data[y * mask.width + x];
            if coverage > 0.0 {
                raster::blend_pixel(
                    img,
                    mask.origin_x + x as i32,
                    mask.origin_y + y as i32,
                    color,
                    coverage,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(data: Vec<f32>, w: usize, h: usize) -> LineMask {
        LineMask {
            width: w,
            height: h,
            origin_x: 0,
            origin_y: 0,
            data,
        }
    }

    #[test]
    fn dilate_spreads_coverage() {
        let mut data = vec![0.0; 25];
        data[2 * 5 + 2] = 1.0;
        let grown = dilate(&mask(data, 5, 5), 1.0);
        assert_eq!(grown.data[1 * 5 + 2], 1.0);
        assert_eq!(grown.data[2 * 5 + 1], 1.0);
        assert_eq!(grown.data[3 * 5 + 3], 1.0);
        assert_eq!(grown.data[0], 0.0);
    }

    #[test]
    fn rasterize_without_font_is_none() {
        let fonts = FontStore::empty();
        assert!(rasterize_line(&fonts, FontFamily::Cairo, 60.0, "199", 100.0, 100.0, 4.0).is_none());
    }

    #[test]
    fn composite_respects_mask_origin() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let mut data = vec![0.0; 4];
        data[0] = 1.0;
        let m = LineMask {
            width: 2,
            height: 2,
            origin_x: 3,
            origin_y: 4,
            data,
        };
        composite_mask(&mut img, &m, Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(3, 4).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(4, 5).0, [0, 0, 0, 255]);
    }
}
