//! CPU raster primitives for the compositor: src-over blending,
//! anti-aliased thick segments, dashed outlines, background blits.
//! Everything here is deterministic for identical inputs.

use image::{Rgba, RgbaImage, imageops};

/// Source-over blend of `color` at `coverage` in [0, 1] onto one pixel.
pub fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if coverage <= 0.0 || x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let a = (coverage * color.0[3] as f32 / 255.0).clamp(0.0, 1.0);
    let dst = img.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let s = color.0[c] as f32;
        let d = dst.0[c] as f32;
        dst.0[c] = (s * a + d * (1.0 - a)).round() as u8;
    }
    let da = dst.0[3] as f32 / 255.0;
    dst.0[3] = ((a + da * (1.0 - a)) * 255.0).round() as u8;
}

/// Flood the whole surface with an opaque color.
pub fn fill(img: &mut RgbaImage, color: Rgba<u8>) {
    for px in img.pixels_mut() {
        *px = color;
    }
}

/// Draw the background scaled to exactly the destination dimensions.
pub fn blit_scaled(dst: &mut RgbaImage, src: &RgbaImage) {
    if src.dimensions() == dst.dimensions() {
        dst.copy_from_slice(src.as_raw());
        return;
    }
    let scaled = imageops::resize(src, dst.width(), dst.height(), imageops::FilterType::Triangle);
    dst.copy_from_slice(scaled.as_raw());
}

fn distance_to_segment(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}

/// Anti-aliased segment with round caps. `opacity` scales the color's alpha
/// (used for the strike shadow pass).
pub fn draw_segment(
    img: &mut RgbaImage,
    a: (f32, f32),
    b: (f32, f32),
    width: f32,
    color: Rgba<u8>,
    opacity: f32,
) {
    let half = width / 2.0;
    let min_x = (a.0.min(b.0) - half - 1.0).floor() as i32;
    let max_x = (a.0.max(b.0) + half + 1.0).ceil() as i32;
    let min_y = (a.1.min(b.1) - half - 1.0).floor() as i32;
    let max_y = (a.1.max(b.1) + half + 1.0).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let d = distance_to_segment(x as f32 + 0.5, y as f32 + 0.5, a.0, a.1, b.0, b.1);
            let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
            blend_pixel(img, x, y, color, coverage * opacity);
        }
    }
}

/// Dashed rectangle outline; the dash phase runs continuously around the
/// perimeter.
pub fn draw_dashed_rect(
    img: &mut RgbaImage,
    min: (f32, f32),
    max: (f32, f32),
    dash_on: f32,
    dash_off: f32,
    width: f32,
    color: Rgba<u8>,
) {
    let corners = [
        (min.0, min.1),
        (max.0, min.1),
        (max.0, max.1),
        (min.0, max.1),
        (min.0, min.1),
    ];
    let period = dash_on + dash_off;
    let mut phase = 0.0f32;
    for pair in corners.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let edge_len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        if edge_len <= 0.0 {
            continue;
        }
        let (ux, uy) = ((b.0 - a.0) / edge_len, (b.1 - a.1) / edge_len);
        let mut pos = 0.0f32;
        while pos < edge_len {
            let in_period = phase % period;
            if in_period < dash_on {
                // Inside an "on" run: draw to the end of the run or the edge.
                let run = (dash_on - in_period).min(edge_len - pos);
                let start = (a.0 + ux * pos, a.1 + uy * pos);
                let end = (a.0 + ux * (pos + run), a.1 + uy * (pos + run));
                draw_segment(img, start, end, width, color, 1.0);
                pos += run;
                phase += run;
            } else {
                let gap = (period - in_period).min(edge_len - pos);
                pos += gap;
                phase += gap;
            }
        }
    }
}
