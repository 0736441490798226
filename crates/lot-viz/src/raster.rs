//! Headless rasterization of lot layouts into PNG images.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use lot_bsp::{Lot, Point};

/// Colors and stroke widths used when rasterizing a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub lot_fill: Rgb<u8>,
    /// Opacity of the lot fill over the background, `0.0..=1.0`.
    pub lot_fill_alpha: f32,
    pub lot_border: Rgb<u8>,
    pub lot_border_width: f64,
    pub initial_quad: Rgb<u8>,
    pub initial_quad_width: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb([245, 245, 235]),
            lot_fill: Rgb([144, 238, 144]),
            lot_fill_alpha: 80.0 / 255.0,
            lot_border: Rgb([34, 139, 34]),
            lot_border_width: 2.0,
            initial_quad: Rgb([200, 100, 100]),
            initial_quad_width: 3.0,
        }
    }
}

/// Renders `lots` on a `width`×`height` image, with the outline of
/// `initial` drawn underneath the lot borders.
pub fn render(lots: &[Lot], initial: &Lot, width: u32, height: u32, palette: &Palette) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, palette.background);

    for lot in lots {
        fill_quad(&mut img, lot.vertices(), palette.lot_fill, palette.lot_fill_alpha);
    }
    stroke_quad(&mut img, initial.vertices(), palette.initial_quad_width, palette.initial_quad);
    for lot in lots {
        stroke_quad(&mut img, lot.vertices(), palette.lot_border_width, palette.lot_border);
    }

    img
}

/// Saves an image as PNG.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write image: {}", path.display()))
}

/// Blends `color` over every pixel whose center lies inside the polygon
/// (even-odd rule).
pub fn fill_quad(img: &mut RgbImage, corners: [Point; 4], color: Rgb<u8>, alpha: f32) {
    let (min_y, max_y) = corners
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y()), hi.max(p.y())));
    let Some((row_start, row_end)) = clamp_span(min_y, max_y, img.height()) else {
        return;
    };

    let mut crossings = Vec::with_capacity(4);
    for row in row_start..=row_end {
        let y = f64::from(row) + 0.5;
        crossings.clear();
        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            // Half-open on y so shared vertices are counted once.
            if (a.y() <= y) != (b.y() <= y) {
                let t = (y - a.y()) / (b.y() - a.y());
                crossings.push(a.x() + t * (b.x() - a.x()));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let Some((col_start, col_end)) = clamp_span(pair[0] - 0.5, pair[1] - 0.5, img.width()) else {
                continue;
            };
            for col in col_start..=col_end {
                let center = f64::from(col) + 0.5;
                if center >= pair[0] && center < pair[1] {
                    blend(img.get_pixel_mut(col, row), color, alpha);
                }
            }
        }
    }
}

/// Draws the closed outline of a quadrilateral.
pub fn stroke_quad(img: &mut RgbImage, corners: [Point; 4], width: f64, color: Rgb<u8>) {
    for i in 0..4 {
        draw_segment(img, corners[i], corners[(i + 1) % 4], width, color);
    }
}

/// Paints every pixel whose center lies within `width / 2` of the segment.
pub fn draw_segment(img: &mut RgbImage, a: Point, b: Point, width: f64, color: Rgb<u8>) {
    let half = (width / 2.0).max(0.5);
    let Some((col_start, col_end)) = clamp_span(a.x().min(b.x()) - half, a.x().max(b.x()) + half, img.width()) else {
        return;
    };
    let Some((row_start, row_end)) = clamp_span(a.y().min(b.y()) - half, a.y().max(b.y()) + half, img.height()) else {
        return;
    };

    for row in row_start..=row_end {
        for col in col_start..=col_end {
            let center = Point::new(f64::from(col) + 0.5, f64::from(row) + 0.5);
            if distance_to_segment(center, a, b) <= half {
                img.put_pixel(col, row, color);
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b.to_nalgebra() - a.to_nalgebra();
    let ap = p.to_nalgebra() - a.to_nalgebra();
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return ap.norm();
    }
    let t = (ap.dot(&ab) / len_sq).clamp(0.0, 1.0);
    p.distance_to(a.interpolate(b, t))
}

/// Pixel indices covering `lo..=hi`, clipped to `0..limit`.
fn clamp_span(lo: f64, hi: f64, limit: u32) -> Option<(u32, u32)> {
    if limit == 0 || !lo.is_finite() || !hi.is_finite() || hi < 0.0 || lo >= f64::from(limit) {
        return None;
    }
    let start = lo.floor().max(0.0) as u32;
    let end = (hi.ceil() as u32).min(limit - 1);
    (start <= end).then_some((start, end))
}

fn blend(pixel: &mut Rgb<u8>, color: Rgb<u8>, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        let mixed = f32::from(*dst) * (1.0 - alpha) + f32::from(src) * alpha;
        *dst = mixed.round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_covers_interior_only() {
        let mut img = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
        let lot = Lot::rectangle(5.0, 5.0, 10.0, 10.0);
        fill_quad(&mut img, lot.vertices(), Rgb([255, 255, 255]), 1.0);

        assert_eq!(*img.get_pixel(5, 5), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(14, 14), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(4, 10), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(15, 10), Rgb([0, 0, 0]));
        let filled = img.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert_eq!(filled, 100);
    }

    #[test]
    fn fill_is_clipped_to_image() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let lot = Lot::rectangle(-50.0, -50.0, 200.0, 200.0);
        fill_quad(&mut img, lot.vertices(), Rgb([9, 9, 9]), 1.0);
        assert!(img.pixels().all(|p| p.0 == [9, 9, 9]));
    }

    #[test]
    fn fill_blends_with_background() {
        let mut img = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        fill_quad(&mut img, Lot::rectangle(0.0, 0.0, 4.0, 4.0).vertices(), Rgb([200, 100, 0]), 0.5);
        assert_eq!(*img.get_pixel(2, 2), Rgb([100, 50, 0]));
    }

    #[test]
    fn segment_has_requested_width() {
        let mut img = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
        draw_segment(&mut img, Point::new(2.0, 10.0), Point::new(18.0, 10.0), 2.0, Rgb([255, 0, 0]));

        assert_eq!(*img.get_pixel(10, 9), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(10, 10), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(10, 8), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(10, 11), Rgb([0, 0, 0]));
    }

    #[test]
    fn render_uses_palette() {
        let palette = Palette::default();
        let initial = Lot::rectangle(10.0, 10.0, 80.0, 80.0);
        let lots = initial.split(lot_bsp::SplitAxis::Width, 2);
        let img = render(&lots, &initial, 100, 100, &palette);

        assert_eq!(*img.get_pixel(2, 2), palette.background);
        assert_eq!(*img.get_pixel(50, 50), palette.lot_border);
        assert_eq!(*img.get_pixel(10, 30), palette.lot_border);

        let inside = *img.get_pixel(30, 30);
        assert_ne!(inside, palette.background);
        assert_ne!(inside, palette.lot_fill);
    }
}
