//! Shared visualization utilities for lot layouts.

use std::hash::{Hash, Hasher};

use lot_bsp::{Lot, Point};
use macroquad::prelude::*;
use nalgebra::{Point2, Vector2};

pub mod navigator;
pub mod raster;
pub mod report;
pub mod settings;

pub use navigator::RoundNavigator;
pub use settings::Settings;

/// Generates a deterministic color from a lot's vertices using hashing.
/// A lot keeps its color across rounds for as long as it is not split.
pub fn lot_color(lot: &Lot) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for v in lot.vertices() {
        v.x().to_bits().hash(&mut hasher);
        v.y().to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    let r = ((hash >> 16) & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = (hash & 0xFF) as u8;

    // Keep lots readable against the dark background
    Color::from_rgba(r.max(60), g.max(60), b.max(60), 255)
}

/// Draws a lot as two filled triangles with an outline.
pub fn draw_lot(lot: &Lot, view: &ViewTransform, outline: Color) {
    let [a, b, c, d] = lot.vertices().map(|p| view.world_to_screen(p));
    let fill = lot_color(lot);

    draw_triangle(a, b, c, fill);
    draw_triangle(a, c, d, fill);
    draw_quad_outline([a, b, c, d], 1.5, outline);
}

/// Draws the outline of a quadrilateral given in screen coordinates.
pub fn draw_quad_outline(corners: [Vec2; 4], thickness: f32, color: Color) {
    for i in 0..4 {
        let from = corners[i];
        let to = corners[(i + 1) % 4];
        draw_line(from.x, from.y, to.x, to.y, thickness, color);
    }
}

/// Pan and zoom mapping between world coordinates and screen pixels.
///
/// `screen = (world - origin) * scale`. World `y` grows downwards, like the
/// screen, so no flip is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// World point shown at the top-left corner of the screen.
    pub origin: Point2<f64>,
    /// Screen pixels per world unit.
    pub scale: f64,
    /// Multiplier applied per wheel notch
    pub zoom_step: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl ViewTransform {
    /// Creates a transform with the given origin and scale.
    pub fn new(origin: Point2<f64>, scale: f64) -> Self {
        Self {
            origin,
            scale,
            zoom_step: 1.1,
            min_scale: 0.05,
            max_scale: 50.0,
        }
    }

    /// Fits the world rectangle `min..max` into a screen of `width`×`height`
    /// pixels, leaving `margin` pixels on every side and centering the
    /// shorter axis.
    pub fn fit(min: Point, max: Point, width: f64, height: f64, margin: f64) -> Self {
        let world = Vector2::new((max.x() - min.x()).max(1.0), (max.y() - min.y()).max(1.0));
        let usable = Vector2::new((width - 2.0 * margin).max(1.0), (height - 2.0 * margin).max(1.0));
        let scale = (usable.x / world.x).min(usable.y / world.y);

        // Center the content inside the usable area
        let slack = Vector2::new(width / scale - world.x, height / scale - world.y) / 2.0;
        let origin = min.to_nalgebra() - slack;
        Self::new(origin, scale)
    }

    /// Sets the zoom configuration (step and scale limits).
    pub fn with_zoom(mut self, step: f64, min: f64, max: f64) -> Self {
        self.zoom_step = step;
        self.min_scale = min;
        self.max_scale = max;
        self
    }

    /// Maps a world point to screen pixels.
    pub fn world_to_screen(&self, point: Point) -> Vec2 {
        let screen = (point.to_nalgebra() - self.origin) * self.scale;
        vec2(screen.x as f32, screen.y as f32)
    }

    /// Maps screen pixels back to the world.
    pub fn screen_to_world(&self, screen: Vec2) -> Point {
        let offset = Vector2::new(f64::from(screen.x), f64::from(screen.y)) / self.scale;
        (self.origin + offset).into()
    }

    /// Moves the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.origin -= Vector2::new(f64::from(delta.x), f64::from(delta.y)) / self.scale;
    }

    /// Zooms by `notches` wheel steps, keeping the world point under
    /// `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Vec2, notches: f64) {
        let before = self.screen_to_world(anchor);
        self.scale = (self.scale * self.zoom_step.powf(notches)).clamp(self.min_scale, self.max_scale);
        let after = self.screen_to_world(anchor);
        self.origin += before.to_nalgebra() - after.to_nalgebra();
    }

    /// Updates the view from user input (left drag pans, wheel zooms).
    pub fn update(&mut self, last_mouse: &mut Option<Vec2>) {
        let mouse = Vec2::from(mouse_position());

        if is_mouse_button_down(MouseButton::Left) {
            if let Some(last) = *last_mouse {
                self.pan(mouse - last);
            }
            *last_mouse = Some(mouse);
        } else {
            *last_mouse = None;
        }

        let scroll = mouse_wheel().1;
        if scroll != 0.0 {
            self.zoom_at(mouse, f64::from(scroll.signum()));
        }
    }
}
