//! render - Painting the particle field onto a drawing surface

use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use log::debug;

use crate::store::ParticleStore;

/// Drawing surface the engine paints into.
///
/// Coordinates and sizes are logical units. The surface maps them onto its
/// physical buffer using the scale last passed to [`Surface::resize_buffer`].
pub trait Surface {
    fn clear(&mut self);

    fn set_fill(&mut self, color: Rgb888);

    /// Fill an axis-aligned square with its top-left corner at `(x, y)`.
    fn fill_square(&mut self, x: f32, y: f32, side: f32);

    /// Physical buffer size, requested whenever logical size or scale changes.
    fn resize_buffer(&mut self, width_px: u32, height_px: u32, scale: f32);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn set_fill(&mut self, color: Rgb888) {
        (**self).set_fill(color)
    }

    fn fill_square(&mut self, x: f32, y: f32, side: f32) {
        (**self).fill_square(x, y, side)
    }

    fn resize_buffer(&mut self, width_px: u32, height_px: u32, scale: f32) {
        (**self).resize_buffer(width_px, height_px, scale)
    }
}

/// Paint every particle as a square of its own size in one uniform colour.
pub fn draw<S: Surface + ?Sized>(surface: &mut S, store: &ParticleStore, color: Rgb888) {
    surface.set_fill(color);
    let (xs, ys, sizes) = (store.pos_x(), store.pos_y(), store.size());
    for i in 0..store.len() {
        surface.fill_square(xs[i], ys[i], sizes[i]);
    }
}

/// Clear the surface, then [`draw`].
pub fn render<S: Surface + ?Sized>(surface: &mut S, store: &ParticleStore, color: Rgb888) {
    surface.clear();
    draw(surface, store, color);
}

/// [`Surface`] over any `embedded-graphics` draw target.
///
/// The target's own dimensions are fixed, so buffer resizes only change the
/// logical-to-pixel scale. A target opened at a fixed display scale instead
/// snaps squares to the coarser grid of the requested buffer scale.
pub struct DrawTargetSurface<D: DrawTarget> {
    target: D,
    background: D::Color,
    fill: D::Color,
    scale: f32,
    display_scale: Option<f32>,
}

impl<D> DrawTargetSurface<D>
where
    D: DrawTarget<Error = Infallible>,
    D::Color: From<Rgb888>,
{
    pub fn new(target: D, background: Rgb888) -> Self {
        Self {
            target,
            background: background.into(),
            fill: Rgb888::WHITE.into(),
            scale: 1.0,
            display_scale: None,
        }
    }

    /// Target sized for `display_scale` pixels per logical unit.
    pub fn with_display_scale(target: D, background: Rgb888, display_scale: f32) -> Self {
        Self {
            scale: display_scale,
            display_scale: Some(display_scale),
            ..Self::new(target, background)
        }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_target(self) -> D {
        self.target
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl<D> Surface for DrawTargetSurface<D>
where
    D: DrawTarget<Error = Infallible>,
    D::Color: From<Rgb888>,
{
    fn clear(&mut self) {
        infallible(self.target.clear(self.background));
    }

    fn set_fill(&mut self, color: Rgb888) {
        self.fill = color.into();
    }

    fn fill_square(&mut self, x: f32, y: f32, side: f32) {
        let scale = self.scale;
        // Target pixels per buffer pixel.
        let cell = self.display_scale.map_or(1.0, |display| display / scale);
        // Sub-pixel flakes still cover one buffer pixel.
        let side_px = (libm::roundf(side * scale).max(1.0) * cell) as u32;
        let corner = Point::new(
            (libm::floorf(x * scale) * cell) as i32,
            (libm::floorf(y * scale) * cell) as i32,
        );
        infallible(
            Rectangle::new(corner, Size::new(side_px, side_px))
                .into_styled(PrimitiveStyle::with_fill(self.fill))
                .draw(&mut self.target),
        );
    }

    fn resize_buffer(&mut self, width_px: u32, height_px: u32, scale: f32) {
        debug!(
            "Draw target fixed at {:?}, requested {}x{} @ {:.2}",
            self.target.bounding_box().size,
            width_px,
            height_px,
            scale
        );
        self.scale = scale.max(f32::EPSILON);
    }
}

fn infallible(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}
