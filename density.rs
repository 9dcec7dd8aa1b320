//! density - Surface area to particle count

use crate::config::Config;

pub const REFERENCE_WIDTH: f64 = 1920.0;
pub const REFERENCE_HEIGHT: f64 = 1080.0;
pub const REFERENCE_AREA: f64 = REFERENCE_WIDTH * REFERENCE_HEIGHT;

/// Particle count for a `width` x `height` surface rendered at `scale`.
///
/// `config.amount` particles fill the reference area at scale 1. The count
/// grows with area, shrinks with scale and never exceeds
/// `config.max_particles`. Empty or invalid geometry yields zero.
pub fn target_count(width: f32, height: f32, config: &Config, scale: f32) -> usize {
    if !(width > 0.0 && height > 0.0) || !(scale > 0.0) {
        return 0;
    }

    // COMPAT: amount * area / (reference * scale) is the same quantity as
    // (amount / reference) * area / scale, but exact for whole multiples of
    // the reference area.
    let area = width as f64 * height as f64;
    let estimated = libm::floor(config.amount as f64 * area / (REFERENCE_AREA * scale as f64));

    if !(estimated > 0.0) {
        0
    } else if estimated >= config.max_particles as f64 {
        config.max_particles
    } else {
        estimated as usize
    }
}

/// Scale applied between logical units and the physical buffer.
///
/// The platform value is floored at 1, an override can only pull it down,
/// and the configured cap bounds the result.
pub fn effective_scale(platform_scale: f32, scale_override: Option<f32>, cap: f32) -> f32 {
    let base = platform_scale.max(1.0);
    let throttled = match scale_override {
        Some(value) => base.min(value),
        None => base,
    };
    cap.min(throttled)
}
