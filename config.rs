//! config - Snowfall configuration and partial updates

use core::f32::consts::TAU;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use rand::Rng;

use crate::error::SnowfallError;
use crate::simulation::MAX_DT;

/// Closed sampling range for per-particle attributes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `min + u * (max - min)` with `u` uniform in `[0, 1)`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.gen::<f32>() * (self.max - self.min)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Particle count at the 1920x1080 reference area.
    pub amount: f32,
    /// Square side length, logical units.
    pub size: Range,
    /// Phase velocity of the horizontal sway, radians per second.
    pub swing_speed: Range,
    /// Downward velocity, logical units per second.
    pub fall_speed: Range,
    /// Horizontal sway amplitude, logical units.
    pub amplitude: Range,
    pub color: Rgb888,
    pub background: Rgb888,
    /// Upper bound on the pixel-density scale used for the buffer.
    pub pixel_density_cap: f32,
    pub max_particles: usize,
    /// Reseed particles inside the visible area instead of above it.
    pub initial_fill: bool,
    pub rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            amount: 2500.0,
            size: Range::new(1.0, 3.0),
            swing_speed: Range::new(0.5, 1.5),
            fall_speed: Range::new(30.0, 90.0),
            amplitude: Range::new(10.0, 30.0),
            color: Rgb888::WHITE,
            background: Rgb888::BLACK,
            pixel_density_cap: 2.0,
            max_particles: 4000,
            initial_fill: false,
            rng_seed: 0x5EED_F1A4E,
        }
    }
}

impl Config {
    /// Reject configurations the simulation cannot honour.
    pub fn validate(&self) -> Result<(), SnowfallError> {
        let ranges = [
            (self.size, "size"),
            (self.swing_speed, "swing_speed"),
            (self.fall_speed, "fall_speed"),
            (self.amplitude, "amplitude"),
        ];
        for (range, name) in ranges {
            if !range.is_valid() {
                return Err(SnowfallError::InvalidConfig(name));
            }
            if range.min < 0.0 {
                return Err(SnowfallError::InvalidConfig(name));
            }
        }

        // A single wraparound per tick must bring the phase back below 2π.
        if self.swing_speed.max * MAX_DT >= TAU {
            return Err(SnowfallError::InvalidConfig("swing_speed"));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(SnowfallError::InvalidConfig("amount"));
        }
        if !self.pixel_density_cap.is_finite() || self.pixel_density_cap <= 0.0 {
            return Err(SnowfallError::InvalidConfig("pixel_density_cap"));
        }
        Ok(())
    }

    /// Overlay the fields present in `patch`.
    pub fn merge(&self, patch: &ConfigPatch) -> Self {
        Self {
            amount: patch.amount.unwrap_or(self.amount),
            size: patch.size.unwrap_or(self.size),
            swing_speed: patch.swing_speed.unwrap_or(self.swing_speed),
            fall_speed: patch.fall_speed.unwrap_or(self.fall_speed),
            amplitude: patch.amplitude.unwrap_or(self.amplitude),
            color: patch.color.unwrap_or(self.color),
            background: patch.background.unwrap_or(self.background),
            pixel_density_cap: patch.pixel_density_cap.unwrap_or(self.pixel_density_cap),
            max_particles: patch.max_particles.unwrap_or(self.max_particles),
            initial_fill: patch.initial_fill.unwrap_or(self.initial_fill),
            rng_seed: patch.rng_seed.unwrap_or(self.rng_seed),
        }
    }
}

/// Partial configuration update; `None` keeps the current value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ConfigPatch {
    pub amount: Option<f32>,
    pub size: Option<Range>,
    pub swing_speed: Option<Range>,
    pub fall_speed: Option<Range>,
    pub amplitude: Option<Range>,
    pub color: Option<Rgb888>,
    pub background: Option<Rgb888>,
    pub pixel_density_cap: Option<f32>,
    pub max_particles: Option<usize>,
    pub initial_fill: Option<bool>,
    pub rng_seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let range = Range::new(2.0, 5.0);
        for _ in 0..1000 {
            let v = range.sample(&mut rng);
            assert!((2.0..=5.0).contains(&v));
        }
        assert_eq!(Range::new(4.0, 4.0).sample(&mut rng), 4.0);
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let base = Config::default();
        let patch = ConfigPatch {
            amount: Some(900.0),
            color: Some(Rgb888::RED),
            ..ConfigPatch::default()
        };
        let merged = base.merge(&patch);
        assert_eq!(merged.amount, 900.0);
        assert_eq!(merged.color, Rgb888::RED);
        assert_eq!(merged.size, base.size);
        assert_eq!(merged.max_particles, base.max_particles);
        assert_eq!(base.merge(&ConfigPatch::default()), base);
    }

    #[test]
    fn rejects_inverted_and_negative_ranges() {
        let inverted = Config {
            fall_speed: Range::new(10.0, 1.0),
            ..Config::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(SnowfallError::InvalidConfig("fall_speed"))
        );

        let negative = Config {
            size: Range::new(-1.0, 2.0),
            ..Config::default()
        };
        assert_eq!(negative.validate(), Err(SnowfallError::InvalidConfig("size")));
    }

    #[test]
    fn rejects_swing_that_outruns_one_wrap() {
        let config = Config {
            swing_speed: Range::new(0.0, 200.0),
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(SnowfallError::InvalidConfig("swing_speed"))
        );
    }

    #[test]
    fn rejects_bad_scalars() {
        let amount = Config {
            amount: f32::NAN,
            ..Config::default()
        };
        assert!(amount.validate().is_err());

        let cap = Config {
            pixel_density_cap: 0.0,
            ..Config::default()
        };
        assert_eq!(
            cap.validate(),
            Err(SnowfallError::InvalidConfig("pixel_density_cap"))
        );
    }
}
