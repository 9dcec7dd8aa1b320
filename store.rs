//! store - Struct-of-arrays particle state

use alloc::vec::Vec;
use core::f32::consts::TAU;

use rand::Rng;

use crate::config::Config;
use crate::trig::sine;

/// Where freshly seeded particles start.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpawnMode {
    /// Random height above the top edge, so the field drifts in.
    AboveView,
    /// Random height inside the visible area, so the field starts full.
    WithinView,
}

impl SpawnMode {
    pub fn from_config(config: &Config) -> Self {
        if config.initial_fill {
            SpawnMode::WithinView
        } else {
            SpawnMode::AboveView
        }
    }
}

/// Kinematic state of every particle, one array per attribute.
///
/// All arrays always share the same length. `size`, `amplitude`,
/// `swing_rate` and `fall_rate` are drawn once per particle by
/// [`ParticleStore::reseed`] and survive recycling.
#[derive(Debug, Default, Clone)]
pub struct ParticleStore {
    pub(crate) pos_x: Vec<f32>,
    pub(crate) pos_y: Vec<f32>,
    pub(crate) origin_x: Vec<f32>,
    pub(crate) phase: Vec<f32>,
    pub(crate) size: Vec<f32>,
    pub(crate) amplitude: Vec<f32>,
    pub(crate) swing_rate: Vec<f32>,
    pub(crate) fall_rate: Vec<f32>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pos_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos_x.is_empty()
    }

    /// Replace every particle with `count` fresh ones.
    ///
    /// PERF: the arrays are reallocated at exactly `count`; callers only
    /// reseed when the target count actually changes.
    pub fn reseed<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        width: f32,
        height: f32,
        config: &Config,
        mode: SpawnMode,
        rng: &mut R,
    ) {
        let mut next = Self::with_capacity(count);

        for _ in 0..count {
            // Generate per-particle attributes before position so a fixed
            // seed gives the same field regardless of spawn mode.
            let size = config.size.sample(rng);
            let amplitude = config.amplitude.sample(rng);
            let swing_rate = config.swing_speed.sample(rng);
            let fall_rate = config.fall_speed.sample(rng);

            let origin = uniform(rng, width);
            let phase = uniform(rng, TAU);
            let y = match mode {
                SpawnMode::AboveView => -size - rng.gen::<f32>() * height.max(0.0),
                SpawnMode::WithinView => rng.gen::<f32>() * height.max(0.0),
            };

            next.pos_x.push(origin + amplitude * sine(phase));
            next.pos_y.push(y);
            next.origin_x.push(origin);
            next.phase.push(phase);
            next.size.push(size);
            next.amplitude.push(amplitude);
            next.swing_rate.push(swing_rate);
            next.fall_rate.push(fall_rate);
        }

        *self = next;
    }

    /// Send particle `i` back to the top edge with a new anchor and phase.
    /// Size, amplitude and rates are kept.
    pub(crate) fn recycle<R: Rng + ?Sized>(&mut self, i: usize, width: f32, rng: &mut R) {
        let x = uniform(rng, width);
        self.pos_y[i] = -self.size[i];
        self.pos_x[i] = x;
        self.origin_x[i] = x;
        self.phase[i] = uniform(rng, TAU);
    }

    fn with_capacity(count: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(count),
            pos_y: Vec::with_capacity(count),
            origin_x: Vec::with_capacity(count),
            phase: Vec::with_capacity(count),
            size: Vec::with_capacity(count),
            amplitude: Vec::with_capacity(count),
            swing_rate: Vec::with_capacity(count),
            fall_rate: Vec::with_capacity(count),
        }
    }

    pub fn pos_x(&self) -> &[f32] {
        &self.pos_x
    }

    pub fn pos_y(&self) -> &[f32] {
        &self.pos_y
    }

    pub fn origin_x(&self) -> &[f32] {
        &self.origin_x
    }

    pub fn phase(&self) -> &[f32] {
        &self.phase
    }

    pub fn size(&self) -> &[f32] {
        &self.size
    }

    pub fn amplitude(&self) -> &[f32] {
        &self.amplitude
    }

    pub fn swing_rate(&self) -> &[f32] {
        &self.swing_rate
    }

    pub fn fall_rate(&self) -> &[f32] {
        &self.fall_rate
    }
}

// Uniform in [0, upper); collapses to 0 for an empty interval.
#[inline]
fn uniform<R: Rng + ?Sized>(rng: &mut R, upper: f32) -> f32 {
    if upper > 0.0 {
        rng.gen_range(0.0..upper)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Range;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn lengths(store: &ParticleStore) -> [usize; 8] {
        [
            store.pos_x.len(),
            store.pos_y.len(),
            store.origin_x.len(),
            store.phase.len(),
            store.size.len(),
            store.amplitude.len(),
            store.swing_rate.len(),
            store.fall_rate.len(),
        ]
    }

    #[test]
    fn reseed_keeps_arrays_aligned() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut store = ParticleStore::new();
        let config = Config::default();

        store.reseed(300, 800.0, 600.0, &config, SpawnMode::AboveView, &mut rng);
        assert_eq!(lengths(&store), [300; 8]);

        store.reseed(12, 800.0, 600.0, &config, SpawnMode::AboveView, &mut rng);
        assert_eq!(lengths(&store), [12; 8]);

        store.reseed(0, 800.0, 600.0, &config, SpawnMode::AboveView, &mut rng);
        assert!(store.is_empty());
    }

    #[test]
    fn attributes_come_from_configured_ranges() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut store = ParticleStore::new();
        let config = Config {
            size: Range::new(2.0, 4.0),
            amplitude: Range::new(5.0, 6.0),
            swing_speed: Range::new(1.0, 2.0),
            fall_speed: Range::new(40.0, 50.0),
            ..Config::default()
        };
        store.reseed(500, 640.0, 480.0, &config, SpawnMode::WithinView, &mut rng);

        for i in 0..store.len() {
            assert!((2.0..=4.0).contains(&store.size[i]));
            assert!((5.0..=6.0).contains(&store.amplitude[i]));
            assert!((1.0..=2.0).contains(&store.swing_rate[i]));
            assert!((40.0..=50.0).contains(&store.fall_rate[i]));
            assert!((0.0..TAU).contains(&store.phase[i]));
            assert!((0.0..640.0).contains(&store.origin_x[i]));
        }
    }

    #[test]
    fn spawn_modes_place_particles_above_or_inside() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut store = ParticleStore::new();
        let config = Config::default();

        store.reseed(200, 640.0, 480.0, &config, SpawnMode::AboveView, &mut rng);
        assert!(store.pos_y.iter().zip(&store.size).all(|(y, s)| *y <= -*s));

        store.reseed(200, 640.0, 480.0, &config, SpawnMode::WithinView, &mut rng);
        assert!(store.pos_y.iter().all(|y| (0.0..=480.0).contains(y)));
    }

    #[test]
    fn recycle_keeps_identity() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut store = ParticleStore::new();
        store.reseed(1, 320.0, 240.0, &Config::default(), SpawnMode::WithinView, &mut rng);

        let (size, amp, swing, fall) = (
            store.size[0],
            store.amplitude[0],
            store.swing_rate[0],
            store.fall_rate[0],
        );
        store.pos_y[0] = 999.0;
        store.recycle(0, 320.0, &mut rng);

        assert_eq!(store.pos_y[0], -size);
        assert_eq!(store.pos_x[0], store.origin_x[0]);
        assert!((0.0..320.0).contains(&store.origin_x[0]));
        assert_eq!(
            (store.size[0], store.amplitude[0], store.swing_rate[0], store.fall_rate[0]),
            (size, amp, swing, fall)
        );
    }

    #[test]
    fn zero_width_surface_pins_origin() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut store = ParticleStore::new();
        store.reseed(10, 0.0, 0.0, &Config::default(), SpawnMode::AboveView, &mut rng);
        assert!(store.origin_x.iter().all(|x| *x == 0.0));
    }
}
