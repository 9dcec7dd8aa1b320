//! simulation - Per-tick particle update

use core::f32::consts::TAU;

use rand::Rng;

use crate::store::ParticleStore;
use crate::trig::sine;

/// Longest step a single call will integrate, in seconds.
pub const MAX_DT: f32 = 0.05;

/// Advance every particle by `dt` seconds on a `width` x `height` surface.
///
/// Particles whose top edge has passed `height` are recycled to the top.
pub fn advance<R: Rng + ?Sized>(
    dt: f32,
    store: &mut ParticleStore,
    width: f32,
    height: f32,
    rng: &mut R,
) {
    // Bound the jump after a stall (debugger pause, hidden window).
    let dt = dt.max(0.0).min(MAX_DT);

    for i in 0..store.len() {
        store.pos_y[i] += store.fall_rate[i] * dt;

        let mut phase = store.phase[i] + store.swing_rate[i] * dt;
        if phase >= TAU {
            phase -= TAU;
        }
        store.phase[i] = phase;
        store.pos_x[i] = store.origin_x[i] + store.amplitude[i] * sine(phase);

        if store.pos_y[i] - store.size[i] > height {
            store.recycle(i, width, rng);
        }
    }
}
