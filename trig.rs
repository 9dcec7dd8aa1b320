//! trig - Table-driven sine for the per-particle hot loop
//!
//! The table is evaluated at compile time, so there is nothing to build at
//! startup and nothing to tear down.

use core::f32::consts::TAU;

/// Number of samples over one period.
pub const TABLE_SIZE: usize = 2048;

const STEP: f64 = core::f64::consts::TAU / TABLE_SIZE as f64;

static SINE_TABLE: [f32; TABLE_SIZE] = build_table();

const fn build_table() -> [f32; TABLE_SIZE] {
    let mut table = [0.0f32; TABLE_SIZE];
    let mut i = 0;
    while i < TABLE_SIZE {
        table[i] = const_sin(i as f64 * STEP) as f32;
        i += 1;
    }
    table
}

// Taylor series after folding x in [0, 2π) onto [-π/2, π/2].
const fn const_sin(x: f64) -> f64 {
    use core::f64::consts::{FRAC_PI_2, PI};

    let (x, sign) = if x > PI { (x - PI, -1.0) } else { (x, 1.0) };
    let x = if x > FRAC_PI_2 { PI - x } else { x };

    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    let mut n = 1;
    while n < 12 {
        term = -term * x2 / ((2 * n) as f64 * (2 * n + 1) as f64);
        sum += term;
        n += 1;
    }
    sign * sum
}

/// Approximate `sin(x)` by linear interpolation between the two nearest
/// table samples. Accepts any finite `x`.
#[inline]
pub fn sine(x: f32) -> f32 {
    let mut x = x % TAU;
    if x < 0.0 {
        x += TAU;
    }

    let pos = x * (TABLE_SIZE as f32 / TAU);
    let lower = pos as usize;
    let frac = pos - lower as f32;
    let i0 = lower % TABLE_SIZE;
    let i1 = (i0 + 1) % TABLE_SIZE;

    let a = SINE_TABLE[i0];
    let b = SINE_TABLE[i1];
    a + (b - a) * frac
}
