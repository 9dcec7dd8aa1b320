//! performance - Frame-time driven quality degradation
//!
//! The monitor keeps an exponential moving average of frame time. When the
//! average stays above [`SLOW_FRAME_MS`] it proposes a lower density-scale
//! override and/or a smaller particle count, then sits out a cooldown
//! window. Quality is never raised again within a session.

use log::info;

/// Seed value for the average, one 60Hz frame rounded down.
pub const INITIAL_FRAME_MS: f32 = 16.0;
pub const SMOOTHING: f32 = 0.1;
/// Average frame time above which a downgrade is considered.
pub const SLOW_FRAME_MS: f32 = 22.0;
pub const COOLDOWN_FRAMES: u32 = 90;
/// Scale the override is pulled down to on a downgrade.
pub const DOWNGRADED_SCALE: f32 = 1.25;
pub const COUNT_FACTOR: f32 = 0.75;
/// Particle count floor for count reductions.
pub const MIN_PARTICLES: usize = 200;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PerfState {
    Stable,
    Cooldown { frames_remaining: u32 },
}

/// What the engine should apply after a slow stretch.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Downgrade {
    /// New density-scale override, never above the previous one.
    pub scale_override: f32,
    /// Upper bound for the new particle count.
    pub particle_count: usize,
}

#[derive(Clone, Debug)]
pub struct PerformanceMonitor {
    avg_frame_ms: f32,
    state: PerfState,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            avg_frame_ms: INITIAL_FRAME_MS,
            state: PerfState::Stable,
        }
    }

    pub fn avg_frame_ms(&self) -> f32 {
        self.avg_frame_ms
    }

    pub fn state(&self) -> PerfState {
        self.state
    }

    /// Feed one frame's duration.
    ///
    /// `current_scale` is the effective density scale in use,
    /// `scale_override` the active override and `particle_count` the live
    /// count. Returns a downgrade when one should be applied; the monitor
    /// has already entered cooldown in that case.
    pub fn observe(
        &mut self,
        frame_ms: f32,
        current_scale: f32,
        scale_override: Option<f32>,
        particle_count: usize,
    ) -> Option<Downgrade> {
        self.avg_frame_ms = self.avg_frame_ms * (1.0 - SMOOTHING) + frame_ms * SMOOTHING;

        if let PerfState::Cooldown { frames_remaining } = self.state {
            let frames_remaining = frames_remaining.saturating_sub(1);
            self.state = if frames_remaining == 0 {
                PerfState::Stable
            } else {
                PerfState::Cooldown { frames_remaining }
            };
            return None;
        }

        if self.avg_frame_ms <= SLOW_FRAME_MS {
            return None;
        }

        let lowered_scale = current_scale.max(1.0).min(DOWNGRADED_SCALE);
        let active = scale_override.unwrap_or(current_scale);
        let reduced_count =
            MIN_PARTICLES.max(libm::floorf(particle_count as f32 * COUNT_FACTOR) as usize);

        if lowered_scale >= active && reduced_count >= particle_count {
            return None;
        }

        let downgrade = Downgrade {
            scale_override: active.min(lowered_scale),
            particle_count: reduced_count,
        };
        info!(
            "Frame time {:.1}ms over budget: scale {:.2} -> {:.2}, particles {} -> at most {}",
            self.avg_frame_ms, active, downgrade.scale_override, particle_count, reduced_count
        );
        self.state = PerfState::Cooldown {
            frames_remaining: COOLDOWN_FRAMES,
        };
        Some(downgrade)
    }
}
