//! engine - The snowfall effect bound to one drawing surface
//!
//! [`Snowfall`] owns every piece of mutable state: configuration, particle
//! store, performance monitor, RNG and loop bookkeeping. Hosts feed it
//! geometry, visibility changes and frame callbacks; it never reaches out to
//! the platform except through [`Surface`] and [`TickSource`].

use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::{Config, ConfigPatch};
use crate::density;
use crate::error::SnowfallError;
use crate::performance::PerformanceMonitor;
use crate::render::{self, Surface};
use crate::scheduler::{TickId, TickSource};
use crate::simulation;
use crate::store::{ParticleStore, SpawnMode};
use crate::surface::{SurfaceResolver, SurfaceSource};

#[derive(Copy, Clone, Debug, PartialEq)]
struct BufferSize {
    width_px: u32,
    height_px: u32,
    scale: f32,
}

pub struct Snowfall<S: Surface> {
    surface: S,
    config: Config,
    store: ParticleStore,
    monitor: PerformanceMonitor,
    rng: SmallRng,

    // Geometry, logical units
    width: f32,
    height: f32,
    platform_scale: f32,
    scale_override: Option<f32>,
    buffer: Option<BufferSize>,
    pending_size: Option<(f32, f32)>,

    // Loop state
    running: bool,
    pending_tick: Option<TickId>,
    paused_by_visibility: bool,
    last_frame_ms: Option<f64>,
}

impl<S: Surface> Snowfall<S> {
    /// Bind a new engine to `surface`. Nothing is spawned until the host
    /// reports a size through [`Snowfall::recompute_for_size`].
    pub fn new(surface: S, config: Config) -> Result<Self, SnowfallError> {
        config.validate()?;
        Ok(Self {
            surface,
            rng: SmallRng::seed_from_u64(config.rng_seed),
            config,
            store: ParticleStore::new(),
            monitor: PerformanceMonitor::new(),
            width: 0.0,
            height: 0.0,
            platform_scale: 1.0,
            scale_override: None,
            buffer: None,
            pending_size: None,
            running: false,
            pending_tick: None,
            paused_by_visibility: false,
            last_frame_ms: None,
        })
    }

    /// Resolve `source` once, then behave like [`Snowfall::new`].
    pub fn from_source<R>(
        source: SurfaceSource<S>,
        resolver: &mut R,
        config: Config,
    ) -> Result<Self, SnowfallError>
    where
        R: SurfaceResolver<Surface = S> + ?Sized,
    {
        let surface = source.resolve(resolver)?;
        Self::new(surface, config)
    }

    // ---- geometry -------------------------------------------------------

    /// Apply a new logical surface size immediately.
    pub fn recompute_for_size(&mut self, width: f32, height: f32) {
        self.pending_size = None;
        self.width = sanitize(width);
        self.height = sanitize(height);
        self.sync_buffer();
        self.reseed_to(self.target_count());
    }

    /// Queue a size change for the start of the next frame. Only the latest
    /// request survives, so bursts of resize events cost one reseed.
    pub fn request_resize(&mut self, width: f32, height: f32) {
        self.pending_size = Some((width, height));
    }

    /// Update the pixel density the platform reports for the surface.
    pub fn set_platform_scale(&mut self, scale: f32) {
        self.platform_scale = if scale.is_finite() { scale } else { 1.0 };
        self.sync_buffer();
        self.reseed_to(self.target_count());
    }

    pub fn effective_scale(&self) -> f32 {
        density::effective_scale(
            self.platform_scale,
            self.scale_override,
            self.config.pixel_density_cap,
        )
    }

    /// Particle count the current geometry and configuration call for.
    pub fn target_count(&self) -> usize {
        density::target_count(self.width, self.height, &self.config, self.effective_scale())
    }

    // ---- configuration --------------------------------------------------

    /// Merge `patch` over the current configuration. Only density changes
    /// (`amount`, `max_particles`, `pixel_density_cap`) touch the live field;
    /// everything else applies to later spawns and frames. The configuration
    /// is left untouched on error.
    pub fn update_config(&mut self, patch: &ConfigPatch) -> Result<(), SnowfallError> {
        let next = self.config.merge(patch);
        next.validate()?;
        if next.rng_seed != self.config.rng_seed {
            self.rng = SmallRng::seed_from_u64(next.rng_seed);
        }
        let density_changed = next.amount != self.config.amount
            || next.max_particles != self.config.max_particles
            || next.pixel_density_cap != self.config.pixel_density_cap;
        self.config = next;
        if density_changed {
            self.sync_buffer();
            self.reseed_to(self.target_count());
        }
        Ok(())
    }

    pub fn set_amount(&mut self, amount: f32) -> Result<(), SnowfallError> {
        self.update_config(&ConfigPatch {
            amount: Some(amount),
            ..ConfigPatch::default()
        })
    }

    pub fn set_max_particles(&mut self, max_particles: usize) -> Result<(), SnowfallError> {
        self.update_config(&ConfigPatch {
            max_particles: Some(max_particles),
            ..ConfigPatch::default()
        })
    }

    // ---- loop control ---------------------------------------------------

    /// Begin requesting frames. No-op while already running.
    pub fn start<T: TickSource + ?Sized>(&mut self, ticks: &mut T) {
        if self.running {
            return;
        }
        self.running = true;
        self.paused_by_visibility = false;
        self.last_frame_ms = None;
        self.pending_tick = Some(ticks.request_tick());
    }

    /// Stop requesting frames and withdraw the one in flight. No-op while
    /// stopped. A later [`Snowfall::resume`] will not restart the loop.
    pub fn stop<T: TickSource + ?Sized>(&mut self, ticks: &mut T) {
        self.paused_by_visibility = false;
        self.halt(ticks);
    }

    /// Surface hidden: stop, remembering whether there was a loop to stop.
    pub fn pause<T: TickSource + ?Sized>(&mut self, ticks: &mut T) {
        if self.running {
            self.halt(ticks);
            self.paused_by_visibility = true;
        }
    }

    /// Surface shown again: restart only if [`Snowfall::pause`] stopped it.
    pub fn resume<T: TickSource + ?Sized>(&mut self, ticks: &mut T) {
        if self.paused_by_visibility {
            self.start(ticks);
        }
    }

    /// Stop the loop and hand the surface back.
    pub fn destroy<T: TickSource + ?Sized>(mut self, ticks: &mut T) -> S {
        self.stop(ticks);
        self.surface
    }

    fn halt<T: TickSource + ?Sized>(&mut self, ticks: &mut T) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(id) = self.pending_tick.take() {
            ticks.cancel_tick(id);
        }
    }

    /// Frame callback. `now_ms` is a monotonic timestamp in milliseconds.
    ///
    /// Returns `false` without touching anything when the loop is stopped,
    /// which covers callbacks that fire after a stop raced them.
    pub fn tick<T: TickSource + ?Sized>(&mut self, now_ms: f64, ticks: &mut T) -> bool {
        if !self.running {
            return false;
        }
        self.pending_tick = None;

        if let Some((width, height)) = self.pending_size.take() {
            self.recompute_for_size(width, height);
        }

        // The first frame after a start has no interval to measure.
        let frame_ms = self.last_frame_ms.map(|last| (now_ms - last).max(0.0));
        self.last_frame_ms = Some(now_ms);
        let dt = frame_ms.unwrap_or(0.0) / 1000.0;

        self.surface.clear();
        simulation::advance(dt as f32, &mut self.store, self.width, self.height, &mut self.rng);
        render::draw(&mut self.surface, &self.store, self.config.color);
        if let Some(frame_ms) = frame_ms {
            self.adapt(frame_ms as f32);
        }

        self.pending_tick = Some(ticks.request_tick());
        true
    }

    // ---- internals ------------------------------------------------------

    fn adapt(&mut self, frame_ms: f32) {
        let downgrade = self.monitor.observe(
            frame_ms,
            self.effective_scale(),
            self.scale_override,
            self.store.len(),
        );
        let Some(downgrade) = downgrade else {
            return;
        };

        let lowered = match self.scale_override {
            Some(current) => current.min(downgrade.scale_override),
            None => downgrade.scale_override,
        };
        self.scale_override = Some(lowered);
        self.sync_buffer();

        let count = downgrade.particle_count.min(self.target_count());
        self.reseed_to(count);
    }

    fn reseed_to(&mut self, count: usize) {
        if count == self.store.len() {
            return;
        }
        debug!(
            "Reseeding {} -> {} particles for {}x{} @ {:.2}",
            self.store.len(),
            count,
            self.width,
            self.height,
            self.effective_scale()
        );
        let mode = SpawnMode::from_config(&self.config);
        self.store
            .reseed(count, self.width, self.height, &self.config, mode, &mut self.rng);
    }

    fn sync_buffer(&mut self) {
        let scale = self.effective_scale();
        let wanted = BufferSize {
            width_px: libm::roundf(self.width * scale) as u32,
            height_px: libm::roundf(self.height * scale) as u32,
            scale,
        };
        if self.buffer == Some(wanted) {
            return;
        }
        debug!(
            "Resizing buffer to {}x{} @ {:.2}",
            wanted.width_px, wanted.height_px, wanted.scale
        );
        self.surface
            .resize_buffer(wanted.width_px, wanted.height_px, wanted.scale);
        self.buffer = Some(wanted);
    }

    // ---- accessors ------------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    pub fn scale_override(&self) -> Option<f32> {
        self.scale_override
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stopped by [`Snowfall::pause`] and waiting for [`Snowfall::resume`].
    pub fn is_paused(&self) -> bool {
        self.paused_by_visibility
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

// Negative and NaN sizes collapse to an empty surface.
fn sanitize(v: f32) -> f32 {
    if v > 0.0 && v.is_finite() {
        v
    } else {
        0.0
    }
}
