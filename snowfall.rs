//! snowfall - Adaptive snowfall particle effect
//! no_std + alloc; drawing and frame scheduling are supplied by the host
//!
//! ```
//! use snowfall::{Config, ManualTicks, Snowfall, Surface};
//! # use snowfall::Rgb888;
//! # struct Canvas;
//! # impl Surface for Canvas {
//! #     fn clear(&mut self) {}
//! #     fn set_fill(&mut self, _: Rgb888) {}
//! #     fn fill_square(&mut self, _: f32, _: f32, _: f32) {}
//! #     fn resize_buffer(&mut self, _: u32, _: u32, _: f32) {}
//! # }
//! let mut ticks = ManualTicks::new();
//! let mut snow = Snowfall::new(Canvas, Config::default()).unwrap();
//! snow.recompute_for_size(1280.0, 720.0);
//! snow.start(&mut ticks);
//!
//! // One second of frames at 60Hz.
//! for frame in 0..60 {
//!     if ticks.take_due().is_none() {
//!         break;
//!     }
//!     snow.tick(frame as f64 * 16.7, &mut ticks);
//! }
//! assert!(snow.particle_count() > 0);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod density;
pub mod engine;
pub mod error;
pub mod performance;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod store;
pub mod surface;
pub mod trig;

pub use config::{Config, ConfigPatch, Range};
pub use engine::Snowfall;
pub use error::SnowfallError;
pub use performance::{Downgrade, PerfState, PerformanceMonitor};
pub use render::{DrawTargetSurface, Surface};
pub use scheduler::{ManualTicks, TickId, TickSource};
pub use store::{ParticleStore, SpawnMode};
pub use surface::{NoLookup, SurfaceId, SurfaceResolver, SurfaceSource};

/// Re-exported so hosts can name colours, including the `RgbColor`
/// constants, without depending on `embedded-graphics` directly.
pub use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
