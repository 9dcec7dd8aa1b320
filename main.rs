//! main.rs - Desktop simulator for the snowfall engine
//! Hosts the engine in an SDL window: supplies geometry, frame callbacks and
//! a drawing surface, and shows what the performance monitor is doing.

use core::fmt::Write as _;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use clap::Parser;
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use log::info;

use snowfall::density::effective_scale;
use snowfall::{Config, DrawTargetSurface, PerfState, Snowfall, TickId, TickSource};

#[derive(Parser, Debug)]
#[command(name = "snowfall")]
#[command(about = "Desktop simulator for the adaptive snowfall effect")]
struct Cli {
    /// Logical surface width
    #[arg(long, default_value_t = 480)]
    width: u32,

    /// Logical surface height
    #[arg(long, default_value_t = 270)]
    height: u32,

    /// Pixel density the simulated platform reports
    #[arg(long, default_value_t = 1.0)]
    platform_scale: f32,

    /// Particles at the 1920x1080 reference area
    #[arg(long, default_value_t = 2500.0)]
    amount: f32,

    #[arg(long, default_value_t = 4000)]
    max_particles: usize,

    #[arg(long, default_value_t = 2.0)]
    pixel_density_cap: f32,

    /// Start with the visible area already full of snow
    #[arg(long)]
    fill: bool,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Extra work per frame in milliseconds, to provoke a downgrade
    #[arg(long, default_value_t = 0)]
    stall_ms: u64,

    /// Window pixels per display pixel
    #[arg(long, default_value_t = 2)]
    window_scale: u32,
}

// Display stays at the size it was opened with. A lower buffer scale is
// emulated by snapping squares to the coarser buffer grid.
type SimSurface = DrawTargetSurface<SimulatorDisplay<Rgb888>>;

fn sim_surface(width: u32, height: u32, display_scale: f32, background: Rgb888) -> SimSurface {
    let size = Size::new(
        (width as f32 * display_scale).round() as u32,
        (height as f32 * display_scale).round() as u32,
    );
    DrawTargetSurface::with_display_scale(SimulatorDisplay::new(size), background, display_scale)
}

/// One pending frame at a time, fired by the main loop.
#[derive(Default)]
struct FrameScheduler {
    next_id: u64,
    pending: Option<TickId>,
}

impl FrameScheduler {
    fn fire(&mut self) -> Option<TickId> {
        self.pending.take()
    }
}

impl TickSource for FrameScheduler {
    fn request_tick(&mut self) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.pending = Some(id);
        id
    }

    fn cancel_tick(&mut self, id: TickId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }
}

fn draw_hud(snow: &mut Snowfall<SimSurface>) {
    let mut status: heapless::String<96> = heapless::String::new();
    let state = match snow.monitor().state() {
        PerfState::Stable => "stable",
        PerfState::Cooldown { .. } => "cooldown",
    };
    let _ = write!(
        &mut status,
        "{} flakes  x{:.2}  {:.1}ms  {}",
        snow.particle_count(),
        snow.effective_scale(),
        snow.monitor().avg_frame_ms(),
        if snow.is_paused() { "hidden" } else { state },
    );

    let style = MonoTextStyle::new(&FONT_6X10, Rgb888::new(90, 140, 200));
    Text::with_baseline(status.as_str(), Point::new(4, 4), style, Baseline::Top)
        .draw(snow.surface_mut().target_mut())
        .unwrap();
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ensure!(cli.fps > 0, "--fps must be positive");

    let config = Config {
        amount: cli.amount,
        max_particles: cli.max_particles,
        pixel_density_cap: cli.pixel_density_cap,
        initial_fill: cli.fill,
        ..Config::default()
    };

    let display_scale = effective_scale(cli.platform_scale, None, config.pixel_density_cap);
    let surface = sim_surface(cli.width, cli.height, display_scale, config.background);
    let mut snow = Snowfall::new(surface, config)?;
    snow.set_platform_scale(cli.platform_scale);
    snow.recompute_for_size(cli.width as f32, cli.height as f32);

    let output_settings = OutputSettingsBuilder::new()
        .scale(cli.window_scale.max(1))
        .build();
    let mut window = Window::new("Snowfall", &output_settings);

    println!("=== Snowfall simulator ===");
    println!("Controls:");
    println!("  H: Hide / show (visibility pause)");
    println!("  Q: Quit");
    info!(
        "{}x{} @ {:.2}, {} particles",
        cli.width,
        cli.height,
        snow.effective_scale(),
        snow.particle_count()
    );

    let mut scheduler = FrameScheduler::default();
    let frame_duration = Duration::from_secs_f64(1.0 / cli.fps as f64);
    let epoch = Instant::now();
    snow.start(&mut scheduler);

    'main_loop: loop {
        let frame_start = Instant::now();

        if scheduler.fire().is_some() {
            let now_ms = epoch.elapsed().as_secs_f64() * 1000.0;
            snow.tick(now_ms, &mut scheduler);
            if cli.stall_ms > 0 {
                thread::sleep(Duration::from_millis(cli.stall_ms));
            }
        }

        draw_hud(&mut snow);
        window.update(snow.surface().target());

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'main_loop,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    let key = format!("{:?}", keycode).to_lowercase();
                    match key.as_str() {
                        "h" => {
                            if snow.is_paused() {
                                snow.resume(&mut scheduler);
                                println!("Visible");
                            } else {
                                snow.pause(&mut scheduler);
                                println!("Hidden");
                            }
                        }
                        "q" => break 'main_loop,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    snow.destroy(&mut scheduler);
    println!("Thanks for watching the snow!");
    Ok(())
}
