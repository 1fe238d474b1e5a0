use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use crate::constants::*;
use crate::error::ConfigError;

#[derive(Parser, Debug, Clone)]
#[command(name = "scrollseq", version, about = "Scroll-scrubbed image sequence player")]
pub struct Args {
    /// Directory holding frame001.<format> .. frameNNN.<format>
    #[arg(default_value = "frames")]
    pub frames_dir: PathBuf,

    /// Base behaviour; the flags below override individual values
    #[arg(long, value_enum, default_value_t = Preset::TwoPhase)]
    pub preset: Preset,

    #[arg(long)]
    pub frame_count: Option<usize>,

    /// File extension of the frames (webp, png, jpg, ...)
    #[arg(long)]
    pub format: Option<String>,

    /// Fraction of the remaining distance covered per display tick
    #[arg(long)]
    pub smoothing: Option<f32>,

    /// Scroll span as a multiple of the window height
    #[arg(long)]
    pub span_factor: Option<f32>,

    /// Pixels scrolled per wheel notch or arrow key
    #[arg(long, default_value_t = WHEEL_STEP)]
    pub wheel_step: f32,

    #[arg(long, default_value_t = WINDOW_WIDTH)]
    pub width: i32,

    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    pub height: i32,

    #[arg(long, default_value_t = FPS)]
    pub fps: u32,

    /// Loader threads (defaults to available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Linear,
    Snapped,
    TwoPhase,
}

/// How trigger progress turns into a frame number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameMapping {
    /// One trigger over the whole span, `p * (N-1)`.
    Linear { scrub: f32 },
    /// Trigger A maps onto the first `split` of the frames, trigger B onto the rest.
    TwoPhase { split: f32, scrub: (f32, f32) },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Interpolated,
    Snapped,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub frames_dir: PathBuf,
    pub frame_count: usize,
    pub format: String,
    pub smoothing: f32,
    pub settle_epsilon: f32,
    pub span_factor: f32,
    pub mapping: FrameMapping,
    pub selection: Selection,
    pub wheel_step: f32,
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    pub workers: usize,
}

impl Preset {
    pub fn settings(self) -> Settings {
        let (frame_count, smoothing, mapping, selection) = match self {
            Preset::Linear => (120, 0.15, FrameMapping::Linear { scrub: 0.5 }, Selection::Interpolated),
            Preset::Snapped => (150, 0.2, FrameMapping::Linear { scrub: 0.3 }, Selection::Snapped),
            Preset::TwoPhase => (
                160,
                0.3,
                FrameMapping::TwoPhase { split: 0.9, scrub: (0.1, 0.5) },
                Selection::Interpolated,
            ),
        };

        Settings {
            frames_dir: PathBuf::from("frames"),
            frame_count,
            format: "webp".to_string(),
            smoothing,
            settle_epsilon: SETTLE_EPSILON,
            span_factor: SPAN_FACTOR,
            mapping,
            selection,
            wheel_step: WHEEL_STEP,
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            fps: FPS,
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .clamp(1, MAX_WORKERS)
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut settings = args.preset.settings();
        settings.frames_dir = args.frames_dir.clone();
        if let Some(n) = args.frame_count {
            settings.frame_count = n;
        }
        if let Some(format) = &args.format {
            settings.format = format.trim_start_matches('.').to_string();
        }
        if let Some(s) = args.smoothing {
            settings.smoothing = s;
        }
        if let Some(f) = args.span_factor {
            settings.span_factor = f;
        }
        if let Some(w) = args.workers {
            settings.workers = w.max(1);
        }
        settings.wheel_step = args.wheel_step;
        settings.width = args.width;
        settings.height = args.height;
        settings.fps = args.fps;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_count == 0 {
            return Err(ConfigError::NoFrames);
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        if self.format.is_empty() {
            return Err(ConfigError::EmptyFormat);
        }
        if !(self.span_factor > 0.0 && self.span_factor.is_finite()) {
            return Err(ConfigError::SpanFactor(self.span_factor));
        }
        if !(self.wheel_step > 0.0 && self.wheel_step.is_finite()) {
            return Err(ConfigError::WheelStep(self.wheel_step));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::WindowSize(self.width, self.height));
        }
        if !self.frames_dir.is_dir() {
            return Err(ConfigError::MissingDir(self.frames_dir.clone()));
        }
        Ok(())
    }
}
