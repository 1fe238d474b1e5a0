use std::path::PathBuf;

pub type FrameResult<T> = Result<T, FrameError>;

/// A single frame that could not be turned into a drawable image.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("decoder panicked on {path:?}: {message}")]
    Panicked { path: PathBuf, message: String },

    #[error("texture upload failed for frame {index}: {message}")]
    Upload { index: usize, message: String },
}

/// Settings that cannot drive a player.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("frame count must be at least 1")]
    NoFrames,

    #[error("smoothing must be in (0, 1], got {0}")]
    Smoothing(f32),

    #[error("frame format must not be empty")]
    EmptyFormat,

    #[error("span factor must be positive, got {0}")]
    SpanFactor(f32),

    #[error("wheel step must be a positive number of pixels, got {0}")]
    WheelStep(f32),

    #[error("window size must be positive, got {0}x{1}")]
    WindowSize(i32, i32),

    #[error("frames directory {0:?} does not exist")]
    MissingDir(PathBuf),
}
