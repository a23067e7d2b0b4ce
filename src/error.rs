use thiserror::Error;

/// Rejected startup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("dome radius must be at least 1 (got {0})")]
    InvalidRadius(i64),
    #[error("shell thickness must be at least 1 (got {0})")]
    InvalidThickness(i64),
    #[error("shell thickness {thickness} exceeds radius + 1 ({limit})")]
    ThicknessTooLarge { thickness: i64, limit: i64 },
}

/// Failures confined to a single preview pipeline.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("no drawing surface available for the {0} preview")]
    SurfaceUnavailable(&'static str),
    #[error("drawing surface of the {0} preview is borrowed elsewhere")]
    SurfaceBusy(&'static str),
    #[error("drawing surface of {width}x{height} device pixels is too large")]
    SurfaceTooLarge { width: usize, height: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type PreviewResult<T> = Result<T, PreviewError>;
