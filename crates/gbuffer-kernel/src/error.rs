use thiserror::Error;

pub type KernelResult<T> = Result<T, KernelError>;

/// Precondition failures reported by the checked entry point.
///
/// The unchecked path never produces these; it relies on the caller.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("resolution must be non-zero, got {width}x{height}")]
    ZeroResolution { width: u32, height: u32 },

    #[error("buffer length {got} does not match width*height*4 = {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("mode {0} needs camera matrices")]
    MissingCamera(&'static str),

    #[error("config error: {0}")]
    Config(String),
}
