use thiserror::Error;

pub type CameraResult<T> = Result<T, CameraError>;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera bundle must hold {expected} floats, got {got}")]
    BundleLength { expected: usize, got: usize },

    #[error("camera bundle cast failed: {0}")]
    Cast(String),
}
