use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("x and y have different lengths ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },
    #[error("need at least {required} points, got {actual}")]
    TooFewPoints { required: usize, actual: usize },
    #[error("polynomial degree must be at least 1")]
    InvalidDegree,
    #[error("normal equations are singular")]
    Singular,
}
