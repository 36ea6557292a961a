#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("Poisson rate must be finite and positive, got {0}")]
    InvalidParameter(f64),

    #[error("Poisson rate {0} is too large, exp(-lambda) is not a normal float")]
    Unsupported(f64),

    #[error("Uniform value {0} is outside [0, 1)")]
    InvalidUniform(f64),

    #[error("Uniform sequence is empty")]
    EmptySequence,
}

pub type Result<T> = std::result::Result<T, Error>;
