#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Invalid Poisson rate")]
    Poisson(#[from] knuth_poisson::Error),

    #[error("Invalid content in input at byte {offset}: {found}")]
    InvalidContent { offset: u64, found: String },

    #[error("Input ends in the middle of a run-length group")]
    Truncated,

    #[error("Probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
