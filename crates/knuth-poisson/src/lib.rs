#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![doc = include_str!("../README.md")]

mod error;
pub use error::{Error, Result};

pub mod poisson;
pub mod source;

pub mod prelude {
    //! Import of useful traits and types from the crate

    pub use rand::distr::Distribution;

    pub use crate::{
        poisson::PoissonKnuth,
        source::{Replay, UniformSource},
    };
}

use poisson::PoissonKnuth;
use source::UniformSource;

/// Draw one sample from a Poisson distribution with mean `lambda`.
///
/// This is a shortcut for [`PoissonKnuth::new`] followed by
/// [`PoissonKnuth::sample_from`]. Build the sampler once when drawing many values with the same
/// rate.
pub fn sample<S: UniformSource + ?Sized>(lambda: f64, source: &mut S) -> Result<u64> {
    Ok(PoissonKnuth::new(lambda)?.sample_from(source))
}
