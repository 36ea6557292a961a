//! Sources of uniform random numbers in `[0, 1)`.

use rand::{Rng, RngCore};

use crate::{Error, Result};

/// A generator of independent real values in the half-open interval `[0, 1)`.
///
/// This is the only source of randomness used by the samplers in this crate. Every
/// [`RngCore`] is a uniform source through [`Rng::random`], so seeded generators such as
/// `SmallRng` can be passed directly.
pub trait UniformSource {
    /// Draw the next value in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore + ?Sized> UniformSource for R {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// A deterministic source replaying a fixed sequence of uniform values.
///
/// The sequence restarts from the beginning once exhausted. The number of values drawn so far
/// is tracked, which makes it easy to check how much entropy a sampler consumed.
#[derive(Clone, Debug, PartialEq)]
pub struct Replay {
    values: Vec<f64>,
    position: usize,
    draws: u64,
}

impl Replay {
    /// Create a new replay source from a non-empty sequence of values in `[0, 1)`.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Result<Self> {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return Err(Error::EmptySequence);
        }
        if let Some(&u) = values.iter().find(|u| !(0.0..1.0).contains(*u)) {
            return Err(Error::InvalidUniform(u));
        }
        Ok(Self {
            values,
            position: 0,
            draws: 0,
        })
    }

    /// Number of values drawn since creation.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl UniformSource for Replay {
    fn next_uniform(&mut self) -> f64 {
        let u = self.values[self.position];
        self.position = (self.position + 1) % self.values.len();
        self.draws += 1;
        u
    }
}
