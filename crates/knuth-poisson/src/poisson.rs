//! Poisson distribution sampled with Knuth's multiplicative method.

use rand::{Rng, distr::Distribution};

use crate::{Error, Result, source::UniformSource};

/// A Poisson distribution sampler using Knuth's algorithm.
///
/// Each sample multiplies uniform draws until the running product falls to `exp(-lambda)` or
/// below, so a sample `k` costs exactly `k + 1` draws. This is only suitable for small and
/// moderate lambda values, the expected cost grows linearly with lambda.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoissonKnuth {
    lambda: f64,
    exp_lambda: f64,
}

impl PoissonKnuth {
    /// Create a new Poisson distribution with the given lambda.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if lambda is not finite or not positive.
    /// - [`Error::Unsupported`] if `exp(-lambda)` is not a normal float (lambda above about
    ///   708.4), where the multiplicative loop would compare against zero or subnormal values.
    pub fn new(lambda: f64) -> Result<Self> {
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(Error::InvalidParameter(lambda));
        }
        let exp_lambda = (-lambda).exp();
        if !exp_lambda.is_normal() {
            return Err(Error::Unsupported(lambda));
        }
        Ok(Self { lambda, exp_lambda })
    }

    /// The mean of the distribution.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// The stopping threshold `exp(-lambda)`, which is also the probability of sampling zero.
    pub fn threshold(&self) -> f64 {
        self.exp_lambda
    }

    /// Draw one sample using the given uniform source.
    #[inline]
    pub fn sample_from<S: UniformSource + ?Sized>(&self, source: &mut S) -> u64 {
        // Knuth algorithm, the first draw is taken unconditionally as exp_lambda rounds to 1.0
        // for tiny lambda
        let mut k = 0;
        let mut p = source.next_uniform();
        while p > self.exp_lambda {
            k += 1;
            p *= source.next_uniform();
        }
        k
    }

    /// Probability mass `lambda^k * exp(-lambda) / k!`, evaluated in log space.
    pub fn pmf(&self, k: u64) -> f64 {
        let ln_factorial: f64 = (2..=k).map(|i| (i as f64).ln()).sum();
        (k as f64 * self.lambda.ln() - self.lambda - ln_factorial).exp()
    }
}

impl Distribution<u64> for PoissonKnuth {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.sample_from(rng)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;
    use crate::source::Replay;

    const SAMPLE_SIZE: usize = 100_000;

    fn samples(lambda: f64, seed: u64) -> Vec<u64> {
        PoissonKnuth::new(lambda)
            .unwrap()
            .sample_iter(SmallRng::seed_from_u64(seed))
            .take(SAMPLE_SIZE)
            .collect()
    }

    #[test]
    fn test_poisson_new() {
        assert!(PoissonKnuth::new(1.5).is_ok());
        assert!(PoissonKnuth::new(700.0).is_ok());
        assert!(PoissonKnuth::new(f64::MIN_POSITIVE).is_ok());

        assert_eq!(PoissonKnuth::new(0.0), Err(Error::InvalidParameter(0.0)));
        assert_eq!(PoissonKnuth::new(-1.0), Err(Error::InvalidParameter(-1.0)));
        assert_eq!(
            PoissonKnuth::new(f64::INFINITY),
            Err(Error::InvalidParameter(f64::INFINITY))
        );
        assert_eq!(
            PoissonKnuth::new(f64::NEG_INFINITY),
            Err(Error::InvalidParameter(f64::NEG_INFINITY))
        );
        assert!(matches!(
            PoissonKnuth::new(f64::NAN),
            Err(Error::InvalidParameter(lambda)) if lambda.is_nan()
        ));
    }

    #[test]
    fn test_underflow_boundary() {
        // exp(-1000) is exactly zero in double precision
        assert_eq!((-1000.0f64).exp(), 0.0);
        assert_eq!(PoissonKnuth::new(1000.0), Err(Error::Unsupported(1000.0)));
        // exp(-709) is already subnormal
        assert_eq!(PoissonKnuth::new(709.0), Err(Error::Unsupported(709.0)));

        let poisson = PoissonKnuth::new(708.0).unwrap();
        assert!(poisson.threshold().is_normal());
        let mut rng = SmallRng::seed_from_u64(42);
        let k = poisson.sample_from(&mut rng);
        assert!((500..=900).contains(&k));
    }

    #[test]
    fn test_tiny_lambda() {
        let poisson = PoissonKnuth::new(1e-300).unwrap();
        assert_eq!(poisson.threshold(), 1.0);
        let mut source = Replay::new([0.999_999]).unwrap();
        assert_eq!(poisson.sample_from(&mut source), 0);
        assert_eq!(source.draws(), 1);
    }

    #[test]
    fn test_hand_fed_sequence() {
        // 0.9, 0.45 stay above exp(-1) ~ 0.368, 0.225 does not
        let poisson = PoissonKnuth::new(1.0).unwrap();
        let mut source = Replay::new([0.9, 0.5, 0.5]).unwrap();
        assert_eq!(poisson.sample_from(&mut source), 2);
        assert_eq!(source.draws(), 3);

        // The first draw already falls below the threshold
        let mut source = Replay::new([0.1]).unwrap();
        assert_eq!(poisson.sample_from(&mut source), 0);
        assert_eq!(source.draws(), 1);

        // Reproducible across calls
        let mut source = Replay::new([0.99]).unwrap();
        let k1 = poisson.sample_from(&mut source);
        let k2 = poisson.sample_from(&mut source);
        // 0.99^k <= exp(-1) first holds at k = 100
        assert_eq!(k1, 99);
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_draws_per_sample() {
        struct Counting {
            rng: SmallRng,
            draws: u64,
        }

        impl UniformSource for Counting {
            fn next_uniform(&mut self) -> f64 {
                self.draws += 1;
                self.rng.next_uniform()
            }
        }

        let poisson = PoissonKnuth::new(4.0).unwrap();
        let mut source = Counting {
            rng: SmallRng::seed_from_u64(7),
            draws: 0,
        };
        for _ in 0..1000 {
            let before = source.draws;
            let k = poisson.sample_from(&mut source);
            assert_eq!(source.draws - before, k + 1);
        }
    }

    #[test]
    fn test_free_sample() {
        let mut source = Replay::new([0.9, 0.5, 0.5]).unwrap();
        assert_eq!(crate::sample(1.0, &mut source), Ok(2));
        assert_eq!(crate::sample(0.0, &mut source), Err(Error::InvalidParameter(0.0)));
        // Rejected rates consume nothing
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_poisson_distribution_stats() {
        // For Poisson distribution, mean equals variance equals lambda
        let lambda = 10.0;
        let samples = samples(lambda, 42);

        let mean = samples.iter().sum::<u64>() as f64 / samples.len() as f64;
        assert!((mean - lambda).abs() < 0.1, "mean = {mean}");

        let second_moment =
            samples.iter().map(|&x| x.pow(2)).sum::<u64>() as f64 / samples.len() as f64;
        let variance = second_moment - mean.powi(2);
        assert!((variance - lambda).abs() < 0.3, "variance = {variance}");
    }

    #[test]
    fn test_poisson_distribution_shape() {
        let lambda = 10.0;
        let poisson = PoissonKnuth::new(lambda).unwrap();
        let samples = samples(lambda, 1234);

        let mut counts = vec![0usize; 64];
        for &k in &samples {
            counts[(k as usize).min(63)] += 1;
        }
        for (k, &count) in counts.iter().enumerate().take(21) {
            let observed = count as f64 / samples.len() as f64;
            let expected = poisson.pmf(k as u64);
            assert!(
                (observed - expected).abs() < 0.006,
                "k = {k}, observed = {observed}, expected = {expected}"
            );
        }
    }

    #[test]
    fn test_small_lambda() {
        let lambda = 0.2;
        let samples = samples(lambda, 3);
        let zeros = samples.iter().filter(|&&k| k == 0).count() as f64 / samples.len() as f64;
        assert!((zeros - (-lambda).exp()).abs() < 0.01, "zeros = {zeros}");
        assert!(samples.iter().all(|&k| k < 10));
    }

    #[test]
    fn test_pmf() {
        let poisson = PoissonKnuth::new(2.0).unwrap();
        assert!((poisson.pmf(0) - (-2.0f64).exp()).abs() < 1e-12);
        assert!((poisson.pmf(3) - 8.0 / 6.0 * (-2.0f64).exp()).abs() < 1e-12);
        let total: f64 = (0..50).map(|k| poisson.pmf(k)).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
