//! Conversion of pulses to Poisson-distributed photon counts.

use std::io::{BufRead, Write};

use knuth_poisson::prelude::*;
use log::{debug, info};
use rand::Rng;

use crate::{PhyConfig, Result, reader::PulseReader, stats::PhotonStats, writer::PhotonWriter};

/// Number of slots handled by one task when converting in parallel.
#[cfg(feature = "parallel")]
const PARALLEL_BLOCK: usize = 1 << 16;

/// Replaces every pulse with the number of photons detected for it.
#[derive(Clone, Debug)]
pub struct PhotonConverter {
    poisson: PoissonKnuth,
    stats: PhotonStats,
}

impl PhotonConverter {
    /// Create a converter detecting `mean_detected_photons` photons per pulse on average.
    pub fn new(mean_detected_photons: f64) -> Result<Self> {
        let poisson = PoissonKnuth::new(mean_detected_photons)?;
        Ok(Self {
            poisson,
            stats: PhotonStats::new(poisson.threshold()),
        })
    }

    /// Convert a chunk of pulse slots in place.
    ///
    /// Slots equal to 1 are replaced by a Poisson sample, all other slots are left untouched.
    ///
    /// With the `parallel` feature, large chunks are split into blocks converted in parallel,
    /// each block with its own generator seeded from `rng`. The result only depends on the
    /// state of `rng`, not on the number of threads.
    pub fn convert_chunk<G: Rng + ?Sized>(&mut self, slots: &mut [u32], rng: &mut G) {
        self.stats.add_slots(slots.len());

        #[cfg(feature = "parallel")]
        if slots.len() > PARALLEL_BLOCK {
            let stats = par_convert(&self.poisson, slots, rng);
            self.stats.absorb(&stats);
            return;
        }

        convert_block(&self.poisson, slots, rng, &mut self.stats);
    }

    pub fn stats(&self) -> &PhotonStats {
        &self.stats
    }

    pub fn into_stats(self) -> PhotonStats {
        self.stats
    }
}

fn convert_block<S: UniformSource + ?Sized>(
    poisson: &PoissonKnuth,
    slots: &mut [u32],
    source: &mut S,
    stats: &mut PhotonStats,
) {
    for slot in slots.iter_mut().filter(|slot| **slot == 1) {
        let photons = poisson.sample_from(source);
        *slot = photons.min(u32::MAX as u64) as u32;
        stats.record(photons);
    }
}

#[cfg(feature = "parallel")]
fn par_convert<G: Rng + ?Sized>(
    poisson: &PoissonKnuth,
    slots: &mut [u32],
    rng: &mut G,
) -> PhotonStats {
    use rand::{SeedableRng, rngs::SmallRng};
    use rayon::prelude::*;

    let seeds: Vec<u64> = (0..slots.len().div_ceil(PARALLEL_BLOCK))
        .map(|_| rng.random())
        .collect();
    let empty = || PhotonStats::new(poisson.threshold());

    slots
        .par_chunks_mut(PARALLEL_BLOCK)
        .zip(seeds)
        .map(|(block, seed)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut stats = empty();
            convert_block(poisson, block, &mut rng, &mut stats);
            stats
        })
        .reduce(empty, PhotonStats::merge)
}

/// Convert a whole pulse file into a photon count file of the same format.
///
/// The input is processed one chunk at a time, see [`PhyConfig`] for the chunk sizes.
pub fn convert<R, W, G>(
    input: R,
    output: W,
    config: &PhyConfig,
    rng: &mut G,
) -> Result<PhotonStats>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut converter = PhotonConverter::new(config.mean_detected_photons)?;
    let mut reader = PulseReader::new(input, config.format)
        .chunk_slots(config.chunk_slots)
        .chunk_words(config.chunk_words);
    let mut writer = PhotonWriter::new(output, config.format);

    info!("converting pulses ({}) to photon counts", config.format);
    info!(
        "mean number of detected photons per incident pulse = {}",
        config.mean_detected_photons
    );

    let mut slots = Vec::new();
    let mut chunk = 0;
    while !reader.is_eof() {
        chunk += 1;
        let n_slots = reader.read_chunk(&mut slots)?;
        converter.convert_chunk(&mut slots, rng);
        let n_written = writer.write_chunk(&slots)?;
        debug!("chunk {chunk}: {n_slots} slots, {n_written} values written");
    }
    writer.flush()?;

    let stats = converter.into_stats();
    info!("processed {} slots in {chunk} chunks", stats.total_slots());
    Ok(stats)
}
