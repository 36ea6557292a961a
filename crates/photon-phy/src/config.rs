use crate::format::PulseFormat;

/// Default mean number of detected photons in a slot per incident pulse.
pub const DEFAULT_MEAN_DETECTED_PHOTONS: f64 = 0.2;

/// Nominal number of 16-bit words read per chunk from compressed files.
pub const COMPRESSED_CHUNK_WORDS: usize = 1000;

/// Maximum number of slots read per chunk from uncompressed files.
pub const UNCOMPRESSED_CHUNK_SLOTS: usize = 100_000_000;

/// Settings of a pulse to photon conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhyConfig {
    /// Format of both the pulse input and the photon output.
    pub format: PulseFormat,
    /// Mean number of detected photons per incident pulse, the Poisson rate.
    pub mean_detected_photons: f64,
    /// Maximum number of slots read per chunk from uncompressed input.
    pub chunk_slots: usize,
    /// Nominal number of 16-bit words read per chunk from compressed input.
    pub chunk_words: usize,
}

impl Default for PhyConfig {
    fn default() -> Self {
        Self {
            format: PulseFormat::default(),
            mean_detected_photons: DEFAULT_MEAN_DETECTED_PHOTONS,
            chunk_slots: UNCOMPRESSED_CHUNK_SLOTS,
            chunk_words: COMPRESSED_CHUNK_WORDS,
        }
    }
}
