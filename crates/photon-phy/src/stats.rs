//! Occupancy and photon count statistics.

use std::fmt;

/// Photon counts at or above this value share the last histogram bin.
pub const HISTOGRAM_MAX: usize = 20;

/// Statistics of a pulse to photon conversion.
///
/// An occupied slot is a slot holding a pulse. An erasure is an occupied slot where no photon was
/// detected.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotonStats {
    expected_erasure_rate: f64,
    total_slots: u64,
    occupied_slots: u64,
    histogram: [u64; HISTOGRAM_MAX + 1],
}

impl PhotonStats {
    /// Create empty statistics for a conversion whose probability of zero photons per pulse is
    /// `expected_erasure_rate`.
    pub fn new(expected_erasure_rate: f64) -> Self {
        Self {
            expected_erasure_rate,
            total_slots: 0,
            occupied_slots: 0,
            histogram: [0; HISTOGRAM_MAX + 1],
        }
    }

    pub(crate) fn add_slots(&mut self, n: usize) {
        self.total_slots += n as u64;
    }

    /// Record the number of photons detected in one occupied slot.
    pub(crate) fn record(&mut self, photons: u64) {
        self.occupied_slots += 1;
        self.histogram[(photons as usize).min(HISTOGRAM_MAX)] += 1;
    }

    /// Add the statistics of a disjoint set of slots to these.
    pub fn absorb(&mut self, other: &Self) {
        self.total_slots += other.total_slots;
        self.occupied_slots += other.occupied_slots;
        for (a, b) in self.histogram.iter_mut().zip(&other.histogram) {
            *a += b;
        }
    }

    /// Combine statistics of two disjoint sets of slots.
    pub fn merge(mut self, other: Self) -> Self {
        self.absorb(&other);
        self
    }

    pub fn total_slots(&self) -> u64 {
        self.total_slots
    }

    pub fn occupied_slots(&self) -> u64 {
        self.occupied_slots
    }

    pub fn erasures(&self) -> u64 {
        self.histogram[0]
    }

    /// Number of occupied slots for each photon count, the last bin collects all counts of
    /// [`HISTOGRAM_MAX`] and above.
    pub fn histogram(&self) -> &[u64; HISTOGRAM_MAX + 1] {
        &self.histogram
    }

    /// Fraction of occupied slots, `None` for an empty input.
    pub fn average_power(&self) -> Option<f64> {
        ratio(self.occupied_slots, self.total_slots)
    }

    /// Peak power (one for an occupied slot) over the average power.
    pub fn peak_to_average_power(&self) -> Option<f64> {
        ratio(self.total_slots, self.occupied_slots)
    }

    pub fn expected_erasure_rate(&self) -> f64 {
        self.expected_erasure_rate
    }

    /// Fraction of occupied slots that received zero photons.
    pub fn measured_erasure_rate(&self) -> Option<f64> {
        ratio(self.erasures(), self.occupied_slots)
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator != 0).then(|| numerator as f64 / denominator as f64)
}

struct Maybe(Option<f64>);

impl fmt::Display for Maybe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.6}"),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for PhotonStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total slots processed = {}", self.total_slots)?;
        writeln!(
            f,
            "Those occupied with a pulse = {} (fraction = {})",
            self.occupied_slots,
            Maybe(self.average_power())
        )?;
        writeln!(
            f,
            "Peak-to-Average Power Ratio = {}",
            Maybe(self.peak_to_average_power())
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Expected erasure rate = {:.6}",
            self.expected_erasure_rate
        )?;
        writeln!(
            f,
            "Measured erasure rate = {}",
            Maybe(self.measured_erasure_rate())
        )?;
        writeln!(f, "Histogram of photon counts:")?;
        writeln!(f, "  count     number")?;
        for (count, number) in self.histogram.iter().enumerate() {
            if count == HISTOGRAM_MAX {
                writeln!(f, "  {count:>3}+     {number}")?;
            } else {
                writeln!(f, "  {count:>3}      {number}")?;
            }
        }
        Ok(())
    }
}
