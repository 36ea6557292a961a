//! A binary channel introducing erasures and noise into slot sequences.
//!
//! Slot files handled here are ASCII run-length lists: alternating counts of empty and occupied
//! slots, starting with empty ones. `3 2 1` means three empty slots, two pulses, one empty slot.

use std::io::{BufRead, Read, Write};

use log::debug;
use rand::{
    Rng,
    distr::{Bernoulli, Distribution},
};

use crate::{Error, Result};

/// Expand alternating run lengths into slots holding 0 or 1.
pub fn runs_to_slots(runs: &[u32]) -> Vec<u8> {
    let len = runs.iter().map(|&run| run as usize).sum();
    let mut slots = Vec::with_capacity(len);
    for (i, &run) in runs.iter().enumerate() {
        let value = (i % 2) as u8;
        slots.resize(slots.len() + run as usize, value);
    }
    slots
}

/// Compress slots into alternating run lengths, the inverse of [`runs_to_slots`].
///
/// Any non-zero slot counts as occupied.
pub fn slots_to_runs(slots: &[u8]) -> Vec<u32> {
    let mut runs = Vec::new();
    let mut occupied = false;
    let mut run = 0;
    for &slot in slots {
        if (slot != 0) != occupied {
            runs.push(run);
            run = 0;
            occupied = !occupied;
        }
        run += 1;
    }
    if run > 0 {
        runs.push(run);
    }
    runs
}

/// Read whitespace separated run lengths.
pub fn read_runs<R: BufRead>(mut input: R) -> Result<Vec<u32>> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    tokens(&text)
        .map(|(offset, token)| {
            token.parse().map_err(|_| Error::InvalidContent {
                offset: offset as u64,
                found: format!("{token:?}"),
            })
        })
        .collect()
}

/// Whitespace separated tokens of `text` with their byte offsets.
fn tokens(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = text.char_indices().peekable();
    std::iter::from_fn(move || {
        while rest.next_if(|(_, c)| c.is_ascii_whitespace()).is_some() {}
        let (start, _) = *rest.peek()?;
        let mut end = text.len();
        while let Some(&(i, c)) = rest.peek() {
            if c.is_ascii_whitespace() {
                end = i;
                break;
            }
            rest.next();
        }
        Some((start, &text[start..end]))
    })
}

/// Write run lengths separated by spaces, ending with a newline.
pub fn write_runs<W: Write>(mut output: W, runs: &[u32]) -> Result<()> {
    for run in runs {
        write!(output, "{run} ")?;
    }
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

/// Number of slots changed by one pass through an [`ErasureChannel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Pulses turned into empty slots.
    pub erased: u64,
    /// Empty slots turned into pulses.
    pub injected: u64,
}

/// A channel that erases pulses and injects noise pulses independently per slot.
#[derive(Clone, Copy, Debug)]
pub struct ErasureChannel {
    erasure: Bernoulli,
    noise: Bernoulli,
}

impl ErasureChannel {
    /// Create a channel erasing each pulse with `erasure_probability` and turning each empty slot
    /// into a pulse with `noise_probability`.
    pub fn new(erasure_probability: f64, noise_probability: f64) -> Result<Self> {
        let bernoulli = |p: f64| Bernoulli::new(p).map_err(|_| Error::InvalidProbability(p));
        Ok(Self {
            erasure: bernoulli(erasure_probability)?,
            noise: bernoulli(noise_probability)?,
        })
    }

    /// Pass slots through the channel.
    ///
    /// Erasures are applied to the whole sequence first, noise second, so an erased slot may
    /// be occupied again by noise.
    pub fn apply<G: Rng + ?Sized>(&self, slots: &mut [u8], rng: &mut G) -> ChannelStats {
        let mut stats = ChannelStats::default();
        for slot in slots.iter_mut().filter(|slot| **slot != 0) {
            if self.erasure.sample(rng) {
                *slot = 0;
                stats.erased += 1;
            }
        }
        for slot in slots.iter_mut().filter(|slot| **slot == 0) {
            if self.noise.sample(rng) {
                *slot = 1;
                stats.injected += 1;
            }
        }
        debug!(
            "{} slots: {} erased, {} injected",
            slots.len(),
            stats.erased,
            stats.injected
        );
        stats
    }
}
