//! Run-length encoding of slot sequences.
//!
//! A compressed stream is a sequence of groups, each group is a run of zero slots followed by a
//! single value word:
//!
//! - The run length is written as one or more words. A word equal to [`CONTINUE_RUN`] adds
//!   65535 zeros and the run continues with the next word, any smaller word ends the run.
//! - The value word is the non-zero slot that ends the run (1 for a pulse, or a photon count),
//!   or 0 when the run of zeros ends without an occupied slot.
//!
//! For example `[0, 0, 1, 0, 0, 0]` is encoded as `[2, 1, 3, 0]`.

use crate::{Error, Result};

/// A run-length word meaning "65535 zeros, continued by the next word".
pub const CONTINUE_RUN: u16 = u16::MAX;

/// Encode slots into run-length words, appending them to `words`.
///
/// Slot values above 65535 saturate.
pub fn encode(slots: &[u32], words: &mut Vec<u16>) {
    let mut run = 0;
    for &slot in slots {
        if slot == 0 {
            run += 1;
        } else {
            push_run(run, words);
            words.push(slot.min(u16::MAX as u32) as u16);
            run = 0;
        }
    }
    if run > 0 {
        push_run(run, words);
        words.push(0);
    }
}

fn push_run(mut run: usize, words: &mut Vec<u16>) {
    while run >= CONTINUE_RUN as usize {
        words.push(CONTINUE_RUN);
        run -= CONTINUE_RUN as usize;
    }
    words.push(run as u16);
}

/// Decode run-length words, appending the slots to `slots`.
///
/// # Errors
///
/// [`Error::Truncated`] if the words end before a group is complete.
pub fn decode(words: &[u16], slots: &mut Vec<u32>) -> Result<()> {
    let mut words = words.iter().copied();
    while let Some(mut word) = words.next() {
        let mut run = word as usize;
        while word == CONTINUE_RUN {
            word = words.next().ok_or(Error::Truncated)?;
            run += word as usize;
        }
        let value = words.next().ok_or(Error::Truncated)?;
        slots.resize(slots.len() + run, 0);
        if value != 0 {
            slots.push(value as u32);
        }
    }
    Ok(())
}
