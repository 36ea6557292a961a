//! Writing photon counts in the format of the pulse file.

use std::io::Write;

use crate::{
    Result,
    format::{Compression, Encoding, PulseFormat},
    rle,
};

/// Writes chunks of photon counts.
///
/// ASCII values are followed by a single space. Uncompressed binary files hold one byte per slot,
/// so counts above 255 saturate.
pub struct PhotonWriter<W: Write> {
    output: W,
    format: PulseFormat,
    words: Vec<u16>,
    bytes: Vec<u8>,
}

impl<W: Write> PhotonWriter<W> {
    pub fn new(output: W, format: PulseFormat) -> Self {
        Self {
            output,
            format,
            words: Vec::new(),
            bytes: Vec::new(),
        }
    }

    /// Write one chunk of slots.
    ///
    /// Compressed chunks are encoded independently. Returns the number of values written, which
    /// is the number of slots for uncompressed files and the number of words otherwise.
    pub fn write_chunk(&mut self, slots: &[u32]) -> Result<usize> {
        match self.format.compression {
            Compression::Raw => {
                self.write_values(slots.iter().copied())?;
                Ok(slots.len())
            }
            Compression::Rle => {
                let mut words = std::mem::take(&mut self.words);
                words.clear();
                rle::encode(slots, &mut words);
                let written = self.write_values(words.iter().map(|&w| w as u32));
                self.words = words;
                written?;
                Ok(self.words.len())
            }
        }
    }

    fn write_values(&mut self, values: impl Iterator<Item = u32>) -> Result<()> {
        self.bytes.clear();
        match (self.format.encoding, self.format.compression) {
            (Encoding::Ascii, _) => {
                for value in values {
                    write!(self.bytes, "{value} ")?;
                }
            }
            (Encoding::Binary, Compression::Raw) => {
                self.bytes
                    .extend(values.map(|value| value.min(u8::MAX as u32) as u8));
            }
            (Encoding::Binary, Compression::Rle) => {
                self.bytes
                    .extend(values.flat_map(|value| (value as u16).to_le_bytes()));
            }
        }
        self.output.write_all(&self.bytes)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}
