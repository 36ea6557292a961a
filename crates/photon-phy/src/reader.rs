//! Chunked reading of pulse files.

use std::io::{BufRead, Bytes, Read};

use log::debug;

use crate::{
    COMPRESSED_CHUNK_WORDS, Error, Result, UNCOMPRESSED_CHUNK_SLOTS,
    format::{Compression, Encoding, PulseFormat},
    rle,
};

/// Reads a pulse file one chunk of slots at a time.
///
/// Pulse slots hold 0 (empty) or 1 (pulse), anything else is rejected. In ASCII files whitespace
/// between values is ignored.
pub struct PulseReader<R> {
    bytes: Bytes<R>,
    format: PulseFormat,
    chunk_slots: usize,
    chunk_words: usize,
    offset: u64,
    eof: bool,
    words: Vec<u16>,
}

impl<R: BufRead> PulseReader<R> {
    pub fn new(input: R, format: PulseFormat) -> Self {
        Self {
            bytes: input.bytes(),
            format,
            chunk_slots: UNCOMPRESSED_CHUNK_SLOTS,
            chunk_words: COMPRESSED_CHUNK_WORDS,
            offset: 0,
            eof: false,
            words: Vec::new(),
        }
    }

    /// Set the maximum number of slots read per chunk from uncompressed files.
    pub fn chunk_slots(mut self, chunk_slots: usize) -> Self {
        self.chunk_slots = chunk_slots.max(1);
        self
    }

    /// Set the nominal number of words read per chunk from compressed files.
    ///
    /// A chunk always ends on a complete run-length group, so it may hold a few more words.
    pub fn chunk_words(mut self, chunk_words: usize) -> Self {
        self.chunk_words = chunk_words.max(1);
        self
    }

    /// Whether the end of the input has been reached.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Read the next chunk into `slots`, replacing its content.
    ///
    /// Returns the number of slots read, which is zero once the input is exhausted.
    pub fn read_chunk(&mut self, slots: &mut Vec<u32>) -> Result<usize> {
        slots.clear();
        match self.format.compression {
            Compression::Raw => {
                while slots.len() < self.chunk_slots {
                    match self.read_slot()? {
                        Some(slot) => slots.push(slot),
                        None => {
                            self.reach_eof();
                            break;
                        }
                    }
                }
            }
            Compression::Rle => {
                let mut words = std::mem::take(&mut self.words);
                words.clear();
                while words.len() < self.chunk_words {
                    if !self.read_group(&mut words)? {
                        self.reach_eof();
                        break;
                    }
                }
                debug!("words this chunk = {}", words.len());
                let decoded = rle::decode(&words, slots);
                self.words = words;
                decoded?;
            }
        }
        Ok(slots.len())
    }

    fn reach_eof(&mut self) {
        debug!("reached end of input after {} bytes", self.offset);
        self.eof = true;
    }

    /// Read one run-length group into `words`, returns false at the end of input.
    fn read_group(&mut self, words: &mut Vec<u16>) -> Result<bool> {
        let Some(mut word) = self.read_word()? else {
            return Ok(false);
        };
        words.push(word);
        while word == rle::CONTINUE_RUN {
            word = self.read_word()?.ok_or(Error::Truncated)?;
            words.push(word);
        }

        let flag = self.read_word()?.ok_or(Error::Truncated)?;
        if flag > 1 {
            return Err(self.invalid(format!("pulse flag {flag}")));
        }
        words.push(flag);
        Ok(true)
    }

    fn read_slot(&mut self) -> Result<Option<u32>> {
        match self.format.encoding {
            Encoding::Ascii => match self.next_non_whitespace()? {
                None => Ok(None),
                Some(b'0') => Ok(Some(0)),
                Some(b'1') => Ok(Some(1)),
                Some(b) => Err(self.invalid(format!("{:?}", b as char))),
            },
            Encoding::Binary => match self.next_byte()? {
                None => Ok(None),
                Some(b @ (0 | 1)) => Ok(Some(b as u32)),
                Some(b) => Err(self.invalid(format!("byte {b:#04x}"))),
            },
        }
    }

    fn read_word(&mut self) -> Result<Option<u16>> {
        match self.format.encoding {
            Encoding::Ascii => {
                let Some(first) = self.next_non_whitespace()? else {
                    return Ok(None);
                };
                let mut value = self.digit(first)?;
                while let Some(b) = self.next_byte()? {
                    if b.is_ascii_whitespace() {
                        break;
                    }
                    value = value * 10 + self.digit(b)?;
                    if value > u16::MAX as u32 {
                        return Err(self.invalid("word above 65535".to_owned()));
                    }
                }
                Ok(Some(value as u16))
            }
            Encoding::Binary => {
                let Some(low) = self.next_byte()? else {
                    return Ok(None);
                };
                let high = self.next_byte()?.ok_or(Error::Truncated)?;
                Ok(Some(u16::from_le_bytes([low, high])))
            }
        }
    }

    fn digit(&self, b: u8) -> Result<u32> {
        if b.is_ascii_digit() {
            Ok((b - b'0') as u32)
        } else {
            Err(self.invalid(format!("{:?}", b as char)))
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        match self.bytes.next() {
            Some(byte) => {
                self.offset += 1;
                Ok(Some(byte?))
            }
            None => Ok(None),
        }
    }

    fn next_non_whitespace(&mut self) -> Result<Option<u8>> {
        while let Some(b) = self.next_byte()? {
            if !b.is_ascii_whitespace() {
                return Ok(Some(b));
            }
        }
        Ok(None)
    }

    /// Error for the most recently read byte.
    fn invalid(&self, found: String) -> Error {
        Error::InvalidContent {
            offset: self.offset.saturating_sub(1),
            found,
        }
    }
}
