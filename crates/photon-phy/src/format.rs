//! Layouts of pulse and photon slot files.

use std::fmt;

/// How values are stored in a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Human readable text.
    Ascii,
    /// Raw bytes (uncompressed) or little-endian 16-bit words (compressed).
    #[default]
    Binary,
}

/// Whether slots are stored one by one or run-length encoded.
///
/// See [`crate::rle`] for the run-length layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    #[default]
    Raw,
    Rle,
}

/// The format of a slot file. Photon files are written in the same format as the pulse file
/// they were converted from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PulseFormat {
    pub encoding: Encoding,
    pub compression: Compression,
}

impl PulseFormat {
    pub fn new(encoding: Encoding, compression: Compression) -> Self {
        Self {
            encoding,
            compression,
        }
    }

    /// Conventional file name suffix, e.g. `rle.txt` for compressed ASCII files.
    pub fn suffix(&self) -> &'static str {
        match (self.compression, self.encoding) {
            (Compression::Raw, Encoding::Ascii) => "txt",
            (Compression::Raw, Encoding::Binary) => "bin",
            (Compression::Rle, Encoding::Ascii) => "rle.txt",
            (Compression::Rle, Encoding::Binary) => "rle.bin",
        }
    }
}

impl fmt::Display for PulseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = match self.encoding {
            Encoding::Ascii => "ASCII text",
            Encoding::Binary => "binary",
        };
        let compression = match self.compression {
            Compression::Raw => "uncompressed",
            Compression::Rle => "compressed",
        };
        write!(f, "{encoding}, {compression}")
    }
}
