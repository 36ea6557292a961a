#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![doc = include_str!("../README.md")]

mod error;
pub use error::{Error, Result};

mod config;
pub use config::{
    COMPRESSED_CHUNK_WORDS, DEFAULT_MEAN_DETECTED_PHOTONS, PhyConfig, UNCOMPRESSED_CHUNK_SLOTS,
};

pub mod channel;
pub mod convert;
pub mod format;
pub mod reader;
pub mod rle;
pub mod stats;
pub mod writer;

pub mod prelude {
    //! Import of useful traits and types from the crate

    pub use crate::{
        PhyConfig,
        channel::{
            ChannelStats, ErasureChannel, read_runs, runs_to_slots, slots_to_runs, write_runs,
        },
        convert::{PhotonConverter, convert},
        format::{Compression, Encoding, PulseFormat},
        reader::PulseReader,
        stats::PhotonStats,
        writer::PhotonWriter,
    };
}
