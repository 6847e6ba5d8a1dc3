//! # Enigma word-stream compression
//!
//! A reversible codec for streams of 16-bit words such as tile maps, where
//! each record combines a small numeric index with a handful of independent
//! flag bits.
//!
//! ## Format
//!
//! An archive is a six-byte header followed by an MSB-first bitstream of
//! blocks. Each block expands to between 1 and 16 words:
//!
//! - **Seed runs**: words counting up from a persistent incremental seed, or
//!   copies of a constant literal seed stored in the header
//! - **Inline runs**: one inline-copied word repeated, ascending or descending
//! - **Inline lists**: independent inline-copied words
//!
//! A dedicated terminator block ends the stream; the final byte is zero padded.
//!
//! ## Quick Start
//!
//! ```rust
//! use enigma::{compress_data, decompress_data};
//!
//! // Big-endian words: 0x0001, 0x0002, 0x0003
//! let original = [0x00u8, 0x01, 0x00, 0x02, 0x00, 0x03];
//! let compressed = compress_data(&original).unwrap();
//! let decompressed = decompress_data(&compressed).unwrap();
//! assert_eq!(original.to_vec(), decompressed);
//! ```
//!
//! ### Working with Files
//!
//! ```rust
//! use enigma::{pipeline, EnigmaConfig};
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut reader = BufReader::new(File::open("plane.bin")?);
//! let mut writer = BufWriter::new(File::create("plane.eni")?);
//!
//! let stats = pipeline::compress(&mut reader, &mut writer, &EnigmaConfig::default())?;
//! println!("Compression ratio: {:.2}x", stats.ratio);
//! # Ok(())
//! # }
//! ```

pub mod bitio;
pub mod block;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod matcher;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use bitio::{ByteSink, ByteSource, SliceSource};
pub use block::BlockMode;
pub use config::{EnigmaConfig, Strategy};
pub use decoder::{decode, DecodeStats};
pub use encoder::{encode, encode_words, EncodeStats};
pub use error::{EnigmaError, Result};
pub use header::{FlagMask, Header};
pub use pipeline::{ArchiveInfo, CompressionStats, DecompressionStats};

/// Compress big-endian word data in memory with the default configuration.
///
/// Block selection matches existing Enigma archives bit for bit.
///
/// # Example
///
/// ```rust
/// use enigma::compress_data;
///
/// let compressed = compress_data(&[]).unwrap();
/// assert_eq!(compressed, vec![11, 0x1F, 0, 0, 0, 0, 0xFE]);
/// ```
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    compress_data_with(data, &EnigmaConfig::default())
}

/// Compress big-endian word data in memory.
pub fn compress_data_with(data: &[u8], config: &EnigmaConfig) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    encode(data, &mut output, config)?;
    Ok(output)
}

/// Decompress an archive held in memory.
///
/// Bytes after the terminator block are ignored.
///
/// # Example
///
/// ```rust
/// use enigma::{decompress_data, EnigmaError};
///
/// let err = decompress_data(&[12, 0x1F, 0, 0, 0, 0, 0xFE]).unwrap_err();
/// assert!(matches!(err, EnigmaError::InvalidHeader { .. }));
/// ```
pub fn decompress_data(compressed_data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decode(SliceSource::new(compressed_data), &mut output)?;
    Ok(output)
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
