use crate::bitio::SliceSource;
use crate::config::EnigmaConfig;
use crate::decoder::{self, DecodeStats};
use crate::encoder::{self, EncodeStats};
use crate::error::EnigmaError;
use crate::header::Header;
use log::info;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct CompressionStats {
	pub original_size: u64,
	pub compressed_size: u64,
	pub ratio: f64,
	pub blocks: usize,
	pub processing_time: Duration,
}

#[derive(Debug)]
pub struct DecompressionStats {
	pub compressed_size: u64,
	pub decompressed_size: u64,
	pub processing_time: Duration,
}

/// Header fields and block statistics of an archive.
#[derive(Debug)]
pub struct ArchiveInfo {
	pub header: Header,
	pub compressed_size: u64,
	pub original_size: u64,
	pub compression_ratio: f64,
	/// Blocks per mode, indexed by `BlockMode::index`.
	pub blocks: [usize; 6],
	/// Bytes after the terminator that the decoder never looked at.
	pub trailing_bytes: u64,
}

fn ratio(original: u64, compressed: u64) -> f64 {
	if compressed > 0 { original as f64 / compressed as f64 } else { 0.0 }
}

pub fn compress<R: Read, W: Write>(
	reader: &mut R,
	writer: &mut W,
	config: &EnigmaConfig,
) -> Result<CompressionStats, EnigmaError> {
	let start = Instant::now();
	let mut buffer = Vec::new();
	reader.read_to_end(&mut buffer)?;
	let original_size = buffer.len() as u64;

	let mut archive = Vec::new();
	let EncodeStats { blocks, .. } = encoder::encode(&buffer, &mut archive, config)?;
	writer.write_all(&archive)?;
	writer.flush()?;

	let compressed_size = archive.len() as u64;
	let stats = CompressionStats {
		original_size,
		compressed_size,
		ratio: ratio(original_size, compressed_size),
		blocks: blocks.iter().sum(),
		processing_time: start.elapsed(),
	};
	info!("compressed {} -> {} bytes ({:.2}x)", original_size, compressed_size, stats.ratio);
	Ok(stats)
}

pub fn decompress<R: Read, W: Write>(
	reader: &mut R,
	writer: &mut W,
) -> Result<DecompressionStats, EnigmaError> {
	let start = Instant::now();
	let mut archive = Vec::new();
	reader.read_to_end(&mut archive)?;

	let mut output = Vec::new();
	decoder::decode(SliceSource::new(&archive), &mut output)?;
	writer.write_all(&output)?;
	writer.flush()?;

	let stats = DecompressionStats {
		compressed_size: archive.len() as u64,
		decompressed_size: output.len() as u64,
		processing_time: start.elapsed(),
	};
	info!("decompressed {} -> {} bytes", stats.compressed_size, stats.decompressed_size);
	Ok(stats)
}

/// Decodes an archive without producing output and reports what it holds.
pub fn info<R: Read>(reader: &mut R) -> Result<ArchiveInfo, EnigmaError> {
	let mut archive = Vec::new();
	reader.read_to_end(&mut archive)?;

	/// Discards decoded bytes, keeping only their count.
	struct Discard(u64);
	impl crate::bitio::ByteSink for Discard {
		fn push(&mut self, _byte: u8) {
			self.0 += 1;
		}
	}

	let mut sink = Discard(0);
	let DecodeStats { header, blocks, bytes_read, .. } =
		decoder::decode(SliceSource::new(&archive), &mut sink)?;

	let compressed_size = archive.len() as u64;
	Ok(ArchiveInfo {
		header,
		compressed_size,
		original_size: sink.0,
		compression_ratio: ratio(sink.0, compressed_size),
		blocks,
		trailing_bytes: compressed_size - bytes_read as u64,
	})
}
