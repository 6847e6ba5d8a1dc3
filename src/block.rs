//! Block descriptors: a 2- or 3-bit mode prefix followed by a 4-bit repeat count.
//!
//! ```text
//! 0 0          incremental seed run
//! 0 1          literal seed run
//! 1 0 0        inline copy, delta 0
//! 1 0 1        inline copy, delta +1
//! 1 1 0        inline copy, delta -1
//! 1 1 1        inline literal list (repeat 15: terminator)
//! ```

use crate::bitio::{BitReader, BitWriter, ByteSink, ByteSource};
use crate::error::Result;

pub const REPEAT_BITS: u32 = 4;

/// Longest run a single block can describe.
pub const MAX_BLOCK_LEN: usize = 1 << REPEAT_BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockMode {
	Incremental = 0,
	Literal = 1,
	Same = 2,
	Increase = 3,
	Decrease = 4,
	InlineList = 5,
}

impl BlockMode {
	pub const ALL: [BlockMode; 6] = [
		BlockMode::Incremental,
		BlockMode::Literal,
		BlockMode::Same,
		BlockMode::Increase,
		BlockMode::Decrease,
		BlockMode::InlineList,
	];

	pub fn index(self) -> usize {
		self as usize
	}

	/// Step applied between consecutive words of an inline-copy run.
	pub fn delta(self) -> Option<u16> {
		match self {
			BlockMode::Same => Some(0),
			BlockMode::Increase => Some(1),
			BlockMode::Decrease => Some(u16::MAX),
			_ => None,
		}
	}

	fn write<S: ByteSink>(self, writer: &mut BitWriter<S>) {
		match self {
			BlockMode::Incremental | BlockMode::Literal => {
				writer.write_bit(false);
				writer.write_bit(self == BlockMode::Literal);
			}
			_ => {
				writer.write_bit(true);
				writer.write_bits(self as u16 - 2, 2);
			}
		}
	}

	fn read<S: ByteSource>(reader: &mut BitReader<S>) -> Result<Self> {
		let mode = if reader.read_bit()? {
			match reader.read_bits(2)? {
				0 => BlockMode::Same,
				1 => BlockMode::Increase,
				2 => BlockMode::Decrease,
				_ => BlockMode::InlineList,
			}
		} else if reader.read_bit()? {
			BlockMode::Literal
		} else {
			BlockMode::Incremental
		};
		Ok(mode)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
	pub mode: BlockMode,
	pub repeat_count: u8,
}

impl BlockHeader {
	/// Ends the stream. Emits no words.
	pub const TERMINATOR: BlockHeader = BlockHeader {
		mode: BlockMode::InlineList,
		repeat_count: (MAX_BLOCK_LEN - 1) as u8,
	};

	/// Header for a run of `len` words; `len` must be in `1..=16`.
	pub fn new(mode: BlockMode, len: usize) -> Self {
		debug_assert!((1..=MAX_BLOCK_LEN).contains(&len));
		Self { mode, repeat_count: (len - 1) as u8 }
	}

	pub fn is_terminator(&self) -> bool {
		*self == Self::TERMINATOR
	}

	pub fn len(&self) -> usize {
		self.repeat_count as usize + 1
	}

	pub fn write<S: ByteSink>(&self, writer: &mut BitWriter<S>) {
		self.mode.write(writer);
		writer.write_bits(self.repeat_count as u16, REPEAT_BITS);
	}

	pub fn read<S: ByteSource>(reader: &mut BitReader<S>) -> Result<Self> {
		let mode = BlockMode::read(reader)?;
		let repeat_count = reader.read_bits(REPEAT_BITS)? as u8;
		Ok(Self { mode, repeat_count })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bitio::SliceSource;
	use crate::error::EnigmaError;

	fn bits_of(header: BlockHeader) -> Vec<u8> {
		let mut writer = BitWriter::new(Vec::new());
		header.write(&mut writer);
		writer.finish()
	}

	#[test]
	fn test_terminator_bits() {
		assert_eq!(bits_of(BlockHeader::TERMINATOR), vec![0b1111_1110]);
		assert!(BlockHeader::TERMINATOR.is_terminator());
	}

	#[test]
	fn test_mode_prefixes() {
		assert_eq!(bits_of(BlockHeader::new(BlockMode::Incremental, 1)), vec![0b0000_0000]);
		assert_eq!(bits_of(BlockHeader::new(BlockMode::Literal, 16)), vec![0b0111_1100]);
		assert_eq!(bits_of(BlockHeader::new(BlockMode::Same, 5)), vec![0b1000_1000]);
		assert_eq!(bits_of(BlockHeader::new(BlockMode::Increase, 3)), vec![0b1010_0100]);
		assert_eq!(bits_of(BlockHeader::new(BlockMode::Decrease, 1)), vec![0b1100_0000]);
	}

	#[test]
	fn test_read_every_mode() {
		for mode in BlockMode::ALL {
			for len in [1, 7, MAX_BLOCK_LEN] {
				let header = BlockHeader::new(mode, len);
				let bytes = bits_of(header);
				let mut reader = BitReader::new(SliceSource::new(&bytes));
				let parsed = BlockHeader::read(&mut reader).unwrap();
				assert_eq!(parsed, header);
				assert_eq!(parsed.len(), len);
			}
		}
	}

	#[test]
	fn test_only_inline_list_sixteen_terminates() {
		assert!(!BlockHeader::new(BlockMode::InlineList, 15).is_terminator());
		assert!(!BlockHeader::new(BlockMode::Decrease, 16).is_terminator());
		assert!(BlockHeader::new(BlockMode::InlineList, 16).is_terminator());
	}

	#[test]
	fn test_truncated_repeat_count() {
		let mut reader = BitReader::new(SliceSource::new(&[]));
		assert!(matches!(BlockHeader::read(&mut reader), Err(EnigmaError::TruncatedStream)));
	}

	#[test]
	fn test_deltas() {
		assert_eq!(BlockMode::Same.delta(), Some(0));
		assert_eq!(BlockMode::Increase.delta(), Some(1));
		assert_eq!(0u16.wrapping_add(BlockMode::Decrease.delta().unwrap()), u16::MAX);
		assert_eq!(BlockMode::Literal.delta(), None);
	}
}
