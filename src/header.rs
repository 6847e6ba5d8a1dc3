//! The six-byte archive preamble and the flag-code table derived from it.
//!
//! A word is split into `value_bit_count` low "value bits" and the five
//! flag-region bits at positions 11..=15. The header's flag bitfield picks
//! which of those five bits vary from record to record; every inline copy
//! transmits a compact flag code that indexes into the [`FlagTable`].

use crate::bitio::{BitReader, BitWriter, ByteSink, ByteSource};
use crate::error::{EnigmaError, Result};
use byteorder::{BigEndian, ByteOrder};

pub const HEADER_SIZE: usize = 6;

/// Value bit counts at or above this are rejected when decoding.
pub const MAX_VALUE_BITS: u8 = 12;

/// Bit position of the lowest flag-region bit within a word.
pub const FLAG_REGION_SHIFT: u32 = 11;

/// Width of the flag region at the top of a word.
pub const FLAG_REGION_BITS: u8 = 5;

bitflags::bitflags! {
	/// Selects which flag-region bits of a word vary per record.
	///
	/// Bit `n` of the mask corresponds to word bit `11 + n`; the names follow
	/// the usual tile attribute layout.
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
	pub struct FlagMask: u8 {
		const X_FLIP     = 0b00001;
		const Y_FLIP     = 0b00010;
		const PALETTE_LO = 0b00100;
		const PALETTE_HI = 0b01000;
		const PRIORITY   = 0b10000;
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	pub value_bit_count: u8,
	pub flags: FlagMask,
	pub incremental_seed: u16,
	pub literal_seed: u16,
}

impl Header {
	/// The header this crate's encoder always writes: eleven value bits, all
	/// five flag-region bits variable and a zero incremental seed.
	pub fn for_encoder(literal_seed: u16) -> Self {
		Self {
			value_bit_count: 16 - FLAG_REGION_BITS,
			flags: FlagMask::all(),
			incremental_seed: 0,
			literal_seed,
		}
	}

	pub fn total_flag_bits(&self) -> u32 {
		self.flags.bits().count_ones()
	}

	pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
		let mut bytes = [0u8; HEADER_SIZE];
		bytes[0] = self.value_bit_count;
		bytes[1] = self.flags.bits();
		BigEndian::write_u16(&mut bytes[2..4], self.incremental_seed);
		BigEndian::write_u16(&mut bytes[4..6], self.literal_seed);
		bytes
	}

	/// Parses the preamble. The flag bitfield is taken modulo 32.
	pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
		let value_bit_count = bytes[0];
		if value_bit_count >= MAX_VALUE_BITS {
			return Err(EnigmaError::InvalidHeader { value_bit_count });
		}
		Ok(Self {
			value_bit_count,
			flags: FlagMask::from_bits_truncate(bytes[1]),
			incremental_seed: BigEndian::read_u16(&bytes[2..4]),
			literal_seed: BigEndian::read_u16(&bytes[4..6]),
		})
	}

	pub fn write<S: ByteSink>(&self, writer: &mut BitWriter<S>) {
		for byte in self.to_bytes() {
			writer.write_byte(byte);
		}
	}

	/// Reads all six bytes before validating, so a short stream reports
	/// truncation rather than a bad header.
	pub fn read<S: ByteSource>(reader: &mut BitReader<S>) -> Result<Self> {
		let mut bytes = [0u8; HEADER_SIZE];
		for byte in bytes.iter_mut() {
			*byte = reader.read_byte()?;
		}
		Self::from_bytes(&bytes)
	}

	pub fn flag_table(&self) -> FlagTable {
		FlagTable::new(self.flags)
	}
}

/// Maps flag codes to the high-bit pattern they contribute to a word.
///
/// Entries enumerate every subset of the flag mask in ascending order, so the
/// table is sorted and has `2^popcount(mask)` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagTable {
	patterns: Vec<u16>,
}

impl FlagTable {
	pub fn new(flags: FlagMask) -> Self {
		let mask = flags.bits() as u16;
		let patterns = (0..32u16)
			.filter(|i| i & !mask == 0)
			.map(|i| i << FLAG_REGION_SHIFT)
			.collect();
		Self { patterns }
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	/// Pattern for a flag code. Codes read with `popcount(mask)` bits are
	/// always in range.
	pub fn pattern(&self, code: u16) -> u16 {
		self.patterns[code as usize]
	}

	/// Flag code whose pattern equals the flag-region bits of `word`, if the
	/// mask can express them.
	pub fn code_for(&self, word: u16) -> Option<u16> {
		let region = word & !((1u16 << FLAG_REGION_SHIFT) - 1);
		self.patterns.binary_search(&region).ok().map(|index| index as u16)
	}
}
