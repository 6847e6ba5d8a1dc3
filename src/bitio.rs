//! MSB-first bit packing over pull/push byte collaborators.
//!
//! The codec never touches files directly. It pulls input bytes from a
//! [`ByteSource`] and pushes output bytes into a [`ByteSink`]; the stream
//! pipeline and the CLI supply the concrete collaborators.

use crate::error::{EnigmaError, Result};

/// Pull-based byte input. `None` signals end of data.
pub trait ByteSource {
    fn pull(&mut self) -> Option<u8>;
}

/// Push-based byte output.
pub trait ByteSink {
    fn push(&mut self, byte: u8);
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn pull(&mut self) -> Option<u8> {
        (**self).pull()
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn push(&mut self, byte: u8) {
        (**self).push(byte)
    }
}

impl ByteSink for Vec<u8> {
    fn push(&mut self, byte: u8) {
        Vec::push(self, byte)
    }
}

/// Byte source over an in-memory slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Number of bytes pulled so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl ByteSource for SliceSource<'_> {
    fn pull(&mut self) -> Option<u8> {
        let byte = self.data.get(self.position).copied()?;
        self.position += 1;
        Some(byte)
    }
}

/// Packs bits into bytes, most significant bit first.
pub struct BitWriter<S: ByteSink> {
    sink: S,
    current: u8,
    filled: u8,
}

impl<S: ByteSink> BitWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, current: 0, filled: 0 }
    }

    /// Writes a whole byte straight to the sink. Only valid on a byte boundary.
    pub fn write_byte(&mut self, byte: u8) {
        debug_assert_eq!(self.filled, 0, "write_byte called mid-byte");
        self.sink.push(byte);
    }

    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.current |= 0x80 >> self.filled;
        }
        self.filled += 1;
        if self.filled == 8 {
            self.sink.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    /// Writes the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u16, count: u32) {
        debug_assert!(count <= 16);
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 != 0);
        }
    }

    /// Flushes a partially filled byte (unused low bits are zero) and
    /// returns the sink.
    pub fn finish(mut self) -> S {
        if self.filled != 0 {
            self.sink.push(self.current);
        }
        self.sink
    }
}

/// Unpacks bits from bytes, most significant bit first.
pub struct BitReader<S: ByteSource> {
    source: S,
    current: u8,
    remaining: u8,
}

impl<S: ByteSource> BitReader<S> {
    pub fn new(source: S) -> Self {
        Self { source, current: 0, remaining: 0 }
    }

    /// Reads a whole byte from the source. Only valid on a byte boundary.
    pub fn read_byte(&mut self) -> Result<u8> {
        debug_assert_eq!(self.remaining, 0, "read_byte called mid-byte");
        self.source.pull().ok_or(EnigmaError::TruncatedStream)
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            self.current = self.source.pull().ok_or(EnigmaError::TruncatedStream)?;
            self.remaining = 8;
        }
        self.remaining -= 1;
        Ok(self.current & (1 << self.remaining) != 0)
    }

    /// Reads `count` bits (at most 16) into an integer, high bit first.
    pub fn read_bits(&mut self, count: u32) -> Result<u16> {
        debug_assert!(count <= 16);
        let mut accumulator: u32 = 0;
        for _ in 0..count {
            accumulator = (accumulator << 1) | self.read_bit()? as u32;
        }
        Ok(accumulator as u16)
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_fill_msb_first() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true);
        writer.write_bits(0b01, 2);
        writer.write_bits(0b0010, 4);
        writer.write_bit(true);
        let out = writer.finish();
        assert_eq!(out, vec![0b1010_0101]);
    }

    #[test]
    fn test_partial_byte_is_zero_padded() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0x7F, 7);
        assert_eq!(writer.finish(), vec![0xFE]);
    }

    #[test]
    fn test_finish_on_boundary_adds_nothing() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_byte(0x0B);
        writer.write_bits(0xABCD, 16);
        assert_eq!(writer.finish(), vec![0x0B, 0xAB, 0xCD]);
    }

    #[test]
    fn test_read_bits_across_bytes() {
        let data = [0xAB, 0xCD, 0xEF];
        let mut reader = BitReader::new(SliceSource::new(&data));
        assert_eq!(reader.read_bits(4).unwrap(), 0xA);
        assert_eq!(reader.read_bits(16).unwrap(), 0xBCDE);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(3).unwrap(), 0b111);
    }

    #[test]
    fn test_read_zero_bits_pulls_nothing() {
        let mut source = SliceSource::new(&[]);
        let mut reader = BitReader::new(&mut source);
        assert_eq!(reader.read_bits(0).unwrap(), 0);
        drop(reader);
        assert_eq!(source.consumed(), 0);
    }

    #[test]
    fn test_read_past_end_is_truncation() {
        let data = [0xFF];
        let mut reader = BitReader::new(SliceSource::new(&data));
        assert_eq!(reader.read_bits(6).unwrap(), 0b111111);
        let err = reader.read_bits(4).unwrap_err();
        assert!(matches!(err, EnigmaError::TruncatedStream));
        // Stays truncated on later reads too.
        assert!(matches!(reader.read_bit(), Err(EnigmaError::TruncatedStream)));
    }

    #[test]
    fn test_read_byte_on_empty_source() {
        let mut reader = BitReader::new(SliceSource::new(&[]));
        assert!(matches!(reader.read_byte(), Err(EnigmaError::TruncatedStream)));
    }
}
