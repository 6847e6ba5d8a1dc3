//! Word-stream decoder.
//!
//! Decoding is driven entirely by the stream: each block descriptor selects
//! one of six expansion rules until the terminator block is read. Words of a
//! block are collected first and only pushed to the sink once the block has
//! been read completely, so a truncated stream never leaves half a block in
//! the output.

use crate::bitio::{BitReader, ByteSink, ByteSource};
use crate::block::{BlockHeader, BlockMode, MAX_BLOCK_LEN};
use crate::error::Result;
use crate::header::{FlagTable, Header};
use log::{debug, trace};

/// Summary of one decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    pub header: Header,
    pub words: usize,
    /// Blocks seen per mode, terminator excluded.
    pub blocks: [usize; 6],
    pub bytes_read: usize,
}

/// Per-call decoding state.
struct DecodeContext {
    table: FlagTable,
    flag_bits: u32,
    value_bits: u32,
    /// Advanced by every incremental block and carried to the next one.
    incremental_seed: u16,
    literal_seed: u16,
}

impl DecodeContext {
    fn new(header: &Header) -> Self {
        Self {
            table: header.flag_table(),
            flag_bits: header.total_flag_bits(),
            value_bits: header.value_bit_count as u32,
            incremental_seed: header.incremental_seed,
            literal_seed: header.literal_seed,
        }
    }

    fn read_inline_copy<S: ByteSource>(&self, reader: &mut BitReader<S>) -> Result<u16> {
        let code = reader.read_bits(self.flag_bits)?;
        let value = reader.read_bits(self.value_bits)?;
        Ok(self.table.pattern(code) | value)
    }

    /// Appends the words of one block to `out`.
    fn expand<S: ByteSource>(
        &mut self,
        block: BlockHeader,
        reader: &mut BitReader<S>,
        out: &mut Vec<u16>,
    ) -> Result<()> {
        let len = block.len();
        match block.mode {
            BlockMode::Incremental => {
                for _ in 0..len {
                    out.push(self.incremental_seed);
                    self.incremental_seed = self.incremental_seed.wrapping_add(1);
                }
            }
            BlockMode::Literal => {
                out.extend(std::iter::repeat(self.literal_seed).take(len));
            }
            BlockMode::Same | BlockMode::Increase | BlockMode::Decrease => {
                let delta = block.mode.delta().unwrap_or_default();
                let mut word = self.read_inline_copy(reader)?;
                for _ in 0..len {
                    out.push(word);
                    word = word.wrapping_add(delta);
                }
            }
            BlockMode::InlineList => {
                for _ in 0..len {
                    out.push(self.read_inline_copy(reader)?);
                }
            }
        }
        Ok(())
    }
}

/// Counts pulled bytes for the stats.
struct CountingSource<S> {
    inner: S,
    count: usize,
}

impl<S: ByteSource> ByteSource for CountingSource<S> {
    fn pull(&mut self) -> Option<u8> {
        let byte = self.inner.pull()?;
        self.count += 1;
        Some(byte)
    }
}

/// Decodes one archive from `source`, pushing big-endian words into `sink`.
///
/// Stops right after the terminator block without reading further. A bad
/// header fails before any word is written.
pub fn decode<R: ByteSource, W: ByteSink>(source: R, mut sink: W) -> Result<DecodeStats> {
    let mut reader = BitReader::new(CountingSource { inner: source, count: 0 });
    let header = Header::read(&mut reader)?;
    let mut context = DecodeContext::new(&header);

    let mut words = 0;
    let mut blocks = [0usize; 6];
    let mut pending = Vec::with_capacity(MAX_BLOCK_LEN);
    loop {
        let block = BlockHeader::read(&mut reader)?;
        if block.is_terminator() {
            break;
        }
        trace!("block {:?} x{}", block.mode, block.len());

        pending.clear();
        context.expand(block, &mut reader, &mut pending)?;
        for word in &pending {
            let [high, low] = word.to_be_bytes();
            sink.push(high);
            sink.push(low);
        }
        words += pending.len();
        blocks[block.mode.index()] += 1;
    }

    let bytes_read = reader.into_inner().count;
    debug!(
        "decoded {} words from {} blocks ({} bytes read)",
        words,
        blocks.iter().sum::<usize>(),
        bytes_read
    );
    Ok(DecodeStats { header, words, blocks, bytes_read })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::{BitWriter, SliceSource};
    use crate::error::EnigmaError;
    use crate::header::FlagMask;

    /// Builds a stream from a header and a closure writing the block bits.
    fn stream(header: Header, body: impl FnOnce(&mut BitWriter<Vec<u8>>)) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        header.write(&mut writer);
        body(&mut writer);
        writer.finish()
    }

    fn words_of(bytes: &[u8]) -> Vec<u16> {
        bytes.chunks_exact(2).map(|p| u16::from_be_bytes([p[0], p[1]])).collect()
    }

    fn run(bytes: &[u8]) -> Result<Vec<u16>> {
        let mut out = Vec::new();
        decode(SliceSource::new(bytes), &mut out)?;
        Ok(words_of(&out))
    }

    #[test]
    fn test_terminator_only() {
        let bytes = stream(Header::for_encoder(0), |w| BlockHeader::TERMINATOR.write(w));
        assert_eq!(run(&bytes).unwrap(), Vec::<u16>::new());
    }

    #[test]
    fn test_incremental_seed_persists_across_blocks() {
        let header = Header { incremental_seed: 0xFFFE, ..Header::for_encoder(0) };
        let bytes = stream(header, |w| {
            BlockHeader::new(BlockMode::Incremental, 3).write(w);
            BlockHeader::new(BlockMode::Literal, 1).write(w);
            BlockHeader::new(BlockMode::Incremental, 2).write(w);
            BlockHeader::TERMINATOR.write(w);
        });
        assert_eq!(run(&bytes).unwrap(), vec![0xFFFE, 0xFFFF, 0x0000, 0, 0x0001, 0x0002]);
    }

    #[test]
    fn test_literal_seed_run() {
        let bytes = stream(Header::for_encoder(0xABCD), |w| {
            BlockHeader::new(BlockMode::Literal, 4).write(w);
            BlockHeader::TERMINATOR.write(w);
        });
        assert_eq!(run(&bytes).unwrap(), vec![0xABCD; 4]);
    }

    #[test]
    fn test_decrease_run_wraps() {
        let bytes = stream(Header::for_encoder(0), |w| {
            BlockHeader::new(BlockMode::Decrease, 3).write(w);
            w.write_bits(0x0001, 16);
            BlockHeader::TERMINATOR.write(w);
        });
        assert_eq!(run(&bytes).unwrap(), vec![0x0001, 0x0000, 0xFFFF]);
    }

    #[test]
    fn test_inline_list_reads_fresh_values() {
        let bytes = stream(Header::for_encoder(0), |w| {
            BlockHeader::new(BlockMode::InlineList, 3).write(w);
            w.write_bits(0x8001, 16);
            w.write_bits(0x0042, 16);
            w.write_bits(0x7FFF, 16);
            BlockHeader::new(BlockMode::Same, 1).write(w);
            w.write_bits(0x0005, 16);
            BlockHeader::TERMINATOR.write(w);
        });
        assert_eq!(run(&bytes).unwrap(), vec![0x8001, 0x0042, 0x7FFF, 0x0005]);
    }

    #[test]
    fn test_sparse_header_inline_copy() {
        // Four value bits, flag codes select X_FLIP and PRIORITY.
        let header = Header {
            value_bit_count: 4,
            flags: FlagMask::X_FLIP | FlagMask::PRIORITY,
            incremental_seed: 0,
            literal_seed: 0,
        };
        let bytes = stream(header, |w| {
            BlockHeader::new(BlockMode::Increase, 2).write(w);
            w.write_bits(0b11, 2);
            w.write_bits(0xE, 4);
            BlockHeader::new(BlockMode::Same, 1).write(w);
            w.write_bits(0b01, 2);
            w.write_bits(0x3, 4);
            BlockHeader::TERMINATOR.write(w);
        });
        assert_eq!(run(&bytes).unwrap(), vec![0x880E, 0x880F, 0x0803]);
    }

    #[test]
    fn test_invalid_header_emits_nothing() {
        let mut bytes = stream(Header::for_encoder(0), |w| BlockHeader::TERMINATOR.write(w));
        bytes[0] = 12;
        let mut out = Vec::new();
        let err = decode(SliceSource::new(&bytes), &mut out).unwrap_err();
        assert!(matches!(err, EnigmaError::InvalidHeader { value_bit_count: 12 }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_truncated_block_is_discarded() {
        let bytes = stream(Header::for_encoder(0), |w| {
            BlockHeader::new(BlockMode::Literal, 2).write(w);
            BlockHeader::new(BlockMode::InlineList, 2).write(w);
            w.write_bits(0x1111, 16);
            w.write_bits(0x2222, 16);
            BlockHeader::TERMINATOR.write(w);
        });
        // Cut inside the second inline value of the list.
        let cut = &bytes[..bytes.len() - 2];
        let mut out = Vec::new();
        let err = decode(SliceSource::new(cut), &mut out).unwrap_err();
        assert!(matches!(err, EnigmaError::TruncatedStream));
        assert_eq!(words_of(&out), vec![0, 0]);
    }

    #[test]
    fn test_stops_after_terminator() {
        let mut bytes = stream(Header::for_encoder(0), |w| BlockHeader::TERMINATOR.write(w));
        bytes.extend_from_slice(&[0xDE, 0xAD]);
        let mut source = SliceSource::new(&bytes);
        let stats = decode(&mut source, Vec::new()).unwrap();
        assert_eq!(source.consumed(), 7);
        assert_eq!(stats.bytes_read, 7);
        assert_eq!(stats.words, 0);
    }

    #[test]
    fn test_garbage_with_valid_header_still_decodes() {
        // 0 0 0000 is one incremental word, then 1 11 1111 straddles the byte boundary.
        let bytes = [0, 0, 0x12, 0x34, 0, 0, 0b0000_0011, 0b1111_1000];
        let stats = decode(SliceSource::new(&bytes), Vec::new()).unwrap();
        assert_eq!(stats.header.value_bit_count, 0);
        assert_eq!(stats.blocks[BlockMode::Incremental.index()], 1);
    }
}
