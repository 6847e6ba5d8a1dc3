//! Word-stream encoder.

use crate::bitio::{BitWriter, ByteSink};
use crate::block::{BlockHeader, BlockMode};
use crate::config::{EnigmaConfig, Strategy};
use crate::error::{EnigmaError, Result};
use crate::header::{FlagTable, Header};
use crate::matcher::{self, Run};
use log::{debug, trace};

/// Summary of one encode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub words: usize,
    pub blocks: [usize; 6],
    pub bytes_written: usize,
}

/// Counts bytes on their way to the real sink.
struct CountingSink<S> {
    inner: S,
    count: usize,
}

impl<S: ByteSink> ByteSink for CountingSink<S> {
    fn push(&mut self, byte: u8) {
        self.count += 1;
        self.inner.push(byte);
    }
}

/// Splits big-endian byte pairs into words.
fn to_words(input: &[u8]) -> Result<Vec<u16>> {
    if input.len() % 2 != 0 {
        return Err(EnigmaError::OddInputLength { len: input.len() });
    }
    let count = input.len() / 2;
    let mut words = Vec::new();
    words
        .try_reserve_exact(count)
        .map_err(|_| EnigmaError::ResourceExhausted { requested: count })?;
    words.extend(input.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])));
    Ok(words)
}

struct Encoder<S: ByteSink> {
    writer: BitWriter<S>,
    header: Header,
    table: FlagTable,
    strategy: Strategy,
    /// Mirrors the decoder's persistent incremental seed.
    incremental_seed: u16,
    stats: EncodeStats,
}

impl<S: ByteSink> Encoder<S> {
    fn new(sink: S, header: Header, strategy: Strategy) -> Self {
        Self {
            writer: BitWriter::new(sink),
            table: header.flag_table(),
            incremental_seed: header.incremental_seed,
            header,
            strategy,
            stats: EncodeStats::default(),
        }
    }

    /// Chooses the block covering `words[0..]`.
    fn choose(&self, words: &[u16]) -> Run {
        let inline = matcher::find_inline_run(words);
        if self.strategy == Strategy::Reference {
            return inline;
        }

        let literal = matcher::literal_run(words, self.header.literal_seed);
        let incremental = matcher::incremental_run(words, self.incremental_seed);
        let seeded = if literal >= incremental {
            Run { mode: BlockMode::Literal, len: literal }
        } else {
            Run { mode: BlockMode::Incremental, len: incremental }
        };
        if seeded.len > 0 && seeded.len >= inline.len {
            seeded
        } else {
            inline
        }
    }

    fn write_inline_copy(&mut self, word: u16) {
        let value_bits = self.header.value_bit_count as u32;
        // The encoder's header makes every flag pattern expressible.
        let code = self.table.code_for(word).unwrap_or_default();
        self.writer.write_bits(code, self.header.total_flag_bits());
        self.writer.write_bits(word & ((1u16 << value_bits) - 1), value_bits);
    }

    fn emit(&mut self, run: Run, first: u16) {
        trace!("block {:?} x{} from {:#06x}", run.mode, run.len, first);
        BlockHeader::new(run.mode, run.len).write(&mut self.writer);
        match run.mode {
            BlockMode::Incremental => {
                self.incremental_seed = self.incremental_seed.wrapping_add(run.len as u16);
            }
            BlockMode::Literal => {}
            _ => self.write_inline_copy(first),
        }
        self.stats.blocks[run.mode.index()] += 1;
        self.stats.words += run.len;
    }

    fn encode(mut self, words: &[u16]) -> (S, EncodeStats) {
        self.header.write(&mut self.writer);

        let mut position = 0;
        while position < words.len() {
            let remaining = &words[position..];
            let run = self.choose(remaining);
            self.emit(run, remaining[0]);
            position += run.len;
        }

        BlockHeader::TERMINATOR.write(&mut self.writer);
        (self.writer.finish(), self.stats)
    }
}

/// Encodes `input`, a sequence of big-endian 16-bit words, into `sink`.
///
/// Fails without writing anything if `input` has an odd length or the
/// temporary word buffers cannot be allocated.
pub fn encode<S: ByteSink>(input: &[u8], sink: S, config: &EnigmaConfig) -> Result<EncodeStats> {
    let words = to_words(input)?;
    let literal_seed = matcher::most_frequent_word(&words)?;
    let header = Header::for_encoder(literal_seed);

    let counting = CountingSink { inner: sink, count: 0 };
    let (counting, mut stats) = Encoder::new(counting, header, config.strategy).encode(&words);
    stats.bytes_written = counting.count;

    debug!(
        "encoded {} words in {} blocks to {} bytes (literal seed {:#06x}, {} strategy)",
        stats.words,
        stats.blocks.iter().sum::<usize>(),
        stats.bytes_written,
        literal_seed,
        config.strategy,
    );
    Ok(stats)
}

/// Encodes a word slice into a fresh archive.
pub fn encode_words(words: &[u16], config: &EnigmaConfig) -> Result<Vec<u8>> {
    let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
    let mut archive = Vec::new();
    encode(&bytes, &mut archive, config)?;
    Ok(archive)
}
