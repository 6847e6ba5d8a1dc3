//! Greedy run detection over the word sequence.

use crate::block::{BlockMode, MAX_BLOCK_LEN};
use crate::error::{EnigmaError, Result};

/// A run chosen at some position of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub mode: BlockMode,
    pub len: usize,
}

/// Length of the run starting at `words[0]` where word `i` equals
/// `first + i * step` (wrapping), capped at one block.
fn run_length(words: &[u16], step: u16) -> usize {
    let window = words.len().min(MAX_BLOCK_LEN);
    let first = words[0];
    let mut expected = first;
    let mut len = 1;
    while len < window {
        expected = expected.wrapping_add(step);
        if words[len] != expected {
            break;
        }
        len += 1;
    }
    len
}

/// Picks the inline-copy run for the words starting at `words[0]`.
///
/// `Same` and `Increase` win only when strictly longer than both others;
/// every other outcome, ties included, yields a `Decrease` run of the
/// decrease length. Existing archives depend on this order.
pub fn find_inline_run(words: &[u16]) -> Run {
    debug_assert!(!words.is_empty());
    let same = run_length(words, 0);
    let increase = run_length(words, 1);
    let decrease = run_length(words, u16::MAX);

    if same > increase && same > decrease {
        Run { mode: BlockMode::Same, len: same }
    } else if increase > same && increase > decrease {
        Run { mode: BlockMode::Increase, len: increase }
    } else {
        Run { mode: BlockMode::Decrease, len: decrease }
    }
}

/// Length of the run of words equal to `seed`; zero when `words[0]` differs.
pub fn literal_run(words: &[u16], seed: u16) -> usize {
    if words.first() != Some(&seed) {
        return 0;
    }
    run_length(words, 0)
}

/// Length of the run `seed, seed + 1, ...`; zero when `words[0]` differs.
pub fn incremental_run(words: &[u16], seed: u16) -> usize {
    if words.first() != Some(&seed) {
        return 0;
    }
    run_length(words, 1)
}

/// Most frequent word in `words`. Ties go to the lowest value; an empty
/// input yields 0.
///
/// Failing to allocate the sorted copy yields `ResourceExhausted`.
pub fn most_frequent_word(words: &[u16]) -> Result<u16> {
    let mut sorted: Vec<u16> = Vec::new();
    sorted
        .try_reserve_exact(words.len())
        .map_err(|_| EnigmaError::ResourceExhausted { requested: words.len() })?;
    sorted.extend_from_slice(words);
    sorted.sort_unstable();

    let mut best_word = 0;
    let mut best_count = 0;
    for group in sorted.chunk_by(|a, b| a == b) {
        if group.len() > best_count {
            best_count = group.len();
            best_word = group[0];
        }
    }
    Ok(best_word)
}
