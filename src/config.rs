use crate::error::EnigmaError;
use std::fmt;
use std::str::FromStr;

/// Block selection strategy used by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Inline same/increase/decrease runs only. The block stream matches
    /// existing Enigma archives bit for bit.
    #[default]
    Reference,
    /// Additionally emits literal-seed and incremental-seed blocks whenever
    /// they cover at least as many words as the inline run.
    Seeded,
}

#[derive(Debug, Clone, Default)]
pub struct EnigmaConfig {
    pub strategy: Strategy,
}

impl EnigmaConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl FromStr for Strategy {
    type Err = EnigmaError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference" => Ok(Strategy::Reference),
            "seeded" => Ok(Strategy::Seeded),
            _ => Err(EnigmaError::ConfigError(format!("Invalid strategy: {}", s))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Reference => f.write_str("reference"),
            Strategy::Seeded => f.write_str("seeded"),
        }
    }
}
