use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnigmaError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Input length {len} is odd: the data ends with a partial word")]
	OddInputLength { len: usize },

	#[error("Could not allocate a temporary buffer of {requested} words")]
	ResourceExhausted { requested: usize },

	#[error("Invalid Enigma header: value bit count {value_bit_count} must be below 12")]
	InvalidHeader { value_bit_count: u8 },

	#[error("Enigma stream ended prematurely")]
	TruncatedStream,

	#[error("Configuration error: {0}")]
	ConfigError(String),
}

pub type Result<T> = std::result::Result<T, EnigmaError>;
