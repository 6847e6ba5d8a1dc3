use enigma::config::{EnigmaConfig, Strategy};
use enigma::pipeline;

fn main() {
	// A 4x4 tile map: tiles 0x100.. with the priority bit set on the top row.
	let words: Vec<u16> = (0..16u16).map(|i| if i < 4 { 0x8100 + i } else { 0x0100 + i }).collect();
	let data: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();

	let mut input = std::io::Cursor::new(data);
	let mut compressed = Vec::new();
	let cfg = EnigmaConfig::default().with_strategy(Strategy::Seeded);
	let stats = pipeline::compress(&mut input, &mut compressed, &cfg).unwrap();
	println!("compressed {} -> {}", stats.original_size, stats.compressed_size);

	let mut comp_cur = std::io::Cursor::new(compressed);
	let mut restored = Vec::new();
	pipeline::decompress(&mut comp_cur, &mut restored).unwrap();
	println!("restored {} bytes", restored.len());
}
