use crate::config::{EnigmaConfig, Strategy};
use crate::error::EnigmaError;
use crate::pipeline;
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "enigma-compress", author, version, about = "Compresses a file of big-endian 16-bit words")]
pub struct CompressArgs {
    /// Input file to compress (even length)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output archive
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Block selection strategy [reference, seeded]
    #[arg(short, long, default_value = "reference")]
    pub strategy: Strategy,
}

#[derive(Parser)]
#[command(name = "enigma-decompress", author, version, about = "Decompresses an Enigma archive")]
pub struct DecompressArgs {
    /// Archive to decompress
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Only print the archive's header and block statistics
    #[arg(long)]
    pub info: bool,
}

pub fn run_compress() -> Result<(), EnigmaError> {
    compress(CompressArgs::parse())
}

pub fn run_decompress() -> Result<(), EnigmaError> {
    decompress(DecompressArgs::parse())
}

pub fn compress(args: CompressArgs) -> Result<(), EnigmaError> {
    let config = EnigmaConfig::default().with_strategy(args.strategy);

    let mut in_file = BufReader::new(File::open(&args.input)?);
    let mut out_file = BufWriter::new(File::create(&args.output)?);

    let stats = pipeline::compress(&mut in_file, &mut out_file, &config)?;

    println!("Compressed {} to {}", args.input.display(), args.output.display());
    println!("  Original Size:    {} bytes", stats.original_size);
    println!("  Compressed Size:  {} bytes", stats.compressed_size);
    println!("  Blocks:           {}", stats.blocks);
    println!("  Ratio:            {:.2}x", stats.ratio);
    println!("  Elapsed Time:     {:.2?}", stats.processing_time);
    Ok(())
}

pub fn decompress(args: DecompressArgs) -> Result<(), EnigmaError> {
    let mut in_file = BufReader::new(File::open(&args.input)?);

    if args.info {
        let info = pipeline::info(&mut in_file)?;
        println!("Archive {}", args.input.display());
        println!("  Value Bits:       {}", info.header.value_bit_count);
        println!("  Flag Mask:        {:#07b}", info.header.flags.bits());
        println!("  Incremental Seed: {:#06x}", info.header.incremental_seed);
        println!("  Literal Seed:     {:#06x}", info.header.literal_seed);
        println!("  Compressed Size:  {} bytes", info.compressed_size);
        println!("  Original Size:    {} bytes", info.original_size);
        println!("  Blocks per Mode:  {:?}", info.blocks);
        return Ok(());
    }

    let mut out_file = BufWriter::new(File::create(&args.output)?);
    let stats = pipeline::decompress(&mut in_file, &mut out_file)?;

    println!("Decompressed {} to {}", args.input.display(), args.output.display());
    println!("  Decompressed Size: {} bytes", stats.decompressed_size);
    println!("  Elapsed Time:      {:.2?}", stats.processing_time);
    Ok(())
}
