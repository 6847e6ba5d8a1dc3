use enigma::cli;

fn main() {
	env_logger::init();
	if let Err(e) = cli::run_decompress() {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
}
