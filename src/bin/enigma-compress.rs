use enigma::cli;

fn main() {
	env_logger::init();
	if let Err(e) = cli::run_compress() {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
}
