fn main() {
    if let Err(e) = locus_cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
