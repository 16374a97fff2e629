fn main() {
    if let Err(e) = sonora_tags::cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
