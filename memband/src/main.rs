fn main() {
    if let Err(e) = memband::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
