fn main() {
    if let Err(err) = estate_insight::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
