fn main() {
    if let Err(e) = toolcat::run() {
        eprintln!("{}", toolcat::render_error(&e));
        std::process::exit(1);
    }
}
