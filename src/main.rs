fn main() {
    if let Err(err) = wgpu_oit::run() {
        eprintln!("Application error: {err}");
        std::process::exit(1);
    }
}
