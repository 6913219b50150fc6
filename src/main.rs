fn main() {
    let _ = env_logger::builder().format_timestamp(None).try_init();
    if let Err(err) = radial_spokes::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
