//! Command-line entry point for the spherefield viewer binary.

use std::path::Path;

use spherefield::options::Options;
use spherefield::Viewer;

/// Usage: `spherefield [options.toml]`
///
/// With no argument, default options run a 4096-instance field.
fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("failed to load options from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    log::info!(
        "starting: {} instances, speed {}",
        options.simulation.instance_count,
        options.simulation.speed
    );

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("viewer exited with error: {e}");
        std::process::exit(1);
    }
}
