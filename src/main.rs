//! Vitrine headless showroom demo.
//!
//! Builds the default scene (or one loaded from JSON), replays a short
//! scripted visit against the frame clock and writes each virtual screen
//! to a PNG.

fn main() {
    if let Err(err) = vitrine::app::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
