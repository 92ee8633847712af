pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod figure;
pub mod jitter;
pub mod plotter;
pub mod render;
pub mod reports;

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
