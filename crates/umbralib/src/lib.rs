pub mod config;
pub mod diff;
pub mod document;
pub mod errors;
pub mod paths;
pub mod testing;

pub fn init() {
    tracing_subscriber::fmt::init();
}
