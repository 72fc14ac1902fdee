//! Console logging.

use crate::config::Settings;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Targets raised to debug level in debug mode.
pub const DEBUG_TARGETS: [&str; 5] = [
    "diplo",
    "diplo_core",
    "diplo_executor",
    "diplo_resource",
    "diplo_source",
];

/// A `LEVEL: message` logger honouring `RUST_LOG`, defaulting to info.
///
/// `render.debug`, however it was set, raises the pipeline's own targets.
pub fn builder(settings: &Settings) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()));
    if settings.render.debug {
        for target in DEBUG_TARGETS {
            builder.filter_module(target, LevelFilter::Debug);
        }
    }
    builder
}

pub fn init(settings: &Settings) {
    builder(settings).init();
}
