#![cfg(feature = "std")]
//! Minimal stderr backend for the `log` facade.
//!
//! Lines look like `battlegrid INFO  store: user#1 opened game#1`. Stdout is
//! left to the CLI's own output.

use std::env;
use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

const ENV_VAR: &str = "BATTLEGRID_LOG";

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // `battlegrid::store` -> `store`
        let target = record.target();
        let module = target.rsplit("::").next().unwrap_or(target);
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "battlegrid {:<5} {}: {}", record.level(), module, record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Level named by `value`, or `info` when unset or unparsable.
fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the logger with the level from `BATTLEGRID_LOG`. Later calls
/// leave the first logger in place.
pub fn init_logging() {
    let level = level_from(env::var(ENV_VAR).ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
