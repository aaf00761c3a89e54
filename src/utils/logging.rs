//! Logger setup for the CLI.
//!
//! Lines go to stderr because stdout carries the JSON report.

use std::fmt;
use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use env_logger::{Builder, Env, Target};
use log::debug;

use crate::config::LoggingConfig;

/// Filter override, e.g. `TOKENPULSE_LOG=tokenpulse::analysis=trace`
pub const LOG_FILTER_ENV: &str = "TOKENPULSE_LOG";
/// `auto`, `always` or `never`
pub const LOG_STYLE_ENV: &str = "TOKENPULSE_LOG_STYLE";

/// Install the global logger. A second call keeps the first logger.
pub fn init_logging(config: &LoggingConfig) {
    let env = Env::default()
        .filter_or(LOG_FILTER_ENV, config.level.as_str())
        .write_style_or(LOG_STYLE_ENV, "auto");

    let timestamps = config.timestamps;
    let installed = Builder::from_env(env)
        .format(move |buf, record| {
            let level = buf.default_styled_level(record.level());
            let stamp = timestamps.then(utc_stamp);
            write_line(buf, stamp.as_deref(), &level, record.target(), record.args())
        })
        .target(Target::Stderr)
        .try_init()
        .is_ok();

    if installed {
        debug!("logger installed (default filter {})", config.level);
    }
}

fn utc_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `[stamp ]LEVEL target: message`
fn write_line(
    out: &mut dyn Write,
    stamp: Option<&str>,
    level: &dyn fmt::Display,
    target: &str,
    args: &fmt::Arguments<'_>,
) -> io::Result<()> {
    if let Some(stamp) = stamp {
        write!(out, "{} ", stamp)?;
    }
    writeln!(out, "{:<5} {}: {}", level, target, args)
}
