use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Installs the global logger.
///
/// `RUST_LOG` wins over `default_level`. Lines read
/// `timestamp - target - LEVEL - message` with a local
/// `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn init(default_level: &str) {
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "{}", format_line(record)))
        .init();
}

fn format_line(record: &log::Record) -> String {
    format!(
        "{} - {} - {} - {}",
        Local::now().format(DATE_FORMAT),
        record.target(),
        record.level(),
        record.args()
    )
}
