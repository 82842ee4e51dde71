use log::LevelFilter;
use env_logger::{Builder, Target};
use std::io::Write;
use chrono::Local;

/// Logs go to stderr so `--output -` leaves stdout as pure JSON.
/// `RUST_LOG`, when set, overrides `level`.
pub fn init(level: LevelFilter) {
    Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .parse_default_env()
        .target(Target::Stderr)
        .init();

    log::debug!("Logger initialized at {}.", level);
}

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Debug } else { LevelFilter::Info }
}
