use std::fs::{self, OpenOptions};
use std::str::FromStr;

use log::LevelFilter;

use choreo::config::Settings;

/// Route `log` output to the configured file; the terminal belongs to the UI.
///
/// `RUST_LOG` overrides `logging.level`. Without a usable log file, logging is off.
pub fn init(settings: &Settings) {
    let level = LevelFilter::from_str(&settings.logging.level).unwrap_or(LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    let file = settings.log_file().and_then(|path| {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        OpenOptions::new().create(true).append(true).open(&path).ok()
    });
    match file {
        Some(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    let _ = builder.try_init();
}
