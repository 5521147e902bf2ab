use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use choreo::audio::{RodioDecoder, RodioOutput};
use choreo::clock::MonotonicClock;
use choreo::config::{self, Settings};
use choreo::session::Session;
use choreo::storage::{JsonFileStore, KeyValueStore, UnavailableStore};

use crate::app::App;

mod event_loop;
mod logging;

/// Command line: `choreo [--print-config] [FILE]`.
struct Args {
    print_config: bool,
    file: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        print_config: false,
        file: None,
    };
    for arg in env::args().skip(1) {
        if arg == "--print-config" {
            args.print_config = true;
        } else if args.file.is_none() {
            args.file = Some(PathBuf::from(arg));
        }
    }
    args
}

/// Load settings, falling back to defaults.
///
/// A failure comes back as a message naming the config file it came from, so
/// it can be logged and shown once the UI is up.
fn load_settings() -> (Settings, Option<String>) {
    let source = config::resolve_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "CHOREO__* environment".to_string());

    match Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                Settings::default(),
                Some(format!("invalid settings in {source}, using defaults: {msg}")),
            ),
        },
        Err(e) => (
            Settings::default(),
            Some(format!("could not load {source}, using defaults: {e}")),
        ),
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args();
    let (settings, settings_problem) = load_settings();

    if args.print_config {
        if let Some(problem) = &settings_problem {
            eprintln!("choreo: {problem}");
        }
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    logging::init(&settings);
    if let Some(problem) = &settings_problem {
        log::warn!("{}", problem);
    }

    let backend: Box<dyn KeyValueStore> = match settings.data_file() {
        Some(path) => {
            log::info!("storing checkpoints in {}", path.display());
            Box::new(JsonFileStore::new(path))
        }
        None => {
            log::warn!("no data directory; checkpoints will not be saved");
            Box::new(UnavailableStore::new("no data directory"))
        }
    };

    let output = RodioOutput::open_default()?;
    let mut session = Session::new(
        MonotonicClock::new(),
        output,
        Arc::new(RodioDecoder),
        backend,
        settings.session_options(),
    );

    let mut app = App::new();
    session.restore(&mut app);
    if let Some(problem) = settings_problem {
        app.set_warning(problem);
    }
    if let Some(path) = &args.file {
        event_loop::open_path(path, &mut session, &mut app);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut session, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
