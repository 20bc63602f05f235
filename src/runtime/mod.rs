use std::env;
use std::io::Stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioEngine;
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod settings;
mod startup;
mod ticker;

use startup::Command;

/// Raw mode and the alternate screen, undone on drop (including on error paths).
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self, Box<dyn std::error::Error>> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let dir = match startup::parse_args(env::args().skip(1)) {
        Ok(Command::Run { dir }) => dir,
        Ok(Command::PrintConfig) => {
            let (settings, warning) = settings::load_settings();
            if let Some(warning) = warning {
                eprintln!("jukebox: {warning}");
            }
            print!("{}", settings.to_toml()?);
            return Ok(());
        }
        Ok(Command::Help) => {
            println!("{}", startup::USAGE);
            return Ok(());
        }
        Err(msg) => return Err(format!("{msg}\n{}", startup::USAGE).into()),
    };

    let (settings, warning) = settings::load_settings();
    match logging::init(&settings.logging) {
        Ok(Some(path)) => tracing::info!(log = %path.display(), "jukebox starting"),
        Ok(None) => {}
        Err(e) => eprintln!("jukebox: logging disabled: {e}"),
    }
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }

    let catalog = startup::load_catalog(&dir, &settings.library)?;
    let mut app = App::new(catalog.clone());
    app.set_current_dir(dir.display().to_string());

    let mut transport = startup::build_transport(catalog, RodioEngine::new(), &settings.playback);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    transport.subscribe(Box::new(app.feed()));
    transport.subscribe(Box::new(mpris.clone()));

    let run_result = {
        let mut guard = TerminalGuard::enter()?;
        event_loop::run(
            &mut guard.terminal,
            &settings,
            &mut app,
            &mut transport,
            &mpris,
            &control_rx,
        )
    };

    transport
        .engine()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    tracing::info!("jukebox exiting");

    run_result
}
