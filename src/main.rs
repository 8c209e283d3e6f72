//! Tale - terminal client for an illustrated text-adventure server
//!
//! Sends player commands to the game server, prints the narrative and scene
//! images it returns, and plays location music with cross-fades.

use std::io::BufRead;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tale_audio::{AudioManager, AudioOutput, KiraOutput, LocationMusicMap, SilentOutput};
use tale_integration::IntegrationClient;

use tale::app::{App, Flow};
use tale::controller::CommandController;
use tale::settings::Settings;
use tale::terminal::{parse_line, TerminalView};

/// Target frame interval (~60 Hz)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    // Initialize logging; stdout belongs to the game text
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Tale...");

    let mut settings = Settings::load();

    let output: Box<dyn AudioOutput> = match KiraOutput::new() {
        Ok(output) => Box::new(output),
        Err(e) => {
            warn!("{}, continuing without sound", e);
            Box::new(SilentOutput::new())
        }
    };
    let music = settings.music_map().unwrap_or_else(|e| {
        warn!("{}, using the built-in music table", e);
        LocationMusicMap::builtin()
    });
    let audio = AudioManager::new(output, music, settings.audio_config());

    let client = IntegrationClient::new(settings.server_config())
        .context("Failed to create game server client")?;
    let controller = CommandController::new(client, settings.ui.suggestions.clone());

    let mut app = App::new(controller, audio);
    let mut view = TerminalView::new(std::io::stdout());
    app.start(&mut view, settings.ui.start_location.as_deref());

    // Read stdin on its own thread so the frame loop never blocks
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut last_frame = Instant::now();
    let mut input_open = true;
    'frames: loop {
        while input_open {
            match rx.try_recv() {
                Ok(line) => {
                    if app.handle(parse_line(&line), &mut view) == Flow::Quit {
                        break 'frames;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    info!("Input closed");
                    input_open = false;
                }
            }
        }

        let now = Instant::now();
        app.frame(now.duration_since(last_frame), &mut view);
        last_frame = now;

        // Once input is gone, stay around only for answers still on the way
        if !input_open && !app.has_pending_requests() {
            break;
        }
        app.restore_focus(&mut view);

        thread::sleep(FRAME_INTERVAL);
    }

    app.shutdown();
    if settings.remember_audio(app.audio().session()) {
        if let Err(e) = settings.save() {
            warn!("Failed to save settings: {}", e);
        }
    }
    info!("Goodbye");
    Ok(())
}
