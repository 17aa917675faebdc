pub mod app_dirs;
pub mod audio;
pub mod celebration;
pub mod config;
pub mod content;
pub mod game;
pub mod runtime;
pub mod scheduler;
pub mod summary;
pub mod ui;

use crate::{
    app_dirs::AppDirs,
    audio::SoundEngine,
    celebration::StarAnimation,
    config::{Config, ConfigStore, FileConfigStore},
    content::Deck,
    game::{AudioCue, Game, Level, Screen},
    runtime::{CrosstermEventSource, FixedTicker, LoopEvent, Runner},
    summary::SessionRecord,
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};

const TICK_RATE_MS: u64 = 25;

/// keyboard mini-game that teaches kids letters, digits and Dutch words
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A Mario-flavored keyboard game for young children: press the letter the game calls out, collect coins and streaks, and spell your first Dutch words."
)]
pub struct Cli {
    /// level to jump straight into, skipping the menu
    #[clap(short = 'l', long, value_enum)]
    level: Option<LevelArg>,

    /// number of lives a session starts with
    #[clap(long)]
    lives: Option<u32>,

    /// play without any sound
    #[clap(short = 'm', long)]
    muted: bool,

    /// directory with recorded letter and word clips
    #[clap(long)]
    audio_dir: Option<PathBuf>,

    /// skip writing the session log
    #[clap(long)]
    no_log: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum LevelArg {
    One,
    Two,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::One => Level::One,
            LevelArg::Two => Level::Two,
        }
    }
}

/// Settings come from the config file; command line flags win per run.
fn resolve_config(cli: &Cli, store: &dyn ConfigStore) -> Config {
    let mut config = store.load();
    if let Some(lives) = cli.lives {
        // never start with zero lives
        config.starting_lives = lives.max(1);
    }
    if cli.muted {
        config.muted = true;
    }
    if let Some(dir) = &cli.audio_dir {
        config.audio_dir = Some(dir.clone());
    }
    if cli.no_log {
        config.log_sessions = false;
    }
    config
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub celebration: StarAnimation,
}

impl App {
    pub fn new(cli: &Cli, settings: &Config) -> Self {
        let mut game = Game::new(Deck::load(), settings.starting_lives);
        if let Some(level) = cli.level {
            let _ = game.start(level.into());
        }

        Self {
            game,
            celebration: StarAnimation::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let settings = resolve_config(&cli, &FileConfigStore::new());
    let sound = if settings.muted {
        None
    } else {
        let audio_dir = settings.audio_dir.clone().or_else(AppDirs::audio_dir);
        SoundEngine::new(audio_dir)
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli, &settings);
    start_tui(&mut terminal, &mut app, sound.as_ref(), settings.log_sessions)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    Ok(())
}

#[derive(Debug, PartialEq)]
enum KeyOutcome {
    Continue,
    Quit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    sound: Option<&SoundEngine>,
    log_sessions: bool,
) -> Result<(), Box<dyn Error>> {
    let source = CrosstermEventSource::new();
    let ticker = FixedTicker::new(Duration::from_millis(TICK_RATE_MS));
    let mut runner = Runner::new(source, ticker);

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            LoopEvent::Tick(dt) => {
                let cues = app.game.on_tick(dt);
                dispatch_cues(sound, &cues);

                if app.game.star_active && !app.celebration.is_active {
                    let size = terminal.size().unwrap_or_default();
                    app.celebration.start(size.width, size.height);
                }
                app.celebration.update();

                // Menus are static; only animated screens need tick redraws.
                if app.celebration.is_active || app.game.screen == Screen::Playing {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            LoopEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            LoopEvent::Key(key) => {
                if handle_key(app, key, sound, log_sessions) == KeyOutcome::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    key: KeyEvent,
    sound: Option<&SoundEngine>,
    log_sessions: bool,
) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    match app.game.screen {
        Screen::Menu => match key.code {
            KeyCode::Char('1') => {
                let cues = app.game.start(Level::One);
                dispatch_cues(sound, &cues);
            }
            KeyCode::Char('2') => {
                let cues = app.game.start(Level::Two);
                dispatch_cues(sound, &cues);
            }
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            _ => {}
        },
        Screen::Playing => match key.code {
            KeyCode::Char(c) => {
                let cues = app.game.submit_key(c);
                dispatch_cues(sound, &cues);
                if app.game.screen == Screen::GameOver && log_sessions {
                    log_session(&app.game);
                }
            }
            KeyCode::Enter => {
                let cues = app.game.replay();
                dispatch_cues(sound, &cues);
            }
            KeyCode::Esc => {
                if log_sessions {
                    log_session(&app.game);
                }
                let cues = app.game.back_to_menu();
                dispatch_cues(sound, &cues);
                app.celebration.stop();
            }
            _ => {}
        },
        Screen::GameOver => match key.code {
            KeyCode::Enter => {
                let cues = app.game.restart();
                dispatch_cues(sound, &cues);
            }
            KeyCode::Esc => {
                let cues = app.game.back_to_menu();
                dispatch_cues(sound, &cues);
            }
            _ => {}
        },
    }

    KeyOutcome::Continue
}

fn dispatch_cues(sound: Option<&SoundEngine>, cues: &[AudioCue]) {
    let Some(engine) = sound else {
        return;
    };
    for cue in cues {
        match cue {
            AudioCue::Jump => engine.play_jump(),
            AudioCue::Coin => engine.play_coin(),
            AudioCue::Bump => engine.play_bump(),
            AudioCue::PowerUp => engine.play_power_up(),
            AudioCue::GameOver => engine.play_game_over(),
            AudioCue::Pronounce(c) => engine.pronounce(*c),
            AudioCue::Speak(word) => engine.speak(word),
            AudioCue::StopAll => engine.stop_all(),
        }
    }
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::One => "letters",
        Level::Two => "woorden",
    }
}

fn log_session(game: &Game) {
    if let Some(path) = AppDirs::sessions_path() {
        write_session_log(game, &path);
    }
}

/// Appends one CSV row for the session; write failures are ignored.
fn write_session_log(game: &Game, path: &Path) {
    if game.summary.is_empty() {
        return;
    }
    let record = SessionRecord::new(level_label(game.level), game.score, &game.summary);
    let _ = summary::append_record(path, &record);
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
