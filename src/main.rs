use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fogmaze::{Dir, GameSession, GameState, MazeError, Settings, Snapshot};

mod render;

use render::{hud_line, Renderer};

const HELP: &str = "Arrows/hjkl move, t torch, n new, q quit";

/// Frontend state around the session: status line and the frozen timer.
struct App {
    settings: Settings,
    session: GameSession,
    status: String,
    won_after: Option<u64>,
}

enum Action {
    Move(Dir),
    Torch,
    NewGame,
    Quit,
}

impl App {
    fn start(settings: Settings) -> Result<Self, MazeError> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let session = GameSession::new(
            settings.rows,
            settings.cols,
            settings.wall_ratio(),
            settings.torch_ratio(),
            rng,
        )?;
        Ok(App {
            settings,
            session,
            status: format!("New game! {HELP}"),
            won_after: None,
        })
    }

    fn new_game(&mut self) {
        let s = &self.settings;
        match self
            .session
            .initialize(s.rows, s.cols, s.wall_ratio(), s.torch_ratio())
        {
            Ok(()) => {
                self.status = format!("New game! {HELP}");
                self.won_after = None;
            }
            Err(err) => {
                error!(%err, "could not start a new game");
                self.status = format!("Maze failed: {err}");
            }
        }
    }

    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::NewGame => self.new_game(),
            Action::Move(dir) => {
                if self.session.state() != GameState::Running {
                    return true;
                }
                if !self.session.move_player(dir) {
                    self.status = "Blocked.".to_string();
                } else if self.session.state() == GameState::Won {
                    let secs = self.session.elapsed_secs();
                    self.won_after = Some(secs);
                    self.status = format!("You escaped in {secs}s! Press n to play again.");
                } else {
                    self.status = HELP.to_string();
                }
            }
            Action::Torch => {
                if self.session.state() != GameState::Running {
                    return true;
                }
                self.status = if self.session.use_torch() {
                    "Torch lit!".to_string()
                } else {
                    "No torch available!".to_string()
                };
            }
        }
        true
    }

    fn tick(&mut self, now: Instant) {
        if self.session.tick(now) {
            self.status = "The torch went out.".to_string();
        }
    }

    fn hud(&self, snapshot: &Snapshot) -> String {
        hud_line(&self.status, snapshot, self.won_after)
    }
}

fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(Dir::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(Dir::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(Dir::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(Dir::Right)),
        KeyCode::Char('t') => Some(Action::Torch),
        KeyCode::Char('n') => Some(Action::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

fn main() -> io::Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings)?;

    let app = App::start(settings)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, app);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// Logs go to a file, if any; the terminal belongs to the game.
fn init_logging(settings: &Settings) -> io::Result<()> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fogmaze=info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, mut app: App) -> io::Result<()> {
    let mut renderer = Renderer::new();
    let frame_time = Duration::from_micros(1_000_000 / app.settings.fps.max(1));
    info!(settings = ?app.settings, "started");

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = action_for(key.code) {
                        if !app.apply(action) {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(..) => renderer.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        app.tick(now);
        let snapshot = app.session.snapshot(now);
        renderer.render(stdout, &snapshot, &app.hud(&snapshot))?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
