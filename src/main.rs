pub mod audience;
pub mod config;
pub mod decode;
pub mod game;
pub mod progression;
pub mod provider;
pub mod round;
pub mod runtime;
pub mod ui;

use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::game::{Action, Effect, Game};
use crate::provider::{
    fetch_with_retry, BundledProvider, OpenTdbProvider, QuestionProvider, RetryPolicy,
};
use crate::runtime::{ChannelEventSource, FixedTicker, QuizEvent, Runner};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{self, Event as CtEvent, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::{
        mpsc::{self, Sender},
        Arc,
    },
    thread,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// escalating trivia quiz for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Climb a ladder of 15 trivia questions of rising difficulty. One wrong answer sends you back to the bottom; an ask-the-audience lifeline re-arms each time you fall."
)]
pub struct Cli {
    /// play from the bundled question bank instead of the Open Trivia DB API
    #[clap(long)]
    offline: bool,

    /// give up after this many failed fetch attempts (default: retry forever)
    #[clap(long)]
    max_attempts: Option<usize>,

    /// base of the exponential retry backoff in milliseconds (default: retry immediately)
    #[clap(long)]
    backoff: Option<u64>,

    /// trivia API endpoint to fetch questions from
    #[clap(long)]
    api_url: Option<String>,
}

impl Cli {
    /// Overlay explicit flags on top of the saved configuration.
    fn apply_to(&self, cfg: &mut Config) {
        if self.offline {
            cfg.offline = true;
        }
        if self.max_attempts.is_some() {
            cfg.max_attempts = self.max_attempts;
        }
        if self.backoff.is_some() {
            cfg.backoff_ms = self.backoff;
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub spinner_frame: usize,
}

impl App {
    pub fn new() -> (Self, Effect) {
        let (game, first_fetch) = Game::new();
        (
            Self {
                game,
                spinner_frame: 0,
            },
            first_fetch,
        )
    }

    pub fn current_epoch(&self) -> u64 {
        self.game.epoch()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut cfg = store.load();
    cli.apply_to(&mut cfg);
    let _ = store.save(&cfg);

    let provider: Arc<dyn QuestionProvider> = if cfg.offline {
        Arc::new(BundledProvider::new())
    } else if let Some(url) = &cli.api_url {
        Arc::new(OpenTdbProvider::with_base_url(url.clone()))
    } else {
        Arc::new(OpenTdbProvider::new())
    };
    let policy = cfg.retry_policy();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, provider, policy);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    provider: Arc<dyn QuestionProvider>,
    policy: RetryPolicy,
) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = mpsc::channel();
    spawn_input_thread(tx.clone());

    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    let mut rng = rand::thread_rng();
    let (mut app, first_fetch) = App::new();
    spawn_fetch(first_fetch, &provider, policy, &tx);

    loop {
        terminal.draw(|f| f.render_widget(&app, f.area()))?;

        let action = match runner.step() {
            QuizEvent::Tick => {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
                None
            }
            QuizEvent::Resize => None,
            QuizEvent::Question { question, epoch } => {
                Some(Action::QuestionReady { question, epoch })
            }
            QuizEvent::FetchFailed(reason) => return Err(reason.into()),
            QuizEvent::Key(key) => match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Char(c) => action_for_char(c),
                _ => None,
            },
        };

        if let Some(action) = action {
            if let Some(effect) = app.game.apply(action, &mut rng) {
                spawn_fetch(effect, &provider, policy, &tx);
            }
        }
    }
}

/// Maps a pressed character to a game action. Answers go by letter or by
/// number; everything else is ignored.
fn action_for_char(c: char) -> Option<Action> {
    match c.to_ascii_lowercase() {
        lc @ 'a'..='d' => Some(Action::AnswerChosen(lc as usize - 'a' as usize)),
        n @ '1'..='4' => Some(Action::AnswerChosen(n as usize - '1' as usize)),
        'l' => Some(Action::LifelineRequested),
        'n' => Some(Action::NewGame),
        _ => None,
    }
}

/// Runs one fetch on its own thread so the event loop never blocks on the
/// network. The result comes back through the shared event channel tagged
/// with its epoch.
fn spawn_fetch(
    effect: Effect,
    provider: &Arc<dyn QuestionProvider>,
    policy: RetryPolicy,
    tx: &Sender<QuizEvent>,
) {
    let Effect::Fetch { difficulty, epoch } = effect;
    let provider = Arc::clone(provider);
    let tx = tx.clone();

    thread::spawn(move || {
        let event = match fetch_with_retry(provider.as_ref(), difficulty, policy) {
            Ok(question) => QuizEvent::Question { question, epoch },
            Err(err) => QuizEvent::FetchFailed(err.to_string()),
        };
        let _ = tx.send(event);
    });
}

fn spawn_input_thread(tx: Sender<QuizEvent>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(CtEvent::Key(key)) => {
                if tx.send(QuizEvent::Key(key)).is_err() {
                    break;
                }
            }
            Ok(CtEvent::Resize(_, _)) => {
                if tx.send(QuizEvent::Resize).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use crate::progression::Difficulty;
    use assert_matches::assert_matches;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["hotseat"]);

        assert!(!cli.offline);
        assert_eq!(cli.max_attempts, None);
        assert_eq!(cli.backoff, None);
        assert_eq!(cli.api_url, None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "hotseat",
            "--offline",
            "--max-attempts",
            "5",
            "--backoff",
            "250",
            "--api-url",
            "http://localhost:8080/api.php",
        ]);

        assert!(cli.offline);
        assert_eq!(cli.max_attempts, Some(5));
        assert_eq!(cli.backoff, Some(250));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080/api.php"));
    }

    #[test]
    fn test_cli_overrides_saved_config() {
        let cli = Cli::parse_from(["hotseat", "--offline", "--max-attempts", "3"]);
        let mut cfg = Config {
            offline: false,
            max_attempts: None,
            backoff_ms: Some(100),
        };

        cli.apply_to(&mut cfg);

        assert!(cfg.offline);
        assert_eq!(cfg.max_attempts, Some(3));
        // Unset flags leave the stored values alone.
        assert_eq!(cfg.backoff_ms, Some(100));
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let cli = Cli::parse_from(["hotseat"]);
        let mut cfg = Config {
            offline: true,
            max_attempts: Some(7),
            backoff_ms: None,
        };

        cli.apply_to(&mut cfg);

        assert!(cfg.offline);
        assert_eq!(cfg.max_attempts, Some(7));
    }

    #[test]
    fn test_app_starts_loading_the_first_easy_question() {
        let (app, first_fetch) = App::new();

        assert_matches!(app.game.state(), GameState::Loading { progress } if progress.question_index == 0);
        assert_eq!(
            first_fetch,
            Effect::Fetch {
                difficulty: Difficulty::Easy,
                epoch: 0
            }
        );
        assert_eq!(app.spinner_frame, 0);
    }

    #[test]
    fn test_answer_keys_by_letter() {
        for (c, expected) in [('a', 0), ('b', 1), ('c', 2), ('d', 3), ('B', 1), ('D', 3)] {
            assert_matches!(
                action_for_char(c),
                Some(Action::AnswerChosen(i)) if i == expected,
                "key {:?}",
                c
            );
        }
    }

    #[test]
    fn test_answer_keys_by_number() {
        for (c, expected) in [('1', 0), ('2', 1), ('3', 2), ('4', 3)] {
            assert_matches!(
                action_for_char(c),
                Some(Action::AnswerChosen(i)) if i == expected,
                "key {:?}",
                c
            );
        }
    }

    #[test]
    fn test_lifeline_and_new_game_keys() {
        assert_matches!(action_for_char('l'), Some(Action::LifelineRequested));
        assert_matches!(action_for_char('L'), Some(Action::LifelineRequested));
        assert_matches!(action_for_char('n'), Some(Action::NewGame));
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        for c in ['e', 'z', '5', '0', ' ', '?'] {
            assert!(action_for_char(c).is_none(), "key {:?}", c);
        }
    }
}
