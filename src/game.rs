use crate::progression::{self, AnswerOutcome, Difficulty, Progress};
use crate::round::{Question, Round};
use rand::Rng;

/// The single game state value. Exactly one variant holds at any time;
/// per-round data lives inside `Playing` and is replaced wholesale when the
/// next question arrives.
#[derive(Debug, Clone)]
pub enum GameState {
    /// Waiting for the question provider; the spinner screen.
    Loading { progress: Progress },
    /// A question is on screen.
    Playing { progress: Progress, round: Round },
    /// The final question was answered correctly.
    Victory,
}

/// A user action or a provider result, fed to the reducer one at a time.
#[derive(Debug, Clone)]
pub enum Action {
    QuestionReady { question: Question, epoch: u64 },
    AnswerChosen(usize),
    LifelineRequested,
    NewGame,
}

/// Work the caller must perform after a transition. The core never does I/O
/// itself; every fetch is requested through this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Fetch { difficulty: Difficulty, epoch: u64 },
}

/// Reducer over [`GameState`]. All invariants (ladder position, lifeline
/// arming, stale-fetch rejection) hold after every `apply` call.
#[derive(Debug)]
pub struct Game {
    state: GameState,
    lifeline_used: bool,
    epoch: u64,
}

impl Game {
    /// Starts a new game and returns the initial fetch to run.
    pub fn new() -> (Self, Effect) {
        let progress = Progress::new();
        let game = Self {
            state: GameState::Loading { progress },
            lifeline_used: false,
            epoch: 0,
        };
        let effect = Effect::Fetch {
            difficulty: progress.difficulty(),
            epoch: 0,
        };
        (game, effect)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn lifeline_used(&self) -> bool {
        self.lifeline_used
    }

    /// Identifier of the fetch the game is currently willing to accept.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The ladder position, regardless of variant. `None` once won.
    pub fn progress(&self) -> Option<Progress> {
        match &self.state {
            GameState::Loading { progress } | GameState::Playing { progress, .. } => Some(*progress),
            GameState::Victory => None,
        }
    }

    /// Applies one action and returns the follow-up work, if any.
    pub fn apply<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> Option<Effect> {
        match action {
            Action::NewGame => {
                // Discards any in-flight round unconditionally; a stale
                // fetch result will carry an old epoch and be dropped.
                self.epoch += 1;
                self.lifeline_used = false;
                let progress = Progress::new();
                self.state = GameState::Loading { progress };
                Some(Effect::Fetch {
                    difficulty: progress.difficulty(),
                    epoch: self.epoch,
                })
            }
            Action::QuestionReady { question, epoch } => {
                if epoch != self.epoch {
                    return None;
                }
                if let GameState::Loading { progress } = self.state {
                    self.state = GameState::Playing {
                        progress,
                        round: Round::new(question, rng),
                    };
                }
                None
            }
            Action::AnswerChosen(chosen) => {
                let GameState::Playing { progress, round } = &self.state else {
                    return None;
                };

                let (next, outcome) =
                    progression::submit_answer(*progress, chosen, round.correct_index());
                match outcome {
                    AnswerOutcome::Won => {
                        self.state = GameState::Victory;
                        None
                    }
                    AnswerOutcome::Advance | AnswerOutcome::Reset => {
                        if outcome == AnswerOutcome::Reset {
                            // The lifeline re-arms only on a fall to the
                            // bottom, never on correct progression.
                            self.lifeline_used = false;
                        }
                        self.epoch += 1;
                        self.state = GameState::Loading { progress: next };
                        Some(Effect::Fetch {
                            difficulty: next.difficulty(),
                            epoch: self.epoch,
                        })
                    }
                }
            }
            Action::LifelineRequested => {
                if self.lifeline_used {
                    return None;
                }
                if let GameState::Playing { progress, round } = &mut self.state {
                    let difficulty = progress.difficulty();
                    round.run_poll(difficulty, rng);
                    self.lifeline_used = true;
                }
                None
            }
        }
    }
}
