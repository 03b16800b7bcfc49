/// Number of questions on the ladder.
pub const LADDER_LEN: usize = 15;

/// Index of the last question; a correct answer here wins the game.
pub const FINAL_INDEX: usize = LADDER_LEN - 1;

/// Difficulty tier of a question, derived from its position on the ladder.
///
/// Never stored alongside the progress value; always recomputed from the
/// question index so the two can't drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn for_index(question_index: usize) -> Self {
        match question_index {
            0..=4 => Difficulty::Easy,
            5..=9 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }
}

/// Position on the 15-question ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub question_index: usize,
    pub won: bool,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_index(self.question_index)
    }

    /// 1-based question number for display.
    pub fn question_number(&self) -> usize {
        self.question_index + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct answer below the final rung; move up one question.
    Advance,
    /// Correct answer on the final rung; game over, player wins.
    Won,
    /// Wrong answer; back to the first question.
    Reset,
}

/// Applies one answer to the ladder.
///
/// `chosen` and `correct` are indices into the current round's answer set.
/// Pure: the caller is responsible for fetching the next question after
/// `Advance` and `Reset`.
pub fn submit_answer(progress: Progress, chosen: usize, correct: usize) -> (Progress, AnswerOutcome) {
    if chosen != correct {
        return (Progress::new(), AnswerOutcome::Reset);
    }

    if progress.question_index >= FINAL_INDEX {
        (
            Progress {
                question_index: FINAL_INDEX,
                won: true,
            },
            AnswerOutcome::Won,
        )
    } else {
        (
            Progress {
                question_index: progress.question_index + 1,
                won: false,
            },
            AnswerOutcome::Advance,
        )
    }
}
