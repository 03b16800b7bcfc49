use crate::progression::Difficulty;
use crate::round::Question;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::thread;
use std::time::Duration;

static ASSET_DIR: Dir = include_dir!("assets");

const OPENTDB_URL: &str = "https://opentdb.com/api.php";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("trivia api returned response code {0}")]
    Api(u8),
    #[error("trivia api returned no questions")]
    Empty,
    #[error("no bundled questions for {0} difficulty")]
    Exhausted(Difficulty),
    #[error("giving up after {0} failed fetch attempts")]
    RetriesExhausted(usize),
}

/// Source of trivia questions. Implementations may fail transiently;
/// recovery is the retry policy's job, not theirs.
pub trait QuestionProvider: Send + Sync {
    fn fetch(&self, difficulty: Difficulty) -> Result<Question, ProviderError>;
}

// Wire model for the Open Trivia DB response.
#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    response_code: u8,
    results: Vec<ApiQuestion>,
}

impl From<ApiQuestion> for Question {
    fn from(q: ApiQuestion) -> Self {
        Question {
            prompt: q.question,
            correct_answer: q.correct_answer,
            distractors: q.incorrect_answers,
        }
    }
}

/// Fetches single multiple-choice questions from the Open Trivia DB API.
#[derive(Debug, Clone)]
pub struct OpenTdbProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl OpenTdbProvider {
    pub fn new() -> Self {
        Self::with_base_url(OPENTDB_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenTdbProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionProvider for OpenTdbProvider {
    fn fetch(&self, difficulty: Difficulty) -> Result<Question, ProviderError> {
        let response: ApiResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("amount", "1"),
                ("type", "multiple"),
                ("difficulty", &difficulty.to_string()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        if response.response_code != 0 {
            return Err(ProviderError::Api(response.response_code));
        }
        response
            .results
            .into_iter()
            .next()
            .map(Question::from)
            .ok_or(ProviderError::Empty)
    }
}

#[derive(Debug, Deserialize)]
struct Bank {
    easy: Vec<ApiQuestion>,
    medium: Vec<ApiQuestion>,
    hard: Vec<ApiQuestion>,
}

/// Offline question source backed by a bank compiled into the binary.
#[derive(Debug)]
pub struct BundledProvider {
    bank: Bank,
}

impl BundledProvider {
    pub fn new() -> Self {
        let file = ASSET_DIR
            .get_file("trivia.json")
            .expect("bundled trivia bank not found");
        let contents = file
            .contents_utf8()
            .expect("unable to interpret bundled bank as a string");
        let bank = serde_json::from_str(contents).expect("unable to deserialize bundled bank");
        Self { bank }
    }
}

impl Default for BundledProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionProvider for BundledProvider {
    fn fetch(&self, difficulty: Difficulty) -> Result<Question, ProviderError> {
        let tier = match difficulty {
            Difficulty::Easy => &self.bank.easy,
            Difficulty::Medium => &self.bank.medium,
            Difficulty::Hard => &self.bank.hard,
        };
        tier.choose(&mut rand::thread_rng())
            .map(|q| Question {
                prompt: q.question.clone(),
                correct_answer: q.correct_answer.clone(),
                distractors: q.incorrect_answers.clone(),
            })
            .ok_or(ProviderError::Exhausted(difficulty))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    None,
    Exponential { base: Duration, cap: Duration },
}

/// How fetch failures are retried. The default is retry forever,
/// immediately: the spinner keeps spinning until a question arrives.
/// Anything else is an explicit override by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: Option<usize>,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            backoff: Backoff::None,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep before retry number `attempt` (1-based count of
    /// failures so far).
    pub fn delay_before_retry(&self, attempt: usize) -> Duration {
        match self.backoff {
            Backoff::None => Duration::ZERO,
            Backoff::Exponential { base, cap } => {
                let exp = attempt.saturating_sub(1).min(16) as u32;
                base.saturating_mul(2u32.saturating_pow(exp)).min(cap)
            }
        }
    }
}

/// Fetches a question, retrying failures per `policy`. Blocks until a
/// question arrives or the attempt budget is spent; with the default
/// unlimited policy it only ever returns `Ok`.
pub fn fetch_with_retry(
    provider: &dyn QuestionProvider,
    difficulty: Difficulty,
    policy: RetryPolicy,
) -> Result<Question, ProviderError> {
    let mut failures = 0;
    loop {
        match provider.fetch(difficulty) {
            Ok(question) => return Ok(question),
            Err(_) => {
                failures += 1;
                if let Some(max) = policy.max_attempts {
                    if failures >= max {
                        return Err(ProviderError::RetriesExhausted(failures));
                    }
                }
                let delay = policy.delay_before_retry(failures);
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
        }
    }
}
