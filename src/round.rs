use crate::audience::{self, AudiencePoll};
use crate::decode::decode_entities;
use crate::progression::Difficulty;
use rand::seq::SliceRandom;
use rand::Rng;

/// A raw question as fetched from a provider: entity-encoded text, correct
/// answer and distractors still separate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    pub distractors: Vec<String>,
}

/// One question's playable state: decoded prompt, shuffled answers, and the
/// audience poll once the lifeline has been used.
///
/// Built exactly once per fetched question; the shuffle and decoding never
/// recompute after that.
#[derive(Debug, Clone)]
pub struct Round {
    pub prompt: String,
    answers: Vec<String>,
    correct_index: usize,
    poll: Option<AudiencePoll>,
}

impl Round {
    /// Decodes the question text and lays the four answers out in uniformly
    /// random order.
    pub fn new<R: Rng + ?Sized>(question: Question, rng: &mut R) -> Self {
        let prompt = decode_entities(&question.prompt);

        let mut tagged: Vec<(bool, String)> = question
            .distractors
            .iter()
            .map(|a| (false, decode_entities(a)))
            .collect();
        tagged.push((true, decode_entities(&question.correct_answer)));
        tagged.shuffle(rng);

        let correct_index = tagged
            .iter()
            .position(|(correct, _)| *correct)
            .expect("shuffled answer set keeps its correct entry");
        let answers = tagged.into_iter().map(|(_, text)| text).collect();

        Self {
            prompt,
            answers,
            correct_index,
            poll: None,
        }
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Runs the audience poll for this round, or returns the one already
    /// taken. The poll is rolled at most once; asking again never re-rolls.
    pub fn run_poll<R: Rng + ?Sized>(&mut self, difficulty: Difficulty, rng: &mut R) -> &AudiencePoll {
        let answer_count = self.answers.len();
        let correct_index = self.correct_index;
        self.poll
            .get_or_insert_with(|| audience::simulate(answer_count, correct_index, difficulty, rng))
    }

    pub fn poll(&self) -> Option<&AudiencePoll> {
        self.poll.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sample_question() -> Question {
        Question {
            prompt: "Who wrote &quot;Dune&quot;?".to_string(),
            correct_answer: "Frank Herbert".to_string(),
            distractors: vec![
                "Isaac Asimov".to_string(),
                "Arthur C. Clarke".to_string(),
                "Ursula K. Le Guin".to_string(),
            ],
        }
    }

    #[test]
    fn test_round_decodes_prompt() {
        let mut rng = StdRng::seed_from_u64(1);
        let round = Round::new(sample_question(), &mut rng);
        assert_eq!(round.prompt, "Who wrote \"Dune\"?");
    }

    #[test]
    fn test_round_has_four_answers_with_one_correct() {
        let mut rng = StdRng::seed_from_u64(7);
        let round = Round::new(sample_question(), &mut rng);

        assert_eq!(round.answers().len(), 4);
        assert!(round.correct_index() < 4);
        assert_eq!(round.answers()[round.correct_index()], "Frank Herbert");

        let unique: HashSet<&str> = round.answers().iter().map(String::as_str).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_shuffle_places_correct_answer_at_every_position() {
        let mut seen = HashSet::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let round = Round::new(sample_question(), &mut rng);
            seen.insert(round.correct_index());
        }
        assert_eq!(seen.len(), 4, "correct answer stuck to positions {:?}", seen);
    }

    #[test]
    fn test_answers_decode_entities() {
        let question = Question {
            prompt: "?".to_string(),
            correct_answer: "Caf&eacute;".to_string(),
            distractors: vec!["A&amp;B".to_string(), "C".to_string(), "D".to_string()],
        };
        let mut rng = StdRng::seed_from_u64(3);
        let round = Round::new(question, &mut rng);

        assert!(round.answers().iter().any(|a| a == "Café"));
        assert!(round.answers().iter().any(|a| a == "A&B"));
    }

    #[test]
    fn test_poll_starts_absent() {
        let mut rng = StdRng::seed_from_u64(5);
        let round = Round::new(sample_question(), &mut rng);
        assert!(round.poll().is_none());
    }

    #[test]
    fn test_run_poll_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = Round::new(sample_question(), &mut rng);

        let first = round.run_poll(Difficulty::Hard, &mut rng).clone();
        // A second ask must not re-roll, whatever the rng would produce next.
        let second = round.run_poll(Difficulty::Hard, &mut rng).clone();
        assert_eq!(first, second);
        assert_eq!(round.poll(), Some(&first));
    }

    #[test]
    fn test_poll_votes_align_with_answers() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut round = Round::new(sample_question(), &mut rng);
        let correct = round.correct_index();

        let poll = round.run_poll(Difficulty::Easy, &mut rng);
        assert_eq!(poll.votes().len(), 4);
        assert_eq!(poll.percentage(correct), 80.0);
    }
}
