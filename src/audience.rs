use crate::progression::Difficulty;
use rand::Rng;

/// Upper bound on allocation picks before the residue is dumped in one go.
/// The increments are uniform in [0,10) so 64 picks is far beyond what a
/// remaining share under 100 points ever needs.
const MAX_PICKS: usize = 64;

/// Simulated "ask the audience" result. Vote percentages are aligned with
/// the round's answer order and always sum to 100.
#[derive(Debug, Clone, PartialEq)]
pub struct AudiencePoll {
    votes: Vec<f64>,
}

impl AudiencePoll {
    pub fn percentage(&self, answer_index: usize) -> f64 {
        self.votes[answer_index]
    }

    pub fn votes(&self) -> &[f64] {
        &self.votes
    }
}

fn base_correct_share(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 80.0,
        Difficulty::Medium => 65.0,
        Difficulty::Hard => 50.0,
    }
}

/// Generates a synthetic vote distribution for one question.
///
/// The correct answer gets a fixed share by tier (80/65/50), hard questions
/// lose a further uniform [5,15) points to model audience uncertainty, and
/// the remainder is scattered across the wrong answers in random increments
/// of up to 10 points each. The final increment is clamped so the total is
/// exactly 100.
pub fn simulate<R: Rng + ?Sized>(
    answer_count: usize,
    correct_index: usize,
    difficulty: Difficulty,
    rng: &mut R,
) -> AudiencePoll {
    let mut votes = vec![0.0; answer_count];

    let mut correct_share = base_correct_share(difficulty);
    if difficulty == Difficulty::Hard {
        correct_share -= rng.gen_range(5.0..15.0);
    }
    votes[correct_index] = correct_share;

    let wrong: Vec<usize> = (0..answer_count).filter(|&i| i != correct_index).collect();
    let remaining = 100.0 - correct_share;
    let mut distributed = 0.0;

    for _ in 0..MAX_PICKS {
        if distributed >= remaining {
            break;
        }
        let slot = wrong[rng.gen_range(0..wrong.len())];
        let vote = rng.gen_range(0.0f64..10.0).min(remaining - distributed);
        votes[slot] += vote;
        distributed += vote;
    }

    // Near-zero increments could in principle starve the loop; hand any
    // residue to a single wrong answer so the total stays exact.
    if distributed < remaining {
        let slot = wrong[rng.gen_range(0..wrong.len())];
        votes[slot] += remaining - distributed;
    }

    AudiencePoll { votes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPSILON: f64 = 1e-9;

    fn poll(difficulty: Difficulty, correct: usize, seed: u64) -> AudiencePoll {
        let mut rng = StdRng::seed_from_u64(seed);
        simulate(4, correct, difficulty, &mut rng)
    }

    #[test]
    fn test_votes_sum_to_one_hundred() {
        for seed in 0..200 {
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                for correct in 0..4 {
                    let p = poll(difficulty, correct, seed);
                    let sum: f64 = p.votes().iter().sum();
                    assert!(
                        (sum - 100.0).abs() < EPSILON,
                        "sum {} for {:?} seed {}",
                        sum,
                        difficulty,
                        seed
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_answer_has_a_non_negative_entry() {
        for seed in 0..100 {
            let p = poll(Difficulty::Hard, 1, seed);
            assert_eq!(p.votes().len(), 4);
            for &v in p.votes() {
                assert!(v >= 0.0);
            }
        }
    }

    #[test]
    fn test_easy_correct_share_is_exactly_eighty() {
        for seed in 0..50 {
            let p = poll(Difficulty::Easy, 2, seed);
            assert_eq!(p.percentage(2), 80.0);
        }
    }

    #[test]
    fn test_medium_correct_share_is_exactly_sixty_five() {
        for seed in 0..50 {
            let p = poll(Difficulty::Medium, 0, seed);
            assert_eq!(p.percentage(0), 65.0);
        }
    }

    #[test]
    fn test_hard_correct_share_is_noisy() {
        for seed in 0..100 {
            let p = poll(Difficulty::Hard, 3, seed);
            let share = p.percentage(3);
            assert!(share > 35.0 && share <= 45.0, "share {} seed {}", share, seed);
        }
    }

    #[test]
    fn test_correct_answer_leads_on_easy() {
        // 80 points to the correct answer leaves at most 20 for the rest.
        for seed in 0..50 {
            let p = poll(Difficulty::Easy, 0, seed);
            for wrong in 1..4 {
                assert!(p.percentage(0) > p.percentage(wrong));
            }
        }
    }

    #[test]
    fn test_same_seed_same_poll() {
        assert_eq!(poll(Difficulty::Hard, 1, 42), poll(Difficulty::Hard, 1, 42));
    }

    #[test]
    fn test_distribution_varies_across_seeds() {
        assert_ne!(poll(Difficulty::Easy, 1, 1), poll(Difficulty::Easy, 1, 2));
    }
}
