use crate::error::EngineError;
use crate::models::Outcome;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

const CGPA_WEIGHT: f64 = 0.4;
const PROJECT_WEIGHT: f64 = 0.3;
const INTERNSHIP_WEIGHT: f64 = 0.2;
const INTERNSHIP_MULTIPLIER: f64 = 10.0;
const EXTRACURRICULAR_WEIGHT: f64 = 0.1;

const HIGH_THRESHOLD: f64 = 70.0;
const LOW_THRESHOLD: f64 = 40.0;

const HIGH_REGIME: [(Outcome, u32); 3] = [
    (Outcome::Selected, 85),
    (Outcome::NoOffer, 10),
    (Outcome::Rejected, 5),
];
const LOW_REGIME: [(Outcome, u32); 3] = [
    (Outcome::Rejected, 50),
    (Outcome::Selected, 40),
    (Outcome::NoOffer, 10),
];
const MIDDLE_REGIME: [(Outcome, u32); 3] = [
    (Outcome::Selected, 60),
    (Outcome::NoOffer, 30),
    (Outcome::Rejected, 10),
];

/// Discrete distribution over a fixed set of categories with relative weights.
#[derive(Debug, Clone)]
pub struct WeightedChoice<T> {
    items: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T: Clone> WeightedChoice<T> {
    /// Weights are relative and need not sum to 100. At least one weight must be non-zero.
    pub fn new(entries: &[(T, u32)]) -> Result<Self, EngineError> {
        let index = WeightedIndex::new(entries.iter().map(|(_, weight)| *weight))
            .map_err(|e| EngineError::InvalidInput(format!("weight table rejected: {}", e)))?;

        Ok(Self {
            items: entries.iter().map(|(item, _)| item.clone()).collect(),
            index,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.items[self.index.sample(rng)].clone()
    }
}

/// Weighted score that decides which outcome regime a student falls into.
/// Each internship is worth 2.0 points (weight 0.2 times a multiplier of 10).
pub fn weighted_score(cgpa: f64, project_score: f64, internships: u32, extracurricular_score: f64) -> f64 {
    cgpa * CGPA_WEIGHT
        + project_score * PROJECT_WEIGHT
        + internships as f64 * INTERNSHIP_WEIGHT * INTERNSHIP_MULTIPLIER
        + extracurricular_score * EXTRACURRICULAR_WEIGHT
}

/// The three outcome regimes, built once and reused for every draw.
#[derive(Debug, Clone)]
pub struct OutcomeModel {
    high: WeightedChoice<Outcome>,
    middle: WeightedChoice<Outcome>,
    low: WeightedChoice<Outcome>,
}

impl OutcomeModel {
    /// Only fails if a regime table has no positive weight, which the built-in tables never do.
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            high: WeightedChoice::new(&HIGH_REGIME)?,
            middle: WeightedChoice::new(&MIDDLE_REGIME)?,
            low: WeightedChoice::new(&LOW_REGIME)?,
        })
    }

    /// Draw a placement outcome for one student. Every call is an independent draw.
    pub fn simulate_outcome<R: Rng + ?Sized>(
        &self,
        cgpa: f64,
        project_score: f64,
        internships: u32,
        extracurricular_score: f64,
        rng: &mut R,
    ) -> Outcome {
        let weighted = weighted_score(cgpa, project_score, internships, extracurricular_score);
        let choice = if weighted > HIGH_THRESHOLD {
            &self.high
        } else if weighted < LOW_THRESHOLD {
            &self.low
        } else {
            &self.middle
        };
        choice.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn regime_for(weighted: f64) -> &'static [(Outcome, u32); 3] {
        if weighted > HIGH_THRESHOLD {
            &HIGH_REGIME
        } else if weighted < LOW_THRESHOLD {
            &LOW_REGIME
        } else {
            &MIDDLE_REGIME
        }
    }

    fn tally(cgpa: f64, project: f64, internships: u32, extra: f64, draws: usize, seed: u64) -> HashMap<Outcome, usize> {
        let model = OutcomeModel::new().unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut counts = HashMap::new();
        for _ in 0..draws {
            let outcome = model.simulate_outcome(cgpa, project, internships, extra, &mut rng);
            *counts.entry(outcome).or_insert(0) += 1;
        }
        counts
    }

    fn share(counts: &HashMap<Outcome, usize>, outcome: Outcome, draws: usize) -> f64 {
        *counts.get(&outcome).unwrap_or(&0) as f64 / draws as f64
    }

    #[test]
    fn weighted_score_matches_formula() {
        // 0.4*8 + 0.3*70 + 2.0*2 + 0.1*60
        let w = weighted_score(8.0, 70.0, 2, 60.0);
        assert!((w - 34.2).abs() < 1e-9);
        assert!((weighted_score(0.0, 0.0, 1, 0.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn thresholds_are_exclusive() {
        // 35 internships score exactly 70: middle regime, so Selected stays near 60%
        assert_eq!(weighted_score(0.0, 0.0, 35, 0.0), 70.0);
        let counts = tally(0.0, 0.0, 35, 0.0, 10_000, 8);
        assert!((share(&counts, Outcome::Selected, 10_000) - 0.60).abs() < 0.03);

        assert_eq!(regime_for(70.0), &MIDDLE_REGIME);
        assert_eq!(regime_for(40.0), &MIDDLE_REGIME);
        assert_eq!(regime_for(70.01), &HIGH_REGIME);
        assert_eq!(regime_for(39.99), &LOW_REGIME);
    }

    #[test]
    fn high_regime_distribution() {
        // w = 4 + 60 + 6 + 10 = 80
        let draws = 10_000;
        let counts = tally(10.0, 200.0, 3, 100.0, draws, 42);
        assert!((share(&counts, Outcome::Selected, draws) - 0.85).abs() < 0.02);
        assert!((share(&counts, Outcome::NoOffer, draws) - 0.10).abs() < 0.02);
        assert!((share(&counts, Outcome::Rejected, draws) - 0.05).abs() < 0.02);
    }

    #[test]
    fn low_regime_distribution() {
        // w = 2.4 + 15 + 0 + 5 = 22.4
        let draws = 10_000;
        let counts = tally(6.0, 50.0, 0, 50.0, draws, 7);
        assert!((share(&counts, Outcome::Rejected, draws) - 0.50).abs() < 0.03);
        assert!((share(&counts, Outcome::Selected, draws) - 0.40).abs() < 0.03);
        assert!((share(&counts, Outcome::NoOffer, draws) - 0.10).abs() < 0.02);
    }

    #[test]
    fn middle_regime_distribution() {
        // w = 4 + 30 + 6 + 10 = 50
        let draws = 10_000;
        let counts = tally(10.0, 100.0, 3, 100.0, draws, 99);
        assert!((share(&counts, Outcome::Selected, draws) - 0.60).abs() < 0.03);
        assert!((share(&counts, Outcome::NoOffer, draws) - 0.30).abs() < 0.03);
        assert!((share(&counts, Outcome::Rejected, draws) - 0.10).abs() < 0.02);
    }

    #[test]
    fn same_seed_same_draws() {
        let model = OutcomeModel::new().unwrap();
        let mut a = SmallRng::seed_from_u64(123);
        let mut b = SmallRng::seed_from_u64(123);
        for _ in 0..50 {
            assert_eq!(
                model.simulate_outcome(8.1, 75.0, 1, 66.0, &mut a),
                model.simulate_outcome(8.1, 75.0, 1, 66.0, &mut b)
            );
        }
    }

    #[test]
    fn model_is_built_once_and_reused() {
        let model = OutcomeModel::new().unwrap();
        let copy = model.clone();
        let mut a = SmallRng::seed_from_u64(77);
        let mut b = SmallRng::seed_from_u64(77);
        // high, middle and low inputs through one model instance
        for (cgpa, project, internships, extra) in [(10.0, 200.0, 3, 100.0), (10.0, 100.0, 3, 100.0), (6.0, 50.0, 0, 50.0)] {
            for _ in 0..20 {
                assert_eq!(
                    model.simulate_outcome(cgpa, project, internships, extra, &mut a),
                    copy.simulate_outcome(cgpa, project, internships, extra, &mut b)
                );
            }
        }
    }

    #[test]
    fn weighted_choice_never_picks_zero_weight() {
        let choice = WeightedChoice::new(&[("a", 0), ("b", 3), ("c", 0)]).unwrap();
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..200 {
            assert_eq!(choice.sample(&mut rng), "b");
        }
    }

    #[test]
    fn weighted_choice_rejects_bad_tables() {
        assert!(matches!(
            WeightedChoice::<&str>::new(&[]),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(matches!(
            WeightedChoice::new(&[("a", 0), ("b", 0)]),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
