use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::models::domain::AnswerLabel;

/// Picks the target correct-answer label for each multiple-choice item of a
/// batch, favouring labels that have been used less so far.
///
/// Balance is approximate: every label keeps a non-zero chance on every draw.
pub struct AnswerBalancer<R: Rng = StdRng> {
    counts: [u32; 4],
    rng: R,
}

impl AnswerBalancer<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AnswerBalancer<R> {
    pub fn new(rng: R) -> Self {
        Self { counts: [0; 4], rng }
    }

    pub fn choose_label(&mut self) -> AnswerLabel {
        let noise: [f64; 4] = std::array::from_fn(|_| self.rng.gen::<f64>());
        let weights = self.weights(noise);

        let total_weight: f64 = weights.iter().sum();
        let mut remaining = self.rng.gen::<f64>() * total_weight;

        let mut chosen = AnswerLabel::D;
        for (label, weight) in AnswerLabel::ALL.into_iter().zip(weights) {
            remaining -= weight;
            if remaining <= 0.0 {
                chosen = label;
                break;
            }
        }

        self.counts[chosen.index()] += 1;
        chosen
    }

    pub fn count(&self, label: AnswerLabel) -> u32 {
        self.counts[label.index()]
    }

    pub fn counts(&self) -> [(AnswerLabel, u32); 4] {
        AnswerLabel::ALL.map(|label| (label, self.count(label)))
    }

    pub fn reset(&mut self) {
        self.counts = [0; 4];
    }

    // (total - count + noise) / total, with total = sum(counts) + 1
    fn weights(&self, noise: [f64; 4]) -> [f64; 4] {
        let total = f64::from(self.counts.iter().sum::<u32>() + 1);
        std::array::from_fn(|i| (total - f64::from(self.counts[i]) + noise[i]) / total)
    }
}
