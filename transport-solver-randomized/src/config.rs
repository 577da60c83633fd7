//! Tuning knobs shared by the randomized planners.

/// Configuration for the randomized restart and backtracking planners.
///
/// The same configuration and problem always produce the same plan, so the
/// seed is the only source of variation between runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomizedConfig {
    /// Seed of the planner's `ChaCha8` generator.
    pub seed: u64,
    /// Initial probability of picking a vehicle uniformly at random instead
    /// of the nearest one.
    pub exploration: f64,
    /// Fraction of the exploration probability removed at every decay step.
    pub exploration_decay: f64,
    /// Number of trials between decay steps; zero disables decay.
    pub decay_interval: u64,
    /// Stop after this many trials even without cancellation.
    pub max_trials: Option<u64>,
}

impl Default for RandomizedConfig {
    fn default() -> Self {
        Self {
            seed: 2017,
            exploration: 0.8,
            exploration_decay: 0.05,
            decay_interval: 10_000,
            max_trials: None,
        }
    }
}

impl RandomizedConfig {
    /// A copy with a different seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// A copy that stops after `trials` trials.
    #[must_use]
    pub const fn with_max_trials(mut self, trials: u64) -> Self {
        self.max_trials = Some(trials);
        self
    }
}

/// Exploration probability that shrinks as trials accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Exploration {
    probability: f64,
    decay: f64,
    interval: u64,
}

impl Exploration {
    pub(crate) const fn new(config: &RandomizedConfig) -> Self {
        Self {
            probability: config.exploration,
            decay: config.exploration_decay,
            interval: config.decay_interval,
        }
    }

    /// Exploration probability that never decays.
    pub(crate) const fn fixed(probability: f64) -> Self {
        Self {
            probability,
            decay: 0.0,
            interval: 0,
        }
    }

    pub(crate) const fn probability(self) -> f64 {
        self.probability
    }

    /// Record that `trials` trials have finished, decaying on every full
    /// interval.
    #[expect(
        clippy::float_arithmetic,
        reason = "exploration decays geometrically"
    )]
    pub(crate) fn after_trials(&mut self, trials: u64) {
        if self.interval == 0 || trials == 0 || !trials.is_multiple_of(self.interval) {
            return;
        }
        self.probability -= self.probability * self.decay;
        log::debug!(
            "exploration decayed to {:.4} after {trials} trials",
            self.probability
        );
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "tests compare probabilities within a tolerance"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decays_only_on_full_intervals() {
        let mut exploration = Exploration::new(&RandomizedConfig {
            exploration: 0.8,
            exploration_decay: 0.5,
            decay_interval: 3,
            ..RandomizedConfig::default()
        });
        exploration.after_trials(1);
        exploration.after_trials(2);
        assert!((exploration.probability() - 0.8).abs() < 1e-12);
        exploration.after_trials(3);
        assert!((exploration.probability() - 0.4).abs() < 1e-12);
        exploration.after_trials(6);
        assert!((exploration.probability() - 0.2).abs() < 1e-12);
    }

    #[rstest]
    fn fixed_exploration_never_moves() {
        let mut exploration = Exploration::fixed(0.1);
        exploration.after_trials(10_000);
        assert!((exploration.probability() - 0.1).abs() < 1e-12);
    }
}
