use crate::error::Error;
use crate::{ensure, Result};

/// Chance that a node drawn at level `k` also reaches level `k + 1`.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Construction-time knobs for an `OrderedSkipSet`.
///
/// The level cap itself is the set's `MAX_LEVEL` const parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipSetConfig {
    pub probability: f64,
    /// Seed for the level generator. `None` seeds from fastrand's entropy source.
    pub seed: Option<u64>,
}

impl Default for SkipSetConfig {
    fn default() -> Self {
        Self {
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}

impl SkipSetConfig {
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self, max_level: usize) -> Result<()> {
        ensure!(
            max_level > 0,
            Error::InvalidConfig("max level must be at least 1".to_string())
        );
        ensure!(
            self.probability > 0.0 && self.probability < 1.0,
            Error::InvalidConfig(format!(
                "probability must lie in (0, 1), got {}",
                self.probability
            ))
        );
        Ok(())
    }

    pub(crate) fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SkipSetConfig::default().validate(20).is_ok());
    }

    #[test]
    fn test_rejects_zero_levels() {
        assert!(matches!(
            SkipSetConfig::default().validate(0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_bad_probability() {
        for p in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let config = SkipSetConfig::default().with_probability(p);
            assert!(config.validate(20).is_err(), "p = {p} accepted");
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = SkipSetConfig::default().with_seed(42);
        let mut a = config.rng();
        let mut b = config.rng();
        for _ in 0..100 {
            assert_eq!(a.u64(..), b.u64(..));
        }
    }
}
