//! Optimizer configuration.
//!
//! [`OptimizerConfig`] holds every parameter of the generational loop:
//! strategy, population, operator rates, local search, termination and
//! parallelism.

use crate::error::{Result, TimetableError};
use crate::eval::ConstraintWeights;
use crate::indicators::DEFAULT_REFERENCE_REFRESH;
use crate::moo::Algorithm;
use serde::{Deserialize, Serialize};

/// Bounded local search applied to the best part of the population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Run every `interval` generations.
    pub interval: usize,
    /// Repair steps attempted per candidate.
    pub iterations: usize,
    /// Fraction of the population (best first) used as candidates.
    pub fraction: f64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            interval: 20,
            iterations: 50,
            fraction: 0.1,
        }
    }
}

/// Configuration for an optimization run.
///
/// # Defaults
///
/// ```
/// use u_timetable::optimizer::OptimizerConfig;
/// use u_timetable::moo::Algorithm;
///
/// let config = OptimizerConfig::default();
/// assert_eq!(config.algorithm, Algorithm::Nsga2);
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::optimizer::OptimizerConfig;
/// use u_timetable::moo::Algorithm;
///
/// let config = OptimizerConfig::default()
///     .with_algorithm(Algorithm::Spea2)
///     .with_population_size(80)
///     .with_mutation_rate(0.3)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Selection strategy.
    pub algorithm: Algorithm,

    /// Number of individuals (archive capacity for SPEA2).
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Probability of crossing a parent pair (0.0–1.0).
    ///
    /// When crossover is not applied, children are copies of the parents.
    pub crossover_rate: f64,

    /// Probability of mutating each child (0.0–1.0).
    pub mutation_rate: f64,

    /// Share of mutations that are repair-guided rather than random swaps.
    pub repair_probability: f64,

    /// MOEA/D neighbourhood size `T`, clamped to the population size.
    pub neighborhood_size: usize,

    /// Priority weights of the hard score.
    pub weights: ConstraintWeights,

    /// Periodic local search. `None` disables it.
    pub local_search: Option<LocalSearchConfig>,

    /// Generations between hypervolume reference point refreshes.
    pub reference_refresh: usize,

    /// Whether to initialize and evaluate individuals in parallel using rayon.
    pub parallel: bool,

    /// Master seed. `None` draws one at random; the drawn seed is reported
    /// in the result.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so a run may exceed it by
    /// one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            population_size: 50,
            max_generations: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            repair_probability: 0.8,
            neighborhood_size: 20,
            weights: ConstraintWeights::default(),
            local_search: Some(LocalSearchConfig::default()),
            reference_refresh: DEFAULT_REFERENCE_REFRESH,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl OptimizerConfig {
    /// Sets the selection strategy.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the repair share of mutations.
    pub fn with_repair_probability(mut self, p: f64) -> Self {
        self.repair_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the MOEA/D neighbourhood size.
    pub fn with_neighborhood_size(mut self, t: usize) -> Self {
        self.neighborhood_size = t;
        self
    }

    /// Sets the hard constraint weights.
    pub fn with_weights(mut self, weights: ConstraintWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets or disables local search.
    pub fn with_local_search(mut self, local_search: Option<LocalSearchConfig>) -> Self {
        self.local_search = local_search;
        self
    }

    /// Sets the reference point refresh interval.
    pub fn with_reference_refresh(mut self, generations: usize) -> Self {
        self.reference_refresh = generations;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the master seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for quick feasibility checks.
    ///
    /// - Population: 30, Generations: 50, Time limit: 10s
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 50,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Preset balancing quality and run time.
    ///
    /// - Population: 50, Generations: 100, Time limit: 60s
    pub fn balanced() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Preset for final schedules.
    ///
    /// - Population: 100, Generations: 300, Time limit: 300s
    /// - Local search every 10 generations
    pub fn quality() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            local_search: Some(LocalSearchConfig {
                interval: 10,
                ..LocalSearchConfig::default()
            }),
            time_limit_ms: Some(300_000),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(TimetableError::InvalidConfig(msg.into()));
        if self.population_size < 2 {
            return invalid("population_size must be at least 2");
        }
        if self.max_generations == 0 {
            return invalid("max_generations must be at least 1");
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("repair_probability", self.repair_probability),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(TimetableError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        if let Some(ls) = &self.local_search {
            if ls.interval == 0 {
                return invalid("local_search.interval must be at least 1");
            }
            if !(ls.fraction > 0.0 && ls.fraction <= 1.0) {
                return invalid("local_search.fraction must be within (0, 1]");
            }
        }
        if self.reference_refresh == 0 {
            return invalid("reference_refresh must be at least 1");
        }
        if self.time_limit_ms == Some(0) {
            return invalid("time_limit_ms must be positive or None");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OptimizerConfig::default();
        assert_eq!(config.algorithm, Algorithm::Nsga2);
        assert_eq!(config.population_size, 50);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.2).abs() < 1e-10);
        assert!((config.repair_probability - 0.8).abs() < 1e-10);
        assert_eq!(config.neighborhood_size, 20);
        assert_eq!(config.local_search, Some(LocalSearchConfig::default()));
        assert_eq!(config.reference_refresh, 10);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = OptimizerConfig::default()
            .with_algorithm(Algorithm::Moead)
            .with_population_size(40)
            .with_max_generations(200)
            .with_crossover_rate(0.9)
            .with_neighborhood_size(8)
            .with_local_search(None)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.algorithm, Algorithm::Moead);
        assert_eq!(config.population_size, 40);
        assert_eq!(config.max_generations, 200);
        assert_eq!(config.neighborhood_size, 8);
        assert!(config.local_search.is_none());
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_clamp_rates() {
        let config = OptimizerConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0)
            .with_repair_probability(1.5);
        assert_eq!(config.crossover_rate, 0.0);
        assert_eq!(config.mutation_rate, 1.0);
        assert_eq!(config.repair_probability, 1.0);
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            OptimizerConfig::default().with_population_size(1),
            OptimizerConfig::default().with_max_generations(0),
            OptimizerConfig::default().with_time_limit_ms(0),
            OptimizerConfig::default().with_reference_refresh(0),
            OptimizerConfig {
                mutation_rate: 1.5,
                ..OptimizerConfig::default()
            },
            OptimizerConfig::default().with_local_search(Some(LocalSearchConfig {
                interval: 0,
                ..LocalSearchConfig::default()
            })),
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(TimetableError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_presets_valid() {
        for config in [
            OptimizerConfig::fast(),
            OptimizerConfig::balanced(),
            OptimizerConfig::quality(),
        ] {
            assert!(config.validate().is_ok());
        }
        assert!(OptimizerConfig::fast().population_size < OptimizerConfig::quality().population_size);
    }

    #[test]
    fn test_serde_partial_document() {
        let config: OptimizerConfig =
            serde_json::from_str(r#"{"algorithm":"spea2","population_size":24}"#).unwrap();
        assert_eq!(config.algorithm, Algorithm::Spea2);
        assert_eq!(config.population_size, 24);
        assert_eq!(config.max_generations, 100);
        assert!(config.validate().is_ok());
    }
}
