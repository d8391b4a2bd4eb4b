//! Serializable request/response surface.

use super::{OptimizationResult, Optimizer, OptimizerConfig};
use crate::error::Result;
use crate::eval::{HardViolations, Individual, SoftScore};
use crate::indicators::GenerationMetrics;
use crate::models::{Problem, TimetableDocument};
use crate::moo::Algorithm;
use serde::{Deserialize, Serialize};

/// Run parameters as supplied by a host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunRequest {
    /// `"nsga2"`, `"moead"` or `"spea2"` (case and separators ignored).
    pub algorithm: String,
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Master seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for RunRequest {
    fn default() -> Self {
        let config = OptimizerConfig::default();
        Self {
            algorithm: config.algorithm.name().to_string(),
            population_size: config.population_size,
            generations: config.max_generations,
            crossover_rate: config.crossover_rate,
            mutation_rate: config.mutation_rate,
            seed: None,
        }
    }
}

impl RunRequest {
    /// Builds and validates the optimizer configuration. Rates are not
    /// clamped: out-of-range values are rejected.
    pub fn to_config(&self) -> Result<OptimizerConfig> {
        let algorithm: Algorithm = self.algorithm.parse()?;
        let config = OptimizerConfig {
            algorithm,
            population_size: self.population_size,
            max_generations: self.generations,
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            seed: self.seed,
            ..OptimizerConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

/// Scores of the returned timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Weighted hard score (lower is better).
    pub hard_score: f64,
    /// Soft score in `[0, 1]` (higher is better).
    pub soft_score: f64,
    pub violations: HardViolations,
    pub soft: SoftScore,
}

impl From<&Individual> for EvaluationSummary {
    fn from(ind: &Individual) -> Self {
        Self {
            hard_score: ind.hard_score(),
            soft_score: ind.soft_score(),
            violations: ind.violations,
            soft: ind.soft,
        }
    }
}

/// Run outcome in a serializable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub algorithm: Algorithm,
    /// `slot -> room -> activity id | null`.
    pub best_timetable: TimetableDocument,
    pub best: EvaluationSummary,
    /// One entry per completed generation.
    pub metrics: Vec<GenerationMetrics>,
    pub seed: u64,
    pub generations: usize,
    pub cancelled: bool,
}

impl RunOutput {
    /// Converts a finished run against the problem it solved.
    pub fn from_result(problem: &Problem, result: OptimizationResult) -> Result<Self> {
        Ok(Self {
            algorithm: result.algorithm,
            best_timetable: result.best.timetable.to_document(problem)?,
            best: EvaluationSummary::from(&result.best),
            metrics: result.metrics,
            seed: result.seed,
            generations: result.generations,
            cancelled: result.cancelled,
        })
    }
}

/// Runs the requested strategy and returns the best timetable with its
/// metrics series.
///
/// Infeasible instances are not errors: the output carries nonzero
/// violation counts.
pub fn optimize(problem: &Problem, request: &RunRequest) -> Result<RunOutput> {
    let config = request.to_config()?;
    let result = Optimizer::run(problem, &config)?;
    RunOutput::from_result(problem, result)
}
