//! Generational loop execution.
//!
//! [`Optimizer`] orchestrates a complete run:
//! initialization → evaluation → offspring → evaluation → selection →
//! local search → metrics → repeat.

use super::config::{LocalSearchConfig, OptimizerConfig};
use crate::error::Result;
use crate::eval::{best_index, Evaluator, Individual, ViolationStatistics};
use crate::ga::{initialize_population, place_unassigned, repair_step, Variation};
use crate::indicators::{extract_pareto_front, GenerationMetrics, MetricsTracker};
use crate::models::{Problem, Timetable};
use crate::moo::Algorithm;
use crate::random::{derive_rng, derive_seed, MAIN_STREAM};
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Stream offset separating local-search generators from initialization.
const LOCAL_SEARCH_STREAM: u64 = 1 << 48;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best individual of the whole run by `(hard asc, soft desc)`.
    pub best: Individual,

    /// Non-dominated members of the final population.
    pub front: Vec<Individual>,

    /// Violation summary of the final population.
    pub statistics: ViolationStatistics,

    /// One entry per completed generation.
    pub metrics: Vec<GenerationMetrics>,

    /// Strategy that produced the result.
    pub algorithm: Algorithm,

    /// Master seed actually used.
    pub seed: u64,

    /// Number of completed generations.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run hit its time limit.
    pub timed_out: bool,
}

/// Executes the generational loop.
///
/// # Usage
///
/// ```ignore
/// let problem = Problem::new(activities, groups, rooms, lecturers, calendar)?;
/// let config = OptimizerConfig::default().with_seed(42);
/// let result = Optimizer::run(&problem, &config)?;
/// println!("hard = {}", result.best.hard_score());
/// ```
pub struct Optimizer;

impl Optimizer {
    /// Runs the optimization.
    ///
    /// # Errors
    /// [`TimetableError::InvalidConfig`](crate::TimetableError::InvalidConfig)
    /// when the configuration does not validate.
    pub fn run(problem: &Problem, config: &OptimizerConfig) -> Result<OptimizationResult> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the optimization with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// at the start of the next generation and returns the best solution
    /// found so far.
    pub fn run_with_cancel(
        problem: &Problem,
        config: &OptimizerConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<OptimizationResult> {
        config.validate()?;
        let start = Instant::now();
        let seed = config.seed.unwrap_or_else(rand::random);

        info!(
            "{} start: {} activities, {} slots x {} rooms, population {}, generations {}, seed {}",
            config.algorithm,
            problem.activity_count(),
            problem.slot_count(),
            problem.room_count(),
            config.population_size,
            config.max_generations,
            seed
        );

        let evaluator = Evaluator::new(problem).with_weights(config.weights);
        let variation = Variation::new(problem)
            .with_crossover_rate(config.crossover_rate)
            .with_mutation_rate(config.mutation_rate)
            .with_repair_probability(config.repair_probability);

        // 1. Initialize and evaluate
        let grids = initialize_population(problem, config.population_size, seed, config.parallel);
        let mut population = evaluate_all(&evaluator, grids, config.parallel)?;

        let mut selector = config.algorithm.selector(config.neighborhood_size, seed);
        selector.initialize(&population);

        let mut best = fittest(&population);
        let mut rng = derive_rng(seed, MAIN_STREAM);
        let mut tracker = MetricsTracker::new(config.reference_refresh);
        let mut generations = 0;
        let mut cancelled = false;
        let mut timed_out = false;

        // 2. Generational loop
        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if start.elapsed().as_millis() >= u128::from(limit) {
                    timed_out = true;
                    break;
                }
            }

            let children = selector.offspring(&population, &variation, &mut rng);
            let children = evaluate_all(&evaluator, children, config.parallel)?;
            population = selector.select(population, children);

            if let Some(ls) = &config.local_search {
                if (gen + 1) % ls.interval == 0 {
                    let stream = LOCAL_SEARCH_STREAM + gen as u64;
                    let replaced = local_search(
                        &evaluator,
                        &mut population,
                        ls,
                        derive_seed(seed, stream),
                        config.parallel,
                        &mut rng,
                    )?;
                    if replaced > 0 {
                        selector.refresh(&population);
                    }
                }
            }

            if let Some(candidate) = fittest(&population) {
                let improves = best
                    .as_ref()
                    .map_or(true, |b| candidate.quality_cmp(b) == CmpOrdering::Less);
                if improves {
                    best = Some(candidate);
                }
            }

            if let Some(m) = tracker.record(gen, &population, start.elapsed()) {
                debug!(
                    "gen {}: best hard {:.1}, best soft {:.4}, front {}, hv {:.4}",
                    gen, m.best_hard, m.best_soft, m.front_size, m.hypervolume
                );
            }
            generations = gen + 1;
        }

        let best = match best {
            Some(b) => b,
            None => evaluator.individual(Timetable::for_problem(problem))?,
        };
        if !best.violations.is_feasible() {
            warn!(
                "{} finished with an infeasible timetable: {} teacher, {} group, {} capacity, {} unassigned",
                config.algorithm,
                best.violations.teacher_conflicts,
                best.violations.group_conflicts,
                best.violations.capacity_violations,
                best.violations.unassigned
            );
        }
        info!(
            "{} done: {} generations in {} ms, hard {:.1}, soft {:.4}{}",
            config.algorithm,
            generations,
            start.elapsed().as_millis(),
            best.hard_score(),
            best.soft_score(),
            if cancelled {
                " (cancelled)"
            } else if timed_out {
                " (time limit)"
            } else {
                ""
            }
        );

        let front = extract_pareto_front(&population)
            .into_iter()
            .map(|i| population[i].clone())
            .collect();

        Ok(OptimizationResult {
            best,
            front,
            statistics: ViolationStatistics::from_population(&population),
            metrics: tracker.into_history(),
            algorithm: config.algorithm,
            seed,
            generations,
            cancelled,
            timed_out,
        })
    }
}

/// Evaluates every grid, in parallel when requested.
fn evaluate_all(
    evaluator: &Evaluator<'_>,
    grids: Vec<Timetable>,
    parallel: bool,
) -> Result<Vec<Individual>> {
    if parallel {
        grids.into_par_iter().map(|t| evaluator.individual(t)).collect()
    } else {
        grids.into_iter().map(|t| evaluator.individual(t)).collect()
    }
}

fn fittest(population: &[Individual]) -> Option<Individual> {
    best_index(population).map(|i| population[i].clone())
}

/// Repairs the best `fraction` of the population (smallest objective sum)
/// for a bounded number of steps each, then writes every candidate that
/// got strictly better over a random member.
///
/// Returns the number of replacements. The selector must be refreshed
/// when it is nonzero.
fn local_search(
    evaluator: &Evaluator<'_>,
    population: &mut [Individual],
    ls: &LocalSearchConfig,
    seed: u64,
    parallel: bool,
    rng: &mut StdRng,
) -> Result<usize> {
    let n = population.len();
    if n == 0 {
        return Ok(0);
    }
    let count = ((n as f64 * ls.fraction).ceil() as usize).clamp(1, n);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let sa: f64 = population[a].fitness.iter().sum();
        let sb: f64 = population[b].fitness.iter().sum();
        sa.total_cmp(&sb)
    });
    order.truncate(count);

    let view: &[Individual] = population;
    let improve = |(k, &i): (usize, &usize)| -> Result<Option<Individual>> {
        let original = &view[i];
        let mut r = derive_rng(seed, k as u64);
        let mut grid = original.timetable.clone();
        for _ in 0..ls.iterations {
            if !repair_step(evaluator.problem(), &mut grid, &mut r) {
                break;
            }
        }
        place_unassigned(evaluator.problem(), &mut grid, &mut r);
        let candidate = evaluator.individual(grid)?;
        Ok((candidate.quality_cmp(original) == CmpOrdering::Less).then_some(candidate))
    };

    let improved: Vec<Option<Individual>> = if parallel {
        order.par_iter().enumerate().map(improve).collect::<Result<_>>()?
    } else {
        order.iter().enumerate().map(improve).collect::<Result<_>>()?
    };

    let mut replaced = 0;
    for candidate in improved.into_iter().flatten() {
        let target = rng.random_range(0..n);
        trace!(
            "local search: slot {} <- hard {:.1}, soft {:.4}",
            target,
            candidate.hard_score(),
            candidate.soft_score()
        );
        population[target] = candidate;
        replaced += 1;
    }
    Ok(replaced)
}

// ============================================================================
// Tests
// ============================================================================
