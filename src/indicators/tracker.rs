//! Per-generation metrics series.

use super::{extract_pareto_front, hypervolume, igd, spacing};
use crate::eval::{best_index, HardViolations, Individual, OBJECTIVES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generations between reference point refreshes.
pub const DEFAULT_REFERENCE_REFRESH: usize = 10;

/// Margin applied to the worst observed value of each objective.
const REFERENCE_MARGIN: f64 = 1.2;

/// Snapshot of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Zero-based generation index.
    pub generation: usize,
    /// Lowest weighted hard score.
    pub best_hard: f64,
    /// Mean weighted hard score.
    pub average_hard: f64,
    /// Highest soft score.
    pub best_soft: f64,
    /// Mean soft score.
    pub average_soft: f64,
    /// Size of the population's non-dominated set.
    pub front_size: usize,
    pub hypervolume: f64,
    pub spacing: f64,
    /// Distance of the current front to the best front accumulated so far.
    pub igd: f64,
    /// Violation breakdown of the best individual.
    pub best_violations: HardViolations,
    /// Wall time since the run started.
    pub elapsed_ms: u64,
}

/// Collects [`GenerationMetrics`] over a run.
///
/// The hypervolume reference point is `1.2 ×` the worst value of each
/// objective in the population. It is set on first use and refreshed
/// every `refresh_interval` generations. IGD is measured against the
/// non-dominated union of every front recorded so far.
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    refresh_interval: usize,
    reference: Option<[f64; OBJECTIVES]>,
    best_front: Vec<[f64; OBJECTIVES]>,
    history: Vec<GenerationMetrics>,
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_REFRESH)
    }
}

impl MetricsTracker {
    /// Creates a tracker refreshing its reference point every
    /// `refresh_interval` generations (at least 1).
    pub fn new(refresh_interval: usize) -> Self {
        Self {
            refresh_interval: refresh_interval.max(1),
            reference: None,
            best_front: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Recorded generations, oldest first.
    pub fn history(&self) -> &[GenerationMetrics] {
        &self.history
    }

    /// Consumes the tracker, returning the recorded series.
    pub fn into_history(self) -> Vec<GenerationMetrics> {
        self.history
    }

    /// Non-dominated union of all fronts recorded so far.
    pub fn best_front(&self) -> &[[f64; OBJECTIVES]] {
        &self.best_front
    }

    /// Current hypervolume reference point.
    pub fn reference_point(&self) -> Option<[f64; OBJECTIVES]> {
        self.reference
    }

    /// Records metrics for `population`. Empty populations are skipped.
    pub fn record(
        &mut self,
        generation: usize,
        population: &[Individual],
        elapsed: Duration,
    ) -> Option<&GenerationMetrics> {
        let best = best_index(population)?;
        let n = population.len() as f64;

        let hard = population.iter().map(Individual::hard_score);
        let soft = population.iter().map(Individual::soft_score);
        let best_hard = hard.clone().fold(f64::INFINITY, f64::min);
        let average_hard = hard.sum::<f64>() / n;
        let best_soft = soft.clone().fold(f64::NEG_INFINITY, f64::max);
        let average_soft = soft.sum::<f64>() / n;

        let objs: Vec<[f64; OBJECTIVES]> = population.iter().map(|i| i.fitness).collect();
        let front: Vec<[f64; OBJECTIVES]> =
            extract_pareto_front(&objs).into_iter().map(|i| objs[i]).collect();
        self.merge_front(&front);

        if self.reference.is_none() || generation % self.refresh_interval == 0 {
            self.reference = Some(reference_point(&objs));
        }
        let reference = self.reference.unwrap_or([0.0; OBJECTIVES]);

        self.history.push(GenerationMetrics {
            generation,
            best_hard,
            average_hard,
            best_soft,
            average_soft,
            front_size: front.len(),
            hypervolume: hypervolume(&front, &reference),
            spacing: spacing(&front),
            igd: igd(&front, &self.best_front),
            best_violations: population[best].violations,
            elapsed_ms: elapsed.as_millis() as u64,
        });
        self.history.last()
    }

    fn merge_front(&mut self, front: &[[f64; OBJECTIVES]]) {
        let mut union = std::mem::take(&mut self.best_front);
        union.extend_from_slice(front);
        let keep = extract_pareto_front(&union);
        let mut merged: Vec<[f64; OBJECTIVES]> = keep.into_iter().map(|i| union[i]).collect();
        merged.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
        merged.dedup();
        self.best_front = merged;
    }
}

/// `1.2 ×` the worst value of each objective. A non-positive worst value
/// gets a unit reference so the feasible region keeps a measurable box.
fn reference_point(objs: &[[f64; OBJECTIVES]]) -> [f64; OBJECTIVES] {
    let mut reference = [0.0; OBJECTIVES];
    for (k, r) in reference.iter_mut().enumerate() {
        let worst = objs.iter().map(|o| o[k]).fold(f64::NEG_INFINITY, f64::max);
        *r = if worst > 0.0 { worst * REFERENCE_MARGIN } else { 1.0 };
    }
    reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{Evaluator, SoftScore};
    use crate::models::{Activity, Group, Lecturer, Problem, Room, SlotCalendar, Timetable};

    fn individual(hard: f64, soft: f64) -> Individual {
        Individual {
            timetable: Timetable::empty(1, 1),
            violations: HardViolations::default(),
            soft: SoftScore {
                total: soft,
                ..SoftScore::default()
            },
            fitness: [hard, 1.0 - soft],
        }
    }

    #[test]
    fn test_record_summaries() {
        let pop = vec![individual(10.0, 0.5), individual(0.0, 0.25), individual(20.0, 0.75)];
        let mut tracker = MetricsTracker::default();
        let m = tracker.record(0, &pop, Duration::from_millis(7)).unwrap().clone();

        assert_eq!(m.best_hard, 0.0);
        assert!((m.average_hard - 10.0).abs() < 1e-12);
        assert_eq!(m.best_soft, 0.75);
        assert!((m.average_soft - 0.5).abs() < 1e-12);
        assert_eq!(m.front_size, 3);
        assert_eq!(m.elapsed_ms, 7);
        assert!(m.hypervolume > 0.0);
        // First generation: the accumulated front is the current front.
        assert_eq!(m.igd, 0.0);
        let r = tracker.reference_point().unwrap();
        assert!((r[0] - 24.0).abs() < 1e-9 && (r[1] - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_empty_population_skipped() {
        let mut tracker = MetricsTracker::default();
        assert!(tracker.record(0, &[], Duration::ZERO).is_none());
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_reference_refresh_interval() {
        let mut tracker = MetricsTracker::new(2);
        tracker.record(1, &[individual(10.0, 0.5), individual(5.0, 0.6)], Duration::ZERO);
        let first = tracker.reference_point().unwrap();
        // Odd generation: reference kept even though values grew.
        tracker.record(3, &[individual(50.0, 0.5), individual(5.0, 0.6)], Duration::ZERO);
        assert_eq!(tracker.reference_point().unwrap(), first);
        tracker.record(4, &[individual(50.0, 0.5), individual(5.0, 0.6)], Duration::ZERO);
        assert!((tracker.reference_point().unwrap()[0] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_front_accumulates() {
        let mut tracker = MetricsTracker::default();
        tracker.record(0, &[individual(10.0, 0.5), individual(20.0, 0.8)], Duration::ZERO);
        tracker.record(1, &[individual(5.0, 0.5), individual(30.0, 0.9)], Duration::ZERO);
        // (10, 0.5) is dominated by (5, 0.5); the rest trade off.
        let front = tracker.best_front();
        assert_eq!(front.len(), 3);
        assert!(!front.iter().any(|p| p[0] == 10.0));
        let last = tracker.history().last().unwrap();
        assert!(last.igd > 0.0);
    }

    #[test]
    fn test_records_real_population() {
        let problem = Problem::new(
            vec![
                Activity::new("A1", "CS101", "T1").with_group("G1"),
                Activity::new("A2", "CS102", "T1").with_group("G1"),
            ],
            vec![Group::new("G1", 20)],
            vec![Room::new("R1", 30)],
            vec![Lecturer::new("T1", "Lee", "CS")],
            SlotCalendar::weekly(1, 3),
        )
        .unwrap();
        let ev = Evaluator::new(&problem);
        let pop: Vec<Individual> = crate::ga::initialize_population(&problem, 4, 3, false)
            .into_iter()
            .map(|t| ev.individual(t).unwrap())
            .collect();
        let mut tracker = MetricsTracker::default();
        let m = tracker.record(0, &pop, Duration::ZERO).unwrap();
        assert!(m.front_size >= 1);
        assert!(m.hypervolume.is_finite() && m.spacing.is_finite() && m.igd.is_finite());
    }
}
