//! Fitness: weighted hard score plus soft score, as two minimized objectives.

use super::{hard_violations, soft_score, HardViolations, SoftScore};
use crate::error::Result;
use crate::models::{Problem, Timetable};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of objectives every individual carries.
pub const OBJECTIVES: usize = 2;

/// Priority weights applied to hard violation counts.
///
/// Defaults steer the search toward feasibility first: an unassigned
/// activity costs more than a clash, a clash more than an oversized class,
/// and an idle room almost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintWeights {
    /// Weight of each vacant cell.
    pub vacant: f64,
    /// Weight of each teacher conflict.
    pub teacher: f64,
    /// Weight of each group conflict.
    pub group: f64,
    /// Weight of each capacity violation.
    pub capacity: f64,
    /// Weight of each unassigned activity.
    pub unassigned: f64,
}

impl Default for ConstraintWeights {
    fn default() -> Self {
        Self {
            vacant: 1.0,
            teacher: 100.0,
            group: 100.0,
            capacity: 50.0,
            unassigned: 200.0,
        }
    }
}

impl ConstraintWeights {
    /// Weighted sum of violation counts.
    pub fn score(&self, v: &HardViolations) -> f64 {
        self.vacant * v.vacant_rooms as f64
            + self.teacher * v.teacher_conflicts as f64
            + self.group * v.group_conflicts as f64
            + self.capacity * v.capacity_violations as f64
            + self.unassigned * v.unassigned as f64
    }
}

/// Full evaluation of one timetable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Raw violation counts.
    pub violations: HardViolations,
    /// Soft score and components.
    pub soft: SoftScore,
    /// Weighted hard score.
    pub hard_score: f64,
}

impl Evaluation {
    /// Minimized objective vector `(weighted hard, 1 - soft)`.
    pub fn objectives(&self) -> [f64; OBJECTIVES] {
        [self.hard_score, 1.0 - self.soft.total]
    }
}

/// Evaluates timetables of one problem.
///
/// Evaluation is a pure function of the problem and the grid, so an
/// `Evaluator` can be shared across rayon workers.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    problem: &'a Problem,
    weights: ConstraintWeights,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator with default weights.
    pub fn new(problem: &'a Problem) -> Self {
        Self {
            problem,
            weights: ConstraintWeights::default(),
        }
    }

    /// Overrides the constraint weights.
    pub fn with_weights(mut self, weights: ConstraintWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The problem being evaluated.
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// Evaluates a timetable.
    ///
    /// # Errors
    /// Contract errors from [`Timetable::check`].
    pub fn evaluate(&self, timetable: &Timetable) -> Result<Evaluation> {
        let violations = hard_violations(self.problem, timetable)?;
        let soft = soft_score(self.problem, timetable)?;
        Ok(Evaluation {
            violations,
            soft,
            hard_score: self.weights.score(&violations),
        })
    }

    /// Evaluates a timetable and wraps it into an [`Individual`].
    ///
    /// # Errors
    /// Contract errors from [`Timetable::check`].
    pub fn individual(&self, timetable: Timetable) -> Result<Individual> {
        let eval = self.evaluate(&timetable)?;
        Ok(Individual::new(timetable, eval))
    }
}

/// An evaluated timetable.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    /// The grid.
    pub timetable: Timetable,
    /// Raw violation counts.
    pub violations: HardViolations,
    /// Soft score and components.
    pub soft: SoftScore,
    /// Minimized objectives `(weighted hard, 1 - soft)`.
    pub fitness: [f64; OBJECTIVES],
}

impl Individual {
    /// Combines a timetable with its evaluation.
    pub fn new(timetable: Timetable, eval: Evaluation) -> Self {
        Self {
            timetable,
            violations: eval.violations,
            soft: eval.soft,
            fitness: eval.objectives(),
        }
    }

    /// Weighted hard score (first objective).
    pub fn hard_score(&self) -> f64 {
        self.fitness[0]
    }

    /// Soft score (higher is better).
    pub fn soft_score(&self) -> f64 {
        self.soft.total
    }

    /// Lexicographic quality order: lower hard score first, then higher
    /// soft score. `Ordering::Less` means `self` is better.
    pub fn quality_cmp(&self, other: &Self) -> Ordering {
        self.hard_score()
            .total_cmp(&other.hard_score())
            .then_with(|| other.soft_score().total_cmp(&self.soft_score()))
    }
}

impl AsRef<[f64]> for Individual {
    fn as_ref(&self) -> &[f64] {
        &self.fitness
    }
}

/// Index of the best individual by [`Individual::quality_cmp`].
pub fn best_index(population: &[Individual]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.quality_cmp(b))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Group, Lecturer, Room, SlotCalendar};

    fn problem() -> Problem {
        Problem::new(
            vec![
                Activity::new("A1", "CS101", "T1").with_group("G1"),
                Activity::new("A2", "CS102", "T1").with_group("G1"),
            ],
            vec![Group::new("G1", 40)],
            vec![Room::new("R1", 40)],
            vec![Lecturer::new("T1", "Ada", "CS")],
            SlotCalendar::weekly(1, 2),
        )
        .unwrap()
    }

    #[test]
    fn test_weights_score() {
        let v = HardViolations {
            vacant_rooms: 3,
            teacher_conflicts: 1,
            group_conflicts: 2,
            capacity_violations: 1,
            unassigned: 1,
        };
        assert_eq!(ConstraintWeights::default().score(&v), 3.0 + 100.0 + 200.0 + 50.0 + 200.0);
    }

    #[test]
    fn test_weights_serde_defaults() {
        let w: ConstraintWeights = serde_json::from_str(r#"{"teacher": 10.0}"#).unwrap();
        assert_eq!(w.teacher, 10.0);
        assert_eq!(w.unassigned, 200.0);
    }

    #[test]
    fn test_evaluate_objectives() {
        let p = problem();
        let ev = Evaluator::new(&p);
        let mut t = Timetable::for_problem(&p);
        t.set(0, 0, Some(0));
        t.set(1, 0, Some(1));
        let e = ev.evaluate(&t).unwrap();
        assert!(e.violations.is_feasible());
        assert_eq!(e.hard_score, 0.0);
        let [h, s] = e.objectives();
        assert_eq!(h, 0.0);
        assert!((s - (1.0 - e.soft.total)).abs() < 1e-12);
    }

    #[test]
    fn test_quality_order() {
        let p = problem();
        let ev = Evaluator::new(&p);

        let mut good = Timetable::for_problem(&p);
        good.set(0, 0, Some(0));
        good.set(1, 0, Some(1));
        let mut bad = Timetable::for_problem(&p);
        bad.set(0, 0, Some(0));

        let pop = vec![ev.individual(bad).unwrap(), ev.individual(good).unwrap()];
        assert_eq!(pop[1].quality_cmp(&pop[0]), Ordering::Less);
        assert_eq!(best_index(&pop), Some(1));
        assert_eq!(best_index(&[]), None);
    }
}
