//! Multi-objective selection strategies.
//!
//! Three interchangeable replacement policies over the same timetable
//! representation, evaluator and operators:
//!
//! - [`Nsga2`]: non-dominated sorting + crowding distance
//! - [`Moead`]: decomposition into Tchebycheff subproblems
//! - [`Spea2`]: strength/density fitness with an external archive
//!
//! Each implements [`Selector`]. The driver calls [`Selector::offspring`]
//! to breed a batch, evaluates it, then hands parents and evaluated
//! children to [`Selector::select`] to form the next generation.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"
//! - Zhang & Li (2007), "MOEA/D: A Multiobjective Evolutionary Algorithm
//!   Based on Decomposition"
//! - Zitzler, Laumanns & Thiele (2001), "SPEA2: Improving the Strength
//!   Pareto Evolutionary Algorithm"

mod dominance;
mod moead;
mod nsga2;
mod spea2;

pub use dominance::{
    crowding_distance, dominance_cmp, dominates, euclidean, non_dominated_sort, Dominance,
    NondominatedSortResult,
};
pub use moead::{tchebycheff, Moead};
pub use nsga2::{nsga2_survivors, Nsga2, Nsga2Survivors};
pub use spea2::{spea2_fitness, spea2_survivors, Spea2, Spea2Fitness};

use crate::error::TimetableError;
use crate::eval::Individual;
use crate::ga::Variation;
use crate::models::Timetable;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A replacement policy driven by the optimizer loop.
pub trait Selector: Send {
    /// Short algorithm name (`"nsga2"`, `"moead"`, `"spea2"`).
    fn name(&self) -> &'static str;

    /// Prepares internal state from the evaluated initial population.
    fn initialize(&mut self, population: &[Individual]);

    /// Resynchronizes internal state after members were replaced outside
    /// [`select`](Selector::select), e.g. by local search.
    fn refresh(&mut self, population: &[Individual]);

    /// Breeds the next batch of unevaluated children.
    fn offspring(
        &mut self,
        population: &[Individual],
        variation: &Variation<'_>,
        rng: &mut StdRng,
    ) -> Vec<Timetable>;

    /// Chooses the next generation from parents and evaluated children.
    ///
    /// `offspring` must be the evaluated batch returned by the last call to
    /// [`offspring`](Selector::offspring), in the same order.
    fn select(&mut self, population: Vec<Individual>, offspring: Vec<Individual>) -> Vec<Individual>;
}

/// Available selection strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// NSGA-II.
    #[default]
    Nsga2,
    /// MOEA/D with Tchebycheff scalarization.
    Moead,
    /// SPEA2.
    Spea2,
}

impl Algorithm {
    /// All algorithms, in display order.
    pub const ALL: [Algorithm; 3] = [Algorithm::Nsga2, Algorithm::Moead, Algorithm::Spea2];

    /// Lowercase algorithm name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Nsga2 => "nsga2",
            Algorithm::Moead => "moead",
            Algorithm::Spea2 => "spea2",
        }
    }

    /// Builds a boxed selector.
    ///
    /// `neighborhood_size` is only used by MOEA/D; `seed` drives its
    /// weight vector sampling.
    pub fn selector(self, neighborhood_size: usize, seed: u64) -> Box<dyn Selector> {
        match self {
            Algorithm::Nsga2 => Box::new(Nsga2::new()),
            Algorithm::Moead => Box::new(Moead::new(neighborhood_size, seed)),
            Algorithm::Spea2 => Box::new(Spea2::new()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(*c, '-' | '_' | '/' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "nsga2" | "nsgaii" => Ok(Algorithm::Nsga2),
            "moead" => Ok(Algorithm::Moead),
            "spea2" => Ok(Algorithm::Spea2),
            _ => Err(TimetableError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Two distinct uniform indices in `0..n` (equal only when `n < 2`).
pub(crate) fn pick_two<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    if n < 2 {
        return (0, 0);
    }
    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

/// Breeds until `count` children exist, choosing parents with `pick`.
pub(crate) fn breed_batch<F>(
    population: &[Individual],
    variation: &Variation<'_>,
    rng: &mut StdRng,
    count: usize,
    mut pick: F,
) -> Vec<Timetable>
where
    F: FnMut(&mut StdRng) -> usize,
{
    let mut children = Vec::with_capacity(count + 1);
    while children.len() < count {
        let p1 = pick(rng);
        let p2 = pick(rng);
        let (c1, c2) = variation.breed(&population[p1].timetable, &population[p2].timetable, rng);
        children.push(c1);
        children.push(c2);
    }
    children.truncate(count);
    children
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Small fixtures shared by the selector tests.

    use crate::eval::{Evaluator, Individual};
    use crate::ga::initialize_population;
    use crate::models::{Activity, Group, Lecturer, Problem, Room, SlotCalendar};

    pub fn problem() -> Problem {
        let acts = (0..6)
            .map(|i| {
                Activity::new(format!("A{i}"), format!("CS10{i}"), format!("T{}", i % 3))
                    .with_group(format!("G{}", i % 2))
            })
            .collect();
        Problem::new(
            acts,
            vec![Group::new("G0", 30), Group::new("G1", 25)],
            vec![Room::new("R1", 40), Room::new("R2", 20)],
            (0..3)
                .map(|i| Lecturer::new(format!("T{i}"), format!("L{i}"), "CS"))
                .collect(),
            SlotCalendar::weekly(1, 4),
        )
        .unwrap()
    }

    pub fn population(problem: &Problem, n: usize, seed: u64) -> Vec<Individual> {
        let ev = Evaluator::new(problem);
        initialize_population(problem, n, seed, false)
            .into_iter()
            .map(|t| ev.individual(t).unwrap())
            .collect()
    }

    pub fn evaluate(problem: &Problem, grids: Vec<crate::models::Timetable>) -> Vec<Individual> {
        let ev = Evaluator::new(problem);
        grids.into_iter().map(|t| ev.individual(t).unwrap()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("NSGA-II".parse::<Algorithm>().unwrap(), Algorithm::Nsga2);
        assert_eq!("nsga2".parse::<Algorithm>().unwrap(), Algorithm::Nsga2);
        assert_eq!("MOEA/D".parse::<Algorithm>().unwrap(), Algorithm::Moead);
        assert_eq!(" spea2 ".parse::<Algorithm>().unwrap(), Algorithm::Spea2);
        assert!(matches!(
            "sarsa".parse::<Algorithm>(),
            Err(TimetableError::UnknownAlgorithm(name)) if name == "sarsa"
        ));
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.to_string().parse::<Algorithm>().unwrap(), alg);
            assert_eq!(alg.selector(20, 1).name(), alg.name());
        }
        let json = serde_json::to_string(&Algorithm::Spea2).unwrap();
        assert_eq!(json, "\"spea2\"");
    }

    #[test]
    fn test_pick_two_distinct() {
        let mut rng = create_rng(4);
        for _ in 0..100 {
            let (a, b) = pick_two(3, &mut rng);
            assert_ne!(a, b);
            assert!(a < 3 && b < 3);
        }
        assert_eq!(pick_two(1, &mut rng), (0, 0));
    }
}
