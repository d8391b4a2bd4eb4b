//! NSGA-II replacement and crowded tournament.

use super::{breed_batch, crowding_distance, non_dominated_sort, pick_two, Selector};
use crate::eval::Individual;
use crate::ga::Variation;
use crate::models::Timetable;
use rand::rngs::StdRng;

/// Survivors of NSGA-II environmental selection.
#[derive(Debug, Clone, Default)]
pub struct Nsga2Survivors {
    /// Indices into the combined pool, in selection order.
    pub indices: Vec<usize>,
    /// Pareto rank of each survivor.
    pub ranks: Vec<usize>,
    /// Crowding distance of each survivor within its front.
    pub crowding: Vec<f64>,
}

/// Picks `capacity` members of `objectives`.
///
/// Whole fronts are taken in rank order while they fit. The first front
/// that would overflow contributes its members with the largest crowding
/// distance. Ties keep front order.
pub fn nsga2_survivors<P: AsRef<[f64]>>(objectives: &[P], capacity: usize) -> Nsga2Survivors {
    let sort = non_dominated_sort(objectives);
    let mut out = Nsga2Survivors::default();

    for (rank, front) in sort.fronts.iter().enumerate() {
        let remaining = capacity.saturating_sub(out.indices.len());
        if remaining == 0 {
            break;
        }

        let front_objs: Vec<&[f64]> = front.iter().map(|&i| objectives[i].as_ref()).collect();
        let dist = crowding_distance(&front_objs);
        let mut members: Vec<(usize, f64)> = front.iter().copied().zip(dist).collect();

        if members.len() > remaining {
            members.sort_by(|a, b| b.1.total_cmp(&a.1));
            members.truncate(remaining);
        }
        for (i, d) in members {
            out.indices.push(i);
            out.ranks.push(rank);
            out.crowding.push(d);
        }
    }
    out
}

/// NSGA-II selector.
///
/// Keeps rank and crowding distance of the current population for the
/// crowded binary tournament.
#[derive(Debug, Clone, Default)]
pub struct Nsga2 {
    ranks: Vec<usize>,
    crowding: Vec<f64>,
}

impl Nsga2 {
    /// Creates a selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Crowded comparison: lower rank wins, then larger crowding distance.
    fn tournament(&self, rng: &mut StdRng, n: usize) -> usize {
        let (a, b) = pick_two(n, rng);
        let key = |i: usize| {
            (
                self.ranks.get(i).copied().unwrap_or(usize::MAX),
                self.crowding.get(i).copied().unwrap_or(0.0),
            )
        };
        let (ra, ca) = key(a);
        let (rb, cb) = key(b);
        if rb < ra || (rb == ra && cb > ca) {
            b
        } else {
            a
        }
    }

    fn record(&mut self, population: &[Individual]) {
        let s = nsga2_survivors(population, population.len());
        self.ranks = vec![0; population.len()];
        self.crowding = vec![0.0; population.len()];
        for (k, &i) in s.indices.iter().enumerate() {
            self.ranks[i] = s.ranks[k];
            self.crowding[i] = s.crowding[k];
        }
    }
}

impl Selector for Nsga2 {
    fn name(&self) -> &'static str {
        "nsga2"
    }

    fn initialize(&mut self, population: &[Individual]) {
        self.record(population);
    }

    fn refresh(&mut self, population: &[Individual]) {
        self.record(population);
    }

    fn offspring(
        &mut self,
        population: &[Individual],
        variation: &Variation<'_>,
        rng: &mut StdRng,
    ) -> Vec<Timetable> {
        let n = population.len();
        breed_batch(population, variation, rng, n, |rng| self.tournament(rng, n))
    }

    fn select(&mut self, population: Vec<Individual>, offspring: Vec<Individual>) -> Vec<Individual> {
        let capacity = population.len();
        let objs: Vec<[f64; 2]> = population.iter().chain(&offspring).map(|i| i.fitness).collect();
        let mut pool: Vec<Option<Individual>> =
            population.into_iter().chain(offspring).map(Some).collect();

        let s = nsga2_survivors(&objs, capacity);
        let next: Vec<Individual> = s.indices.iter().filter_map(|&i| pool[i].take()).collect();
        self.ranks = s.ranks;
        self.crowding = s.crowding;
        next
    }
}
