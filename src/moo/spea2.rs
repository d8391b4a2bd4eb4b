//! SPEA2 fitness assignment and archive truncation.
//!
//! # Fitness
//!
//! For a set of objective vectors:
//!
//! - strength `S(i)`: how many members `i` dominates
//! - raw fitness `R(i)`: sum of `S(j)` over every `j` dominating `i`
//!   (`R(i) = 0` exactly for non-dominated members)
//! - density `D(i) = 1 / (σ_k + 2)`, `σ_k` the distance to the k-th nearest
//!   neighbour, `k = round(sqrt(n))`
//! - fitness `F(i) = R(i) + D(i)`, lower is better

use super::{breed_batch, dominates, euclidean, pick_two, Selector};
use crate::eval::Individual;
use crate::ga::Variation;
use crate::models::Timetable;
use rand::rngs::StdRng;

/// SPEA2 fitness components of one member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spea2Fitness {
    /// Number of members this one dominates.
    pub strength: usize,
    /// Sum of the strengths of this member's dominators.
    pub raw: usize,
    /// `1 / (σ_k + 2)`, always in `(0, 0.5]`.
    pub density: f64,
    /// `raw + density`.
    pub fitness: f64,
}

/// Neighbour rank used for density: `round(sqrt(n))` clamped to `[1, n-1]`.
fn kth(n: usize) -> usize {
    ((n as f64).sqrt().round() as usize).clamp(1, n.saturating_sub(1).max(1))
}

/// Density of each of `members` measured among `members` only.
fn densities<P: AsRef<[f64]>>(objectives: &[P], members: &[usize]) -> Vec<f64> {
    let n = members.len();
    let k = kth(n);
    members
        .iter()
        .map(|&i| {
            let mut dists: Vec<f64> = members
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| euclidean(objectives[i].as_ref(), objectives[j].as_ref()))
                .collect();
            dists.sort_by(f64::total_cmp);
            let sigma = dists.get(k - 1).copied().unwrap_or(0.0);
            1.0 / (sigma + 2.0)
        })
        .collect()
}

/// Computes SPEA2 fitness for every member of `objectives`.
pub fn spea2_fitness<P: AsRef<[f64]>>(objectives: &[P]) -> Vec<Spea2Fitness> {
    let n = objectives.len();
    let mut strength = vec![0usize; n];
    let mut dominators: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in 0..n {
            if i != j && dominates(objectives[i].as_ref(), objectives[j].as_ref()) {
                strength[i] += 1;
                dominators[j].push(i);
            }
        }
    }

    let all: Vec<usize> = (0..n).collect();
    let density = densities(objectives, &all);

    (0..n)
        .map(|i| {
            let raw: usize = dominators[i].iter().map(|&j| strength[j]).sum();
            Spea2Fitness {
                strength: strength[i],
                raw,
                density: density[i],
                fitness: raw as f64 + density[i],
            }
        })
        .collect()
}

/// Environmental selection: indices of at most `capacity` members.
///
/// All non-dominated members are kept first. A shortfall is filled from
/// the rest by ascending fitness; an excess is removed one member at a
/// time, always the one with the highest density among those remaining.
pub fn spea2_survivors<P: AsRef<[f64]>>(objectives: &[P], capacity: usize) -> Vec<usize> {
    let fitness = spea2_fitness(objectives);
    let (mut archive, mut rest): (Vec<usize>, Vec<usize>) =
        (0..objectives.len()).partition(|&i| fitness[i].raw == 0);

    if archive.len() < capacity {
        rest.sort_by(|&a, &b| fitness[a].fitness.total_cmp(&fitness[b].fitness));
        let missing = capacity - archive.len();
        archive.extend(rest.into_iter().take(missing));
    }

    while archive.len() > capacity {
        let density = densities(objectives, &archive);
        let mut worst = 0;
        for (pos, &d) in density.iter().enumerate() {
            if d > density[worst] {
                worst = pos;
            }
        }
        archive.remove(worst);
    }
    archive
}

/// SPEA2 selector.
///
/// The driver population is the archive; its capacity is the population
/// size.
#[derive(Debug, Clone, Default)]
pub struct Spea2 {
    fitness: Vec<f64>,
}

impl Spea2 {
    /// Creates a selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitness of each archive member from the last selection.
    pub fn archive_fitness(&self) -> &[f64] {
        &self.fitness
    }

    fn record(&mut self, archive: &[Individual]) {
        self.fitness = spea2_fitness(archive).into_iter().map(|f| f.fitness).collect();
    }

    fn tournament(&self, rng: &mut StdRng, n: usize) -> usize {
        let (a, b) = pick_two(n, rng);
        let f = |i: usize| self.fitness.get(i).copied().unwrap_or(f64::INFINITY);
        if f(b) < f(a) {
            b
        } else {
            a
        }
    }
}

impl Selector for Spea2 {
    fn name(&self) -> &'static str {
        "spea2"
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

        let archive: Vec<Individual> = spea2_survivors(&objs, capacity)
            .into_iter()
            .filter_map(|i| pool[i].take())
            .collect();
        self.record(&archive);
        archive
    }
}
