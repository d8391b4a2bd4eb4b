//! MOEA/D: decomposition into Tchebycheff subproblems.
//!
//! Subproblem `i` owns population slot `i` and a weight vector drawn from a
//! flat Dirichlet distribution. Each generation breeds two children per
//! subproblem from parents in its neighbourhood. Children are then
//! processed in subproblem order: the ideal point absorbs both children of
//! a pair, and every neighbour whose Tchebycheff value a child strictly
//! improves is replaced by that child.

use super::{euclidean, pick_two, Selector};
use crate::eval::{Individual, OBJECTIVES};
use crate::ga::Variation;
use crate::models::Timetable;
use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Dirichlet, Distribution};

/// Tchebycheff scalarization `max_i w_i · |f_i − z_i|`.
pub fn tchebycheff(fitness: &[f64], weights: &[f64], ideal: &[f64]) -> f64 {
    fitness
        .iter()
        .zip(weights)
        .zip(ideal)
        .map(|((f, w), z)| w * (f - z).abs())
        .fold(0.0, f64::max)
}

/// Samples `n` weight vectors from Dirichlet(1, …, 1).
fn dirichlet_weights<R: Rng>(n: usize, rng: &mut R) -> Vec<Vec<f64>> {
    match Dirichlet::new([1.0; OBJECTIVES]) {
        Ok(flat) => (0..n).map(|_| flat.sample(&mut *rng).to_vec()).collect(),
        Err(_) => vec![vec![1.0 / OBJECTIVES as f64; OBJECTIVES]; n],
    }
}

/// Indices of the `t` weight vectors closest to each one, itself first.
fn neighborhoods(weights: &[Vec<f64>], t: usize) -> Vec<Vec<usize>> {
    (0..weights.len())
        .map(|i| {
            let mut order: Vec<(f64, usize)> = (0..weights.len())
                .map(|j| (euclidean(&weights[i], &weights[j]), j))
                .collect();
            order.sort_by(|a, b| {
                a.0.total_cmp(&b.0)
                    .then_with(|| (a.1 != i).cmp(&(b.1 != i)))
                    .then_with(|| a.1.cmp(&b.1))
            });
            order.into_iter().take(t).map(|(_, j)| j).collect()
        })
        .collect()
}

/// MOEA/D selector.
#[derive(Debug, Clone)]
pub struct Moead {
    neighborhood_size: usize,
    seed: u64,
    weights: Vec<Vec<f64>>,
    neighbors: Vec<Vec<usize>>,
    ideal: Vec<f64>,
    /// Subproblem that bred each child pair of the pending batch.
    owners: Vec<usize>,
}

impl Moead {
    /// Creates a selector with neighbourhood size `t`.
    ///
    /// Weight vectors are sampled from `seed` when the initial population
    /// is known. `t` is clamped to `[2, N]`.
    pub fn new(neighborhood_size: usize, seed: u64) -> Self {
        Self {
            neighborhood_size,
            seed,
            weights: Vec::new(),
            neighbors: Vec::new(),
            ideal: vec![f64::INFINITY; OBJECTIVES],
            owners: Vec::new(),
        }
    }

    /// Component-wise minimum of every fitness seen so far.
    pub fn ideal_point(&self) -> &[f64] {
        &self.ideal
    }

    /// Weight vector of each subproblem.
    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// Neighbourhood of each subproblem.
    pub fn neighborhoods(&self) -> &[Vec<usize>] {
        &self.neighbors
    }

    fn absorb(&mut self, fitness: &[f64]) {
        for (z, &f) in self.ideal.iter_mut().zip(fitness) {
            if f < *z {
                *z = f;
            }
        }
    }
}

impl Selector for Moead {
    fn name(&self) -> &'static str {
        "moead"
    }

    fn initialize(&mut self, population: &[Individual]) {
        let n = population.len();
        let t = self.neighborhood_size.clamp(2, n.max(2)).min(n);
        let mut rng = create_rng(self.seed);
        self.weights = dirichlet_weights(n, &mut rng);
        self.neighbors = neighborhoods(&self.weights, t);
        self.ideal = vec![f64::INFINITY; OBJECTIVES];
        for ind in population {
            self.absorb(&ind.fitness);
        }
        self.owners.clear();
    }

    fn refresh(&mut self, population: &[Individual]) {
        for ind in population {
            self.absorb(&ind.fitness);
        }
    }

    fn offspring(
        &mut self,
        population: &[Individual],
        variation: &Variation<'_>,
        rng: &mut StdRng,
    ) -> Vec<Timetable> {
        self.owners.clear();
        let mut children = Vec::with_capacity(2 * population.len());
        for (i, hood) in self.neighbors.iter().enumerate() {
            let (a, b) = pick_two(hood.len(), rng);
            let (c1, c2) = variation.breed(
                &population[hood[a]].timetable,
                &population[hood[b]].timetable,
                rng,
            );
            children.push(c1);
            children.push(c2);
            self.owners.push(i);
        }
        children
    }

    fn select(&mut self, mut population: Vec<Individual>, offspring: Vec<Individual>) -> Vec<Individual> {
        let owners = std::mem::take(&mut self.owners);
        let mut children = offspring.into_iter();

        for owner in owners {
            let pair: Vec<Individual> = children.by_ref().take(2).collect();
            for child in &pair {
                self.absorb(&child.fitness);
            }
            for child in pair {
                for &j in &self.neighbors[owner] {
                    let w = &self.weights[j];
                    let current = tchebycheff(&population[j].fitness, w, &self.ideal);
                    let candidate = tchebycheff(&child.fitness, w, &self.ideal);
                    if candidate < current {
                        population[j] = child.clone();
                    }
                }
            }
        }
        population
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{evaluate, population, problem};
    use super::*;

    #[test]
    fn test_tchebycheff() {
        let g = tchebycheff(&[3.0, 1.0], &[0.5, 0.5], &[1.0, 0.0]);
        assert!((g - 1.0).abs() < 1e-12);
        assert_eq!(tchebycheff(&[1.0, 0.0], &[0.3, 0.7], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_weights_on_simplex() {
        let w = dirichlet_weights(50, &mut create_rng(1));
        assert_eq!(w.len(), 50);
        for v in &w {
            assert!(v.iter().all(|&x| (0.0..=1.0).contains(&x)));
            assert!((v.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_neighborhoods_include_self() {
        let w = dirichlet_weights(12, &mut create_rng(2));
        let hoods = neighborhoods(&w, 4);
        for (i, h) in hoods.iter().enumerate() {
            assert_eq!(h.len(), 4);
            assert_eq!(h[0], i);
        }
    }

    #[test]
    fn test_neighborhood_clamped_to_population() {
        let p = problem();
        let pop = population(&p, 5, 1);
        let mut sel = Moead::new(20, 7);
        sel.initialize(&pop);
        assert!(sel.neighborhoods().iter().all(|h| h.len() == 5));
    }

    #[test]
    fn test_ideal_point_non_increasing() {
        let p = problem();
        let mut pop = population(&p, 8, 4);
        let mut sel = Moead::new(4, 9);
        sel.initialize(&pop);
        let variation = Variation::new(&p).with_mutation_rate(0.5);
        let mut rng = create_rng(5);

        let mut previous = sel.ideal_point().to_vec();
        for _ in 0..10 {
            let kids = sel.offspring(&pop, &variation, &mut rng);
            assert_eq!(kids.len(), 16);
            let kids = evaluate(&p, kids);
            pop = sel.select(pop, kids);
            assert_eq!(pop.len(), 8);

            let ideal = sel.ideal_point().to_vec();
            for (now, before) in ideal.iter().zip(&previous) {
                assert!(now <= before);
            }
            for ind in &pop {
                assert!(ind.fitness[0] >= ideal[0] && ind.fitness[1] >= ideal[1]);
            }
            previous = ideal;
        }
    }

    #[test]
    fn test_dominating_child_takes_whole_neighborhood() {
        let p = problem();
        let pop = population(&p, 4, 2);
        let mut sel = Moead::new(4, 3);
        sel.initialize(&pop);

        // A child that is the best in every objective replaces every
        // neighbour with a positive scalarized value.
        let mut best = pop[0].clone();
        best.fitness = [-1.0, -1.0];
        sel.owners = vec![0];
        let next = sel.select(pop.clone(), vec![best.clone(), best.clone()]);
        assert_eq!(sel.ideal_point(), &[-1.0, -1.0]);
        assert!(next.iter().all(|ind| ind.fitness == [-1.0, -1.0]));
    }

    #[test]
    fn test_refresh_absorbs_outside_improvements() {
        let p = problem();
        let mut pop = population(&p, 6, 5);
        let mut sel = Moead::new(3, 1);
        sel.initialize(&pop);

        let better = [sel.ideal_point()[0] - 10.0, sel.ideal_point()[1] / 2.0];
        pop[4].fitness = better;
        sel.refresh(&pop);
        assert_eq!(sel.ideal_point(), &better);

        // At the ideal point the member scalarizes to zero in every
        // subproblem, so no child can displace it.
        for (j, w) in sel.weights().iter().enumerate() {
            let g = tchebycheff(&pop[4].fitness, w, sel.ideal_point());
            assert_eq!(g, 0.0, "subproblem {j}");
        }
    }
}
