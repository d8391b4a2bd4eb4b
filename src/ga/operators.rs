//! Timetable crossover and mutation operators.
//!
//! # Crossover
//!
//! - [`crossover`]: one-point crossover over the slot order; whole slot
//!   rows swap, so every room of a slot travels together
//!
//! # Mutation
//!
//! - [`repair_mutation`]: relocate or swap a cell involved in a conflict,
//!   then re-place activities that lost every occurrence
//! - [`random_mutation`]: swap two uniformly chosen cells
//! - [`mutate`]: picks one of the two with a fixed repair probability
//!
//! All operators work on owned grids of fixed size, so no cell can go
//! missing.

use super::init::{place_occurrence, placement_order, slot_is_free, suitable_rooms};
use crate::eval::violation_sites;
use crate::models::{Problem, Timetable};
use rand::seq::SliceRandom;
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// One-point slot crossover.
///
/// Picks a cut in `1..slots`; the first child takes `a`'s rows before the
/// cut and `b`'s rows from the cut on, the second child the complement.
/// With a single slot both children are plain copies.
///
/// # Panics
/// Panics if the parents have different dimensions.
pub fn crossover<R: Rng>(a: &Timetable, b: &Timetable, rng: &mut R) -> (Timetable, Timetable) {
    assert_eq!(
        (a.slot_count(), a.room_count()),
        (b.slot_count(), b.room_count()),
        "parents must have equal dimensions"
    );

    let slots = a.slot_count();
    let mut c1 = a.clone();
    let mut c2 = b.clone();
    if slots < 2 {
        return (c1, c2);
    }

    let cut = rng.random_range(1..slots);
    for slot in cut..slots {
        c1.row_mut(slot).copy_from_slice(b.row(slot));
        c2.row_mut(slot).copy_from_slice(a.row(slot));
    }
    (c1, c2)
}

// ============================================================================
// Mutation
// ============================================================================

/// Swaps the contents of two uniformly chosen cells.
///
/// The two cells may coincide, in which case nothing changes.
pub fn random_mutation<R: Rng>(timetable: &mut Timetable, rng: &mut R) {
    let n = timetable.cell_count();
    if n < 2 {
        return;
    }
    let a = timetable.coords(rng.random_range(0..n));
    let b = timetable.coords(rng.random_range(0..n));
    timetable.swap(a, b);
}

/// One repair move on a random conflict cell.
///
/// Tries every other slot in random order for one where the activity is
/// conflict-free and an adequate room is empty, and moves it there.
/// Otherwise swaps the cell with a random occupied cell of another slot,
/// or leaves the grid unchanged when that slot is empty.
///
/// Returns `false` when the timetable has no conflict cell.
pub fn repair_step<R: Rng>(problem: &Problem, timetable: &mut Timetable, rng: &mut R) -> bool {
    let sites = violation_sites(problem, timetable);
    if sites.is_empty() {
        return false;
    }
    let site = sites[rng.random_range(0..sites.len())];

    let mut targets: Vec<usize> = (0..timetable.slot_count())
        .filter(|&s| s != site.slot)
        .collect();
    targets.shuffle(rng);

    for &target in &targets {
        if !slot_is_free(problem, timetable, site.activity, target) {
            continue;
        }
        let rooms = suitable_rooms(problem, timetable, site.activity, target);
        if rooms.is_empty() {
            continue;
        }
        let room = rooms[rng.random_range(0..rooms.len())];
        timetable.set(site.slot, site.room, None);
        timetable.set(target, room, Some(site.activity));
        return true;
    }

    if let Some(&target) = targets.first() {
        let occupied: Vec<usize> = (0..timetable.room_count())
            .filter(|&room| timetable.get(target, room).is_some())
            .collect();
        if !occupied.is_empty() {
            let room = occupied[rng.random_range(0..occupied.len())];
            timetable.swap((site.slot, site.room), (target, room));
        }
    }
    true
}

/// Places every activity that has no occurrence in the grid, most
/// constrained first.
///
/// Returns the number of occurrences placed.
pub fn place_unassigned<R: Rng>(problem: &Problem, timetable: &mut Timetable, rng: &mut R) -> usize {
    let counts = timetable.occurrences(problem.activity_count());
    let mut placed = 0;
    for activity in placement_order(problem) {
        if counts[activity] > 0 {
            continue;
        }
        for _ in 0..problem.activity(activity).duration {
            if place_occurrence(problem, timetable, activity, rng).is_none() {
                break;
            }
            placed += 1;
        }
    }
    placed
}

/// Repair-guided mutation.
///
/// Applies [`repair_step`], or [`random_mutation`] when there is no
/// conflict to repair, then [`place_unassigned`].
pub fn repair_mutation<R: Rng>(problem: &Problem, timetable: &mut Timetable, rng: &mut R) {
    if !repair_step(problem, timetable, rng) {
        random_mutation(timetable, rng);
    }
    place_unassigned(problem, timetable, rng);
}

/// Repair mutation with probability `repair_probability`, random
/// mutation otherwise.
pub fn mutate<R: Rng>(
    problem: &Problem,
    timetable: &mut Timetable,
    repair_probability: f64,
    rng: &mut R,
) {
    if rng.random_range(0.0..1.0) < repair_probability {
        repair_mutation(problem, timetable, rng);
    } else {
        random_mutation(timetable, rng);
    }
}

// ============================================================================
// Variation pipeline
// ============================================================================

/// Crossover and mutation settings shared by every selection strategy.
#[derive(Debug, Clone, Copy)]
pub struct Variation<'a> {
    problem: &'a Problem,
    /// Probability of crossing two parents instead of copying them.
    pub crossover_rate: f64,
    /// Per-child mutation probability.
    pub mutation_rate: f64,
    /// Share of mutations that are repair-guided.
    pub repair_probability: f64,
}

impl<'a> Variation<'a> {
    /// Creates a pipeline with rates 0.8 / 0.2 / 0.8.
    pub fn new(problem: &'a Problem) -> Self {
        Self {
            problem,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            repair_probability: 0.8,
        }
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the repair share of mutations.
    pub fn with_repair_probability(mut self, p: f64) -> Self {
        self.repair_probability = p;
        self
    }

    /// The problem the operators act on.
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// Produces two children from two parents.
    pub fn breed<R: Rng>(
        &self,
        a: &Timetable,
        b: &Timetable,
        rng: &mut R,
    ) -> (Timetable, Timetable) {
        let (mut c1, mut c2) = if rng.random_range(0.0..1.0) < self.crossover_rate {
            crossover(a, b, rng)
        } else {
            (a.clone(), b.clone())
        };
        for child in [&mut c1, &mut c2] {
            if rng.random_range(0.0..1.0) < self.mutation_rate {
                mutate(self.problem, child, self.repair_probability, rng);
            }
        }
        (c1, c2)
    }
}

// ============================================================================
// Tests
// ============================================================================
