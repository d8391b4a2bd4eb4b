//! Constrained greedy population initialization.
//!
//! Activities are placed most-constrained first: descending by number of
//! subgroups, then by duration. Each required occurrence is placed
//! uniformly at random among the conflict-free (slot, room) options. When
//! none exist, it goes to the capacity-adequate empty cell with the fewest
//! local conflicts. When no empty room anywhere is large enough, the
//! occurrence stays unplaced.

use crate::models::{Problem, Timetable};
use crate::random::derive_rng;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

/// Whether no activity in `slot` shares the assigned lecturer or a
/// subgroup with `activity`.
pub fn slot_is_free(problem: &Problem, timetable: &Timetable, activity: usize, slot: usize) -> bool {
    timetable
        .row(slot)
        .iter()
        .flatten()
        .all(|&other| !problem.clashes(activity, other))
}

/// Empty rooms of `slot` that seat the activity's class.
pub fn suitable_rooms(
    problem: &Problem,
    timetable: &Timetable,
    activity: usize,
    slot: usize,
) -> Vec<usize> {
    timetable
        .row(slot)
        .iter()
        .enumerate()
        .filter(|(room, cell)| cell.is_none() && problem.fits(activity, *room))
        .map(|(room, _)| room)
        .collect()
}

/// Lecturer matches plus shared subgroups between `activity` and the
/// activities already in `slot`.
fn local_conflicts(problem: &Problem, timetable: &Timetable, activity: usize, slot: usize) -> usize {
    let teacher = problem.teacher_of(activity);
    let groups = problem.groups_of(activity);
    timetable
        .row(slot)
        .iter()
        .flatten()
        .map(|&other| {
            let t = usize::from(problem.teacher_of(other) == teacher);
            let g = problem
                .groups_of(other)
                .iter()
                .filter(|g| groups.contains(g))
                .count();
            t + g
        })
        .sum()
}

/// Places one occurrence of `activity`.
///
/// Returns the `(slot, room)` used, or `None` when no empty room anywhere
/// can seat the class.
pub fn place_occurrence<R: Rng>(
    problem: &Problem,
    timetable: &mut Timetable,
    activity: usize,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let mut options = Vec::new();
    for slot in 0..timetable.slot_count() {
        if slot_is_free(problem, timetable, activity, slot) {
            options.extend(
                suitable_rooms(problem, timetable, activity, slot)
                    .into_iter()
                    .map(|room| (slot, room)),
            );
        }
    }

    let chosen = if options.is_empty() {
        least_conflicted_cell(problem, timetable, activity, rng)
    } else {
        Some(options[rng.random_range(0..options.len())])
    };

    if let Some((slot, room)) = chosen {
        timetable.set(slot, room, Some(activity));
    }
    chosen
}

/// Fallback placement: fewest local conflicts, ties to the first slot of a
/// random order.
fn least_conflicted_cell<R: Rng>(
    problem: &Problem,
    timetable: &Timetable,
    activity: usize,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let mut order: Vec<usize> = (0..timetable.slot_count()).collect();
    order.shuffle(rng);

    let mut best: Option<(usize, usize, usize)> = None;
    for slot in order {
        let rooms = suitable_rooms(problem, timetable, activity, slot);
        if rooms.is_empty() {
            continue;
        }
        let conflicts = local_conflicts(problem, timetable, activity, slot);
        if best.map_or(true, |(c, _, _)| conflicts < c) {
            let room = rooms[rng.random_range(0..rooms.len())];
            best = Some((conflicts, slot, room));
        }
    }
    best.map(|(_, slot, room)| (slot, room))
}

/// Activity indices, most constrained first.
///
/// Stable: activities with equal `(groups, duration)` keep input order.
pub fn placement_order(problem: &Problem) -> Vec<usize> {
    let mut order: Vec<usize> = (0..problem.activity_count()).collect();
    order.sort_by(|&a, &b| {
        let ka = (problem.groups_of(a).len(), problem.activity(a).duration);
        let kb = (problem.groups_of(b).len(), problem.activity(b).duration);
        kb.cmp(&ka)
    });
    order
}

/// Activities whose class fits no room of the problem.
pub fn oversized_activities(problem: &Problem) -> Vec<usize> {
    let largest = problem.rooms().iter().map(|r| r.capacity).max().unwrap_or(0);
    (0..problem.activity_count())
        .filter(|&a| problem.class_size(a) > largest)
        .collect()
}

/// Builds one timetable by constrained greedy placement.
pub fn initialize_timetable<R: Rng>(problem: &Problem, rng: &mut R) -> Timetable {
    let mut timetable = Timetable::for_problem(problem);
    for activity in placement_order(problem) {
        for _ in 0..problem.activity(activity).duration {
            if place_occurrence(problem, &mut timetable, activity, rng).is_none() {
                break;
            }
        }
    }
    timetable
}

/// Builds `size` timetables.
///
/// Individual `i` draws from `derive_rng(seed, i)`, so the result does not
/// depend on `parallel` or on thread scheduling.
pub fn initialize_population(
    problem: &Problem,
    size: usize,
    seed: u64,
    parallel: bool,
) -> Vec<Timetable> {
    for a in oversized_activities(problem) {
        log::warn!(
            "activity '{}' ({} students) fits no room; it will stay unassigned",
            problem.activity(a).id,
            problem.class_size(a)
        );
    }

    let build = |i: usize| {
        let mut rng = derive_rng(seed, i as u64);
        initialize_timetable(problem, &mut rng)
    };
    if parallel {
        (0..size).into_par_iter().map(build).collect()
    } else {
        (0..size).map(build).collect()
    }
}
