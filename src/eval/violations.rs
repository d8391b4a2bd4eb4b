//! Locating the cells involved in hard conflicts.

use crate::error::Result;
use crate::models::{Placement, Problem, Timetable};

/// A cell taking part in a teacher, group or capacity conflict.
pub type ViolationSite = Placement;

/// Finds every occupied cell involved in a conflict.
///
/// Within a slot, when a lecturer or subgroup repeats, both the current
/// cell and the cell where it was first seen are reported. Oversized
/// classes report their own cell. Each cell appears at most once, in the
/// order it was first reported.
///
/// # Errors
/// [`TimetableError::DimensionMismatch`](crate::TimetableError::DimensionMismatch)
/// or [`TimetableError::DanglingActivity`](crate::TimetableError::DanglingActivity)
/// when the grid does not belong to `problem`.
pub fn find_violations(problem: &Problem, timetable: &Timetable) -> Result<Vec<ViolationSite>> {
    timetable.check(problem)?;
    Ok(violation_sites(problem, timetable))
}

/// [`find_violations`] without the grid check, for operators that only
/// see grids built for `problem`.
pub(crate) fn violation_sites(problem: &Problem, timetable: &Timetable) -> Vec<ViolationSite> {
    let rooms = timetable.room_count();
    let mut reported = vec![false; timetable.cell_count()];
    let mut sites = Vec::new();

    let mut report = |slot: usize, room: usize, sites: &mut Vec<ViolationSite>| {
        let flat = slot * rooms + room;
        if !reported[flat] {
            reported[flat] = true;
            if let Some(activity) = timetable.get(slot, room) {
                sites.push(Placement { slot, room, activity });
            }
        }
    };

    // First room where each lecturer / group appeared in the current slot.
    let mut teacher_at: Vec<Option<usize>> = vec![None; problem.lecturers().len()];
    let mut group_at: Vec<Option<usize>> = vec![None; problem.groups().len()];

    for slot in 0..timetable.slot_count() {
        teacher_at.iter_mut().for_each(|t| *t = None);
        group_at.iter_mut().for_each(|g| *g = None);

        for (room, cell) in timetable.row(slot).iter().enumerate() {
            let Some(act) = *cell else { continue };

            let teacher = problem.teacher_of(act);
            match teacher_at[teacher] {
                Some(first) => {
                    report(slot, room, &mut sites);
                    report(slot, first, &mut sites);
                }
                None => teacher_at[teacher] = Some(room),
            }

            for &g in problem.groups_of(act) {
                match group_at[g] {
                    Some(first) => {
                        report(slot, room, &mut sites);
                        report(slot, first, &mut sites);
                    }
                    None => group_at[g] = Some(room),
                }
            }

            if !problem.fits(act, room) {
                report(slot, room, &mut sites);
            }
        }
    }

    sites
}
