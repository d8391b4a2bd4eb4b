//! Hard constraint counting.

use crate::error::Result;
use crate::models::{Problem, Timetable};
use serde::{Deserialize, Serialize};

/// Hard constraint violation counts of one timetable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardViolations {
    /// Empty (slot, room) cells.
    pub vacant_rooms: usize,
    /// Repeated assigned lecturers within a slot.
    pub teacher_conflicts: usize,
    /// Repeated subgroups within a slot, one per repeated occurrence.
    pub group_conflicts: usize,
    /// Cells whose class is larger than the room.
    pub capacity_violations: usize,
    /// Activities with no occurrence anywhere in the grid.
    pub unassigned: usize,
}

impl HardViolations {
    /// Sum of genuine conflicts (vacant rooms excluded).
    pub fn conflicts(&self) -> usize {
        self.teacher_conflicts + self.group_conflicts + self.capacity_violations + self.unassigned
    }

    /// No teacher, group, capacity or unassigned violation.
    pub fn is_feasible(&self) -> bool {
        self.conflicts() == 0
    }
}

/// Counts hard constraint violations slot by slot.
///
/// Within a slot, rooms are scanned in index order while tracking the
/// lecturers and subgroups already seen. A lecturer seen again counts one
/// teacher conflict; each of the activity's subgroups already present
/// counts one group conflict. An activity counts as assigned when at least
/// one of its occurrences is placed, so a duration-2 activity placed once
/// is not unassigned.
///
/// # Errors
/// [`DimensionMismatch`](crate::TimetableError::DimensionMismatch) or
/// [`DanglingActivity`](crate::TimetableError::DanglingActivity) when the
/// grid does not belong to `problem`.
pub fn hard_violations(problem: &Problem, timetable: &Timetable) -> Result<HardViolations> {
    timetable.check(problem)?;

    let mut v = HardViolations::default();
    // Stamp arrays: entry == slot + 1 means "seen in the current slot".
    let mut teacher_seen = vec![0usize; problem.lecturers().len()];
    let mut group_seen = vec![0usize; problem.groups().len()];
    let mut placed = vec![false; problem.activity_count()];

    for slot in 0..timetable.slot_count() {
        let stamp = slot + 1;
        for (room, cell) in timetable.row(slot).iter().enumerate() {
            let Some(act) = *cell else {
                v.vacant_rooms += 1;
                continue;
            };
            placed[act] = true;

            let teacher = problem.teacher_of(act);
            if teacher_seen[teacher] == stamp {
                v.teacher_conflicts += 1;
            }
            teacher_seen[teacher] = stamp;

            let groups = problem.groups_of(act);
            v.group_conflicts += groups.iter().filter(|&&g| group_seen[g] == stamp).count();
            for &g in groups {
                group_seen[g] = stamp;
            }

            if !problem.fits(act, room) {
                v.capacity_violations += 1;
            }
        }
    }

    v.unassigned = placed.iter().filter(|p| !**p).count();
    Ok(v)
}
