//! Timetable grid and its wire document.
//!
//! A [`Timetable`] is a dense `slots × rooms` grid. Each cell holds at most
//! one activity index. Because storage has fixed length, every (slot, room)
//! cell exists after any operator runs; a cell is never "missing", only
//! empty.
//!
//! [`TimetableDocument`] is the serde form exchanged with external layers:
//! `slot id -> room id -> activity id | null`.

use super::Problem;
use crate::error::{Result, TimetableError};
use std::collections::BTreeMap;

/// Wire form of a timetable keyed by slot id, then room id.
pub type TimetableDocument = BTreeMap<String, BTreeMap<String, Option<String>>>;

/// One occupied cell of a timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Slot index.
    pub slot: usize,
    /// Room index.
    pub room: usize,
    /// Activity index.
    pub activity: usize,
}

/// Dense slot × room assignment grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    slots: usize,
    rooms: usize,
    cells: Vec<Option<usize>>,
}

impl Timetable {
    /// Creates an all-empty grid.
    pub fn empty(slots: usize, rooms: usize) -> Self {
        Self {
            slots,
            rooms,
            cells: vec![None; slots * rooms],
        }
    }

    /// Creates an all-empty grid sized for `problem`.
    pub fn for_problem(problem: &Problem) -> Self {
        Self::empty(problem.slot_count(), problem.room_count())
    }

    /// Number of slots (rows).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Number of rooms (columns).
    #[inline]
    pub fn room_count(&self) -> usize {
        self.rooms
    }

    /// Number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, slot: usize, room: usize) -> usize {
        debug_assert!(slot < self.slots && room < self.rooms);
        slot * self.rooms + room
    }

    /// Activity in a cell.
    #[inline]
    pub fn get(&self, slot: usize, room: usize) -> Option<usize> {
        self.cells[self.index(slot, room)]
    }

    /// Overwrites a cell.
    #[inline]
    pub fn set(&mut self, slot: usize, room: usize, activity: Option<usize>) {
        let i = self.index(slot, room);
        self.cells[i] = activity;
    }

    /// Swaps the contents of two cells.
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        let ia = self.index(a.0, a.1);
        let ib = self.index(b.0, b.1);
        self.cells.swap(ia, ib);
    }

    /// Cell at a flat index (`slot * rooms + room`).
    #[inline]
    pub fn cell(&self, flat: usize) -> Option<usize> {
        self.cells[flat]
    }

    /// Converts a flat index to `(slot, room)`.
    #[inline]
    pub fn coords(&self, flat: usize) -> (usize, usize) {
        (flat / self.rooms, flat % self.rooms)
    }

    /// All cells of a slot, indexed by room.
    #[inline]
    pub fn row(&self, slot: usize) -> &[Option<usize>] {
        let start = slot * self.rooms;
        &self.cells[start..start + self.rooms]
    }

    /// Mutable row of a slot.
    #[inline]
    pub fn row_mut(&mut self, slot: usize) -> &mut [Option<usize>] {
        let start = slot * self.rooms;
        &mut self.cells[start..start + self.rooms]
    }

    /// Iterates over occupied cells in (slot, room) order.
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|activity| Placement {
                slot: i / self.rooms,
                room: i % self.rooms,
                activity,
            })
        })
    }

    /// Per-activity count of placed occurrences.
    pub fn occurrences(&self, activity_count: usize) -> Vec<usize> {
        let mut counts = vec![0; activity_count];
        for a in self.cells.iter().flatten() {
            if let Some(c) = counts.get_mut(*a) {
                *c += 1;
            }
        }
        counts
    }

    /// Number of empty cells.
    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Checks that the grid matches `problem` and every index resolves.
    ///
    /// # Errors
    /// [`TimetableError::DimensionMismatch`] or
    /// [`TimetableError::DanglingActivity`].
    pub fn check(&self, problem: &Problem) -> Result<()> {
        if self.slots != problem.slot_count() || self.rooms != problem.room_count() {
            return Err(TimetableError::DimensionMismatch {
                slots: self.slots,
                rooms: self.rooms,
                expected_slots: problem.slot_count(),
                expected_rooms: problem.room_count(),
            });
        }
        let count = problem.activity_count();
        if let Some(p) = self.placements().find(|p| p.activity >= count) {
            return Err(TimetableError::DanglingActivity {
                slot: p.slot,
                room: p.room,
                index: p.activity,
                count,
            });
        }
        Ok(())
    }

    /// Encodes the grid using problem ids.
    ///
    /// # Errors
    /// Same as [`Timetable::check`].
    pub fn to_document(&self, problem: &Problem) -> Result<TimetableDocument> {
        self.check(problem)?;
        let doc = problem
            .calendar()
            .slots()
            .iter()
            .enumerate()
            .map(|(s, slot_id)| {
                let row = problem
                    .rooms()
                    .iter()
                    .enumerate()
                    .map(|(r, room)| {
                        let act = self.get(s, r).map(|a| problem.activity(a).id.clone());
                        (room.id.clone(), act)
                    })
                    .collect();
                (slot_id.clone(), row)
            })
            .collect();
        Ok(doc)
    }

    /// Decodes a document, failing on the first missing or unknown key.
    ///
    /// # Errors
    /// [`TimetableError::MissingSlot`], [`TimetableError::MissingCell`],
    /// [`TimetableError::UnknownSlot`], [`TimetableError::UnknownRoom`] or
    /// [`TimetableError::UnknownActivity`].
    pub fn from_document(problem: &Problem, doc: &TimetableDocument) -> Result<Self> {
        if let Some(slot) = doc.keys().find(|s| problem.slot_index(s).is_none()) {
            return Err(TimetableError::UnknownSlot(slot.clone()));
        }

        let mut grid = Self::for_problem(problem);
        for (s, slot_id) in problem.calendar().slots().iter().enumerate() {
            let row = doc
                .get(slot_id)
                .ok_or_else(|| TimetableError::MissingSlot(slot_id.clone()))?;

            if let Some(room) = row.keys().find(|r| problem.room_index(r).is_none()) {
                return Err(TimetableError::UnknownRoom {
                    slot: slot_id.clone(),
                    room: room.clone(),
                });
            }

            for (r, room) in problem.rooms().iter().enumerate() {
                let cell = row.get(&room.id).ok_or_else(|| TimetableError::MissingCell {
                    slot: slot_id.clone(),
                    room: room.id.clone(),
                })?;
                let activity = match cell {
                    None => None,
                    Some(id) => Some(problem.activity_index(id).ok_or_else(|| {
                        TimetableError::UnknownActivity {
                            slot: slot_id.clone(),
                            room: room.id.clone(),
                            activity: id.clone(),
                        }
                    })?),
                };
                grid.set(s, r, activity);
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Group, Lecturer, Room, SlotCalendar};
    use proptest::prelude::*;

    fn problem() -> Problem {
        Problem::new(
            vec![
                Activity::new("A1", "CS101", "T1").with_group("G1"),
                Activity::new("A2", "CS102", "T1").with_group("G1"),
            ],
            vec![Group::new("G1", 30)],
            vec![Room::new("R1", 40), Room::new("R2", 40)],
            vec![Lecturer::new("T1", "Ada", "CS")],
            SlotCalendar::weekly(1, 3),
        )
        .unwrap()
    }

    #[test]
    fn test_grid_ops() {
        let mut t = Timetable::empty(3, 2);
        assert_eq!(t.cell_count(), 6);
        assert_eq!(t.empty_cells(), 6);
        t.set(1, 0, Some(0));
        t.set(2, 1, Some(1));
        assert_eq!(t.get(1, 0), Some(0));
        t.swap((1, 0), (0, 1));
        assert_eq!(t.get(1, 0), None);
        assert_eq!(t.get(0, 1), Some(0));
        assert_eq!(t.row(2), &[None, Some(1)]);
        assert_eq!(t.coords(5), (2, 1));
        let placed: Vec<_> = t.placements().map(|p| (p.slot, p.room, p.activity)).collect();
        assert_eq!(placed, vec![(0, 1, 0), (2, 1, 1)]);
        assert_eq!(t.occurrences(2), vec![1, 1]);
    }

    #[test]
    fn test_check_dimension_mismatch() {
        let p = problem();
        let err = Timetable::empty(2, 2).check(&p).unwrap_err();
        assert!(matches!(err, TimetableError::DimensionMismatch { slots: 2, .. }));
    }

    #[test]
    fn test_check_dangling() {
        let p = problem();
        let mut t = Timetable::for_problem(&p);
        t.set(0, 1, Some(7));
        let err = t.check(&p).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::DanglingActivity { slot: 0, room: 1, index: 7, count: 2 }
        ));
    }

    #[test]
    fn test_document_round_trip() {
        let p = problem();
        let mut t = Timetable::for_problem(&p);
        t.set(0, 0, Some(0));
        t.set(2, 1, Some(1));
        let doc = t.to_document(&p).unwrap();
        assert_eq!(doc["MON1"]["R1"].as_deref(), Some("A1"));
        assert_eq!(doc["MON2"]["R2"], None);

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: TimetableDocument = serde_json::from_str(&json).unwrap();
        let back = Timetable::from_document(&p, &parsed).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_document_missing_cell() {
        let p = problem();
        let mut doc = Timetable::for_problem(&p).to_document(&p).unwrap();
        doc.get_mut("MON2").unwrap().remove("R2");
        let err = Timetable::from_document(&p, &doc).unwrap_err();
        assert!(matches!(err, TimetableError::MissingCell { .. }));
    }

    #[test]
    fn test_document_missing_slot() {
        let p = problem();
        let mut doc = Timetable::for_problem(&p).to_document(&p).unwrap();
        doc.remove("MON3");
        let err = Timetable::from_document(&p, &doc).unwrap_err();
        assert!(matches!(err, TimetableError::MissingSlot(s) if s == "MON3"));
    }

    #[test]
    fn test_document_unknown_keys() {
        let p = problem();
        let base = Timetable::for_problem(&p).to_document(&p).unwrap();

        let mut doc = base.clone();
        doc.insert("SUN9".into(), BTreeMap::new());
        assert!(matches!(
            Timetable::from_document(&p, &doc),
            Err(TimetableError::UnknownSlot(_))
        ));

        let mut doc = base.clone();
        doc.get_mut("MON1").unwrap().insert("R9".into(), None);
        assert!(matches!(
            Timetable::from_document(&p, &doc),
            Err(TimetableError::UnknownRoom { .. })
        ));

        let mut doc = base;
        doc.get_mut("MON1").unwrap().insert("R1".into(), Some("A9".into()));
        assert!(matches!(
            Timetable::from_document(&p, &doc),
            Err(TimetableError::UnknownActivity { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_swaps_preserve_cells(
            ops in proptest::collection::vec((0usize..4, 0usize..3, 0usize..4, 0usize..3), 0..30)
        ) {
            let mut t = Timetable::empty(4, 3);
            t.set(0, 0, Some(0));
            t.set(3, 2, Some(1));
            for (s1, r1, s2, r2) in ops {
                t.swap((s1, r1), (s2, r2));
            }
            prop_assert_eq!(t.cell_count(), 12);
            prop_assert_eq!(t.occurrences(2), vec![1, 1]);
            prop_assert_eq!(t.empty_cells(), 10);
        }
    }
}
