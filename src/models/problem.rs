//! Problem instance: validated reference data with O(1) lookups.
//!
//! Everything the evaluator and the operators need per activity (assigned
//! lecturer index, group indices, class size) is resolved once here, so
//! the hot loop never touches a string.

use super::{Activity, Group, Lecturer, Room, SlotCalendar};
use crate::error::{Result, TimetableError};
use crate::validation::validate_input;
use std::collections::HashMap;

/// Immutable timetabling instance.
#[derive(Debug, Clone)]
pub struct Problem {
    activities: Vec<Activity>,
    groups: Vec<Group>,
    rooms: Vec<Room>,
    lecturers: Vec<Lecturer>,
    calendar: SlotCalendar,

    activity_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
    room_index: HashMap<String, usize>,
    lecturer_index: HashMap<String, usize>,
    slot_index: HashMap<String, usize>,

    teacher_of: Vec<usize>,
    groups_of: Vec<Vec<usize>>,
    class_size: Vec<u32>,
}

impl Problem {
    /// Builds a problem after validating the reference data.
    ///
    /// # Errors
    /// [`TimetableError::InvalidProblem`] listing every validation failure.
    pub fn new(
        activities: Vec<Activity>,
        groups: Vec<Group>,
        rooms: Vec<Room>,
        lecturers: Vec<Lecturer>,
        calendar: SlotCalendar,
    ) -> Result<Self> {
        validate_input(&activities, &groups, &rooms, &lecturers, &calendar)
            .map_err(TimetableError::InvalidProblem)?;

        let activity_index = index_by(&activities, |a| &a.id);
        let group_index = index_by(&groups, |g| &g.id);
        let room_index = index_by(&rooms, |r| &r.id);
        let lecturer_index = index_by(&lecturers, |l| &l.id);
        let slot_index = index_by(calendar.slots(), |s| s);

        // Validation guarantees every reference below resolves.
        let mut teacher_of = Vec::with_capacity(activities.len());
        let mut groups_of = Vec::with_capacity(activities.len());
        let mut class_size = Vec::with_capacity(activities.len());
        for act in &activities {
            let teacher = act
                .assigned_teacher()
                .and_then(|t| lecturer_index.get(t).copied())
                .unwrap_or_default();
            let mut gs: Vec<usize> = act
                .group_ids
                .iter()
                .filter_map(|g| group_index.get(g).copied())
                .collect();
            gs.sort_unstable();
            gs.dedup();
            let size = gs.iter().map(|&g| groups[g].size).sum();
            teacher_of.push(teacher);
            groups_of.push(gs);
            class_size.push(size);
        }

        Ok(Self {
            activities,
            groups,
            rooms,
            lecturers,
            calendar,
            activity_index,
            group_index,
            room_index,
            lecturer_index,
            slot_index,
            teacher_of,
            groups_of,
            class_size,
        })
    }

    /// All activities, indexed by activity index.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Activity at `index`.
    pub fn activity(&self, index: usize) -> &Activity {
        &self.activities[index]
    }

    /// Index of the activity with the given id.
    pub fn activity_index(&self, id: &str) -> Option<usize> {
        self.activity_index.get(id).copied()
    }

    /// All groups.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group by id.
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.group_index.get(id).map(|&i| &self.groups[i])
    }

    /// All rooms, indexed by room index.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room at `index`.
    pub fn room(&self, index: usize) -> &Room {
        &self.rooms[index]
    }

    /// Index of the room with the given id.
    pub fn room_index(&self, id: &str) -> Option<usize> {
        self.room_index.get(id).copied()
    }

    /// All lecturers.
    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }

    /// Lecturer by id.
    pub fn lecturer(&self, id: &str) -> Option<&Lecturer> {
        self.lecturer_index.get(id).map(|&i| &self.lecturers[i])
    }

    /// The slot calendar.
    pub fn calendar(&self) -> &SlotCalendar {
        &self.calendar
    }

    /// Index of the slot with the given id.
    pub fn slot_index(&self, id: &str) -> Option<usize> {
        self.slot_index.get(id).copied()
    }

    /// Number of activities.
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.calendar.len()
    }

    /// Number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lecturer index of the activity's assigned teacher.
    #[inline]
    pub fn teacher_of(&self, activity: usize) -> usize {
        self.teacher_of[activity]
    }

    /// Group indices attending the activity.
    #[inline]
    pub fn groups_of(&self, activity: usize) -> &[usize] {
        &self.groups_of[activity]
    }

    /// Summed size of the activity's groups.
    #[inline]
    pub fn class_size(&self, activity: usize) -> u32 {
        self.class_size[activity]
    }

    /// Whether `room` seats the activity's class.
    #[inline]
    pub fn fits(&self, activity: usize, room: usize) -> bool {
        self.class_size[activity] <= self.rooms[room].capacity
    }

    /// Whether two activities share the assigned lecturer or any group.
    pub fn clashes(&self, a: usize, b: usize) -> bool {
        self.teacher_of[a] == self.teacher_of[b]
            || self.groups_of[a].iter().any(|g| self.groups_of[b].contains(g))
    }

    /// Total number of occurrences all activities require.
    pub fn total_occurrences(&self) -> usize {
        self.activities.iter().map(|a| a.duration as usize).sum()
    }

    /// Number of (slot, room) cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.slot_count() * self.room_count()
    }
}

fn index_by<T>(items: &[T], key: impl Fn(&T) -> &String) -> HashMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item).clone(), i))
        .collect()
}
