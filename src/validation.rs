//! Input validation for timetabling problems.
//!
//! Checks structural integrity of the reference data before a
//! [`Problem`](crate::models::Problem) is built. Detects:
//! - Duplicate IDs (activities, groups, rooms, lecturers, slots)
//! - Activities without a lecturer or with zero duration
//! - References to unknown groups or lecturers
//! - Groups of size zero, rooms of capacity zero
//! - An empty calendar or an empty room list

use crate::models::{Activity, Group, Lecturer, Room, SlotCalendar};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// An activity lists no lecturer.
    MissingTeacher,
    /// An activity references a lecturer that doesn't exist.
    InvalidTeacherReference,
    /// An activity references a subgroup that doesn't exist.
    InvalidGroupReference,
    /// An activity requires zero occurrences.
    ZeroDuration,
    /// A group has no students.
    EmptyGroup,
    /// A room has zero capacity.
    ZeroCapacity,
    /// No slots or no rooms to place anything in.
    EmptyGrid,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the reference data of a timetabling problem.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_input(
    activities: &[Activity],
    groups: &[Group],
    rooms: &[Room],
    lecturers: &[Lecturer],
    calendar: &SlotCalendar,
) -> ValidationResult {
    let mut errors = Vec::new();

    if calendar.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "Slot calendar is empty",
        ));
    }
    if rooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "No rooms defined",
        ));
    }

    check_unique("slot", calendar.slots().iter().map(String::as_str), &mut errors);
    check_unique("room", rooms.iter().map(|r| r.id.as_str()), &mut errors);
    check_unique("group", groups.iter().map(|g| g.id.as_str()), &mut errors);
    check_unique("lecturer", lecturers.iter().map(|l| l.id.as_str()), &mut errors);
    check_unique("activity", activities.iter().map(|a| a.id.as_str()), &mut errors);

    for room in rooms.iter().filter(|r| r.capacity == 0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroCapacity,
            format!("Room '{}' has zero capacity", room.id),
        ));
    }
    for group in groups.iter().filter(|g| g.size == 0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGroup,
            format!("Group '{}' has no students", group.id),
        ));
    }

    let group_ids: HashSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();
    let lecturer_ids: HashSet<&str> = lecturers.iter().map(|l| l.id.as_str()).collect();

    for act in activities {
        if act.duration == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Activity '{}' has zero duration", act.id),
            ));
        }
        if act.teacher_ids.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingTeacher,
                format!("Activity '{}' has no lecturer", act.id),
            ));
        }
        for teacher in &act.teacher_ids {
            if !lecturer_ids.contains(teacher.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTeacherReference,
                    format!(
                        "Activity '{}' references unknown lecturer '{}'",
                        act.id, teacher
                    ),
                ));
            }
        }
        for group in &act.group_ids {
            if !group_ids.contains(group.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidGroupReference,
                    format!("Activity '{}' references unknown group '{}'", act.id, group),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique<'a>(
    label: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {label} ID: {id}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecturers() -> Vec<Lecturer> {
        vec![Lecturer::new("T1", "Ada", "CS")]
    }

    fn groups() -> Vec<Group> {
        vec![Group::new("G1", 30)]
    }

    fn rooms() -> Vec<Room> {
        vec![Room::new("R1", 40)]
    }

    #[test]
    fn test_valid_input() {
        let acts = vec![Activity::new("A1", "CS101", "T1").with_group("G1")];
        let result = validate_input(
            &acts,
            &groups(),
            &rooms(),
            &lecturers(),
            &SlotCalendar::weekly(1, 2),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_duplicate_activity() {
        let acts = vec![
            Activity::new("A1", "CS101", "T1"),
            Activity::new("A1", "CS102", "T1"),
        ];
        let errs = validate_input(
            &acts,
            &groups(),
            &rooms(),
            &lecturers(),
            &SlotCalendar::weekly(1, 2),
        )
        .unwrap_err();
        assert!(errs
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("A1")));
    }

    #[test]
    fn test_unknown_references() {
        let acts = vec![Activity::new("A1", "CS101", "T9").with_group("G9")];
        let errs = validate_input(
            &acts,
            &groups(),
            &rooms(),
            &lecturers(),
            &SlotCalendar::weekly(1, 2),
        )
        .unwrap_err();
        let kinds: Vec<_> = errs.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::InvalidTeacherReference));
        assert!(kinds.contains(&ValidationErrorKind::InvalidGroupReference));
    }

    #[test]
    fn test_zero_values() {
        let acts = vec![Activity::new("A1", "CS101", "T1").with_duration(0)];
        let errs = validate_input(
            &acts,
            &[Group::new("G1", 0)],
            &[Room::new("R1", 0)],
            &lecturers(),
            &SlotCalendar::weekly(1, 1),
        )
        .unwrap_err();
        let kinds: Vec<_> = errs.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::ZeroDuration));
        assert!(kinds.contains(&ValidationErrorKind::EmptyGroup));
        assert!(kinds.contains(&ValidationErrorKind::ZeroCapacity));
    }

    #[test]
    fn test_empty_grid() {
        let errs = validate_input(&[], &[], &[], &[], &SlotCalendar::new(Vec::<String>::new()))
            .unwrap_err();
        assert_eq!(
            errs.iter()
                .filter(|e| e.kind == ValidationErrorKind::EmptyGrid)
                .count(),
            2
        );
    }

    #[test]
    fn test_missing_teacher() {
        let mut act = Activity::new("A1", "CS101", "T1");
        act.teacher_ids.clear();
        let errs = validate_input(
            &[act],
            &groups(),
            &rooms(),
            &lecturers(),
            &SlotCalendar::weekly(1, 1),
        )
        .unwrap_err();
        assert_eq!(errs[0].kind, ValidationErrorKind::MissingTeacher);
    }
}
