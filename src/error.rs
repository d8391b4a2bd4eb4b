//! Error types.
//!
//! Infeasible timetables are not errors: they are reported through
//! violation counts. [`TimetableError`] is reserved for malformed input
//! and broken contracts (a grid that does not match its problem, a
//! dangling activity reference, an undecodable document).

use crate::validation::ValidationError;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by the timetabling core.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// Reference data failed structural validation.
    #[error("invalid problem data: {} error(s), first: {}", .0.len(), first_message(.0))]
    InvalidProblem(Vec<ValidationError>),

    /// Optimizer configuration is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Algorithm name not recognised.
    #[error("unknown algorithm '{0}' (expected one of: nsga2, moead, spea2)")]
    UnknownAlgorithm(String),

    /// Timetable grid dimensions differ from the problem's slot/room counts.
    #[error("timetable is {slots}x{rooms} but the problem has {expected_slots} slots and {expected_rooms} rooms")]
    DimensionMismatch {
        slots: usize,
        rooms: usize,
        expected_slots: usize,
        expected_rooms: usize,
    },

    /// A cell references an activity index the problem does not define.
    #[error("cell ({slot}, {room}) references activity index {index}, but only {count} activities exist")]
    DanglingActivity {
        slot: usize,
        room: usize,
        index: usize,
        count: usize,
    },

    /// Document lacks a slot of the calendar.
    #[error("timetable document is missing slot '{0}'")]
    MissingSlot(String),

    /// Document lacks a (slot, room) cell.
    #[error("timetable document is missing cell ({slot}, {room})")]
    MissingCell { slot: String, room: String },

    /// Document names a slot outside the calendar.
    #[error("timetable document names unknown slot '{0}'")]
    UnknownSlot(String),

    /// Document names a room the problem does not define.
    #[error("timetable document names unknown room '{room}' in slot '{slot}'")]
    UnknownRoom { slot: String, room: String },

    /// Document names an activity the problem does not define.
    #[error("cell ({slot}, {room}) names unknown activity '{activity}'")]
    UnknownActivity {
        slot: String,
        room: String,
        activity: String,
    },
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_problem_display() {
        let err = TimetableError::InvalidProblem(vec![ValidationError {
            kind: ValidationErrorKind::DuplicateId,
            message: "Duplicate room ID: LH1".into(),
        }]);
        let text = err.to_string();
        assert!(text.contains("1 error(s)"));
        assert!(text.contains("LH1"));
    }

    #[test]
    fn test_missing_cell_display() {
        let err = TimetableError::MissingCell {
            slot: "MON1".into(),
            room: "LH1".into(),
        };
        assert_eq!(err.to_string(), "timetable document is missing cell (MON1, LH1)");
    }
}
