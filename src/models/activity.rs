//! Activity model.
//!
//! An activity is one teaching session (lecture, tutorial, practical) that
//! must be placed `duration` times into the weekly grid. Each placement
//! ("occurrence") takes one (slot, room) cell.

use serde::{Deserialize, Serialize};

/// A teaching activity to be timetabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity code (e.g. `"AC-177"`).
    pub id: String,
    /// Subject or module code.
    pub subject: String,
    /// Eligible lecturers. The first entry is the assigned lecturer.
    pub teacher_ids: Vec<String>,
    /// Student subgroups attending this activity.
    pub group_ids: Vec<String>,
    /// Number of slot occurrences required (at least 1).
    pub duration: u32,
}

impl Activity {
    /// Creates an activity with one lecturer, no groups and duration 1.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        teacher_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            teacher_ids: vec![teacher_id.into()],
            group_ids: Vec::new(),
            duration: 1,
        }
    }

    /// Adds an attending subgroup.
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_ids.push(group_id.into());
        self
    }

    /// Adds an alternate eligible lecturer.
    pub fn with_alternate_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_ids.push(teacher_id.into());
        self
    }

    /// Sets the number of required occurrences.
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    /// The lecturer who actually teaches this activity.
    ///
    /// Returns `None` only for unvalidated activities without teachers.
    pub fn assigned_teacher(&self) -> Option<&str> {
        self.teacher_ids.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let a = Activity::new("A1", "CS101", "T1")
            .with_group("Y1S1")
            .with_group("Y1S2")
            .with_alternate_teacher("T2")
            .with_duration(2);
        assert_eq!(a.assigned_teacher(), Some("T1"));
        assert_eq!(a.teacher_ids.len(), 2);
        assert_eq!(a.group_ids, vec!["Y1S1".to_string(), "Y1S2".to_string()]);
        assert_eq!(a.duration, 2);
    }

    #[test]
    fn test_serde_field_names() {
        let a = Activity::new("A1", "CS101", "T1").with_group("G1");
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.contains("\"teacher_ids\":[\"T1\"]"));
        assert!(json.contains("\"group_ids\":[\"G1\"]"));
    }
}
