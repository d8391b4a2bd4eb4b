//! Student groups, rooms and lecturers.

use serde::{Deserialize, Serialize};

/// A student subgroup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique subgroup identifier (e.g. `"Y1S1.1"`).
    pub id: String,
    /// Number of students.
    pub size: u32,
}

impl Group {
    /// Creates a group.
    pub fn new(id: impl Into<String>, size: u32) -> Self {
        Self { id: id.into(), size }
    }
}

/// A teaching space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room code (e.g. `"LH401"`).
    pub id: String,
    /// Seating capacity.
    pub capacity: u32,
}

impl Room {
    /// Creates a room.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }
}

/// A lecturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    /// Unique lecturer identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning department.
    pub department: String,
}

impl Lecturer {
    /// Creates a lecturer.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: department.into(),
        }
    }
}
