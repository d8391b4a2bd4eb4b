//! Domain model.
//!
//! Reference data ([`Activity`], [`Group`], [`Room`], [`Lecturer`],
//! [`SlotCalendar`]) is gathered into a validated [`Problem`]. Candidate
//! solutions are [`Timetable`] grids of activity indices.

mod activity;
mod calendar;
mod problem;
mod resource;
mod timetable;

pub use activity::Activity;
pub use calendar::{SlotCalendar, WEEKDAYS};
pub use problem::Problem;
pub use resource::{Group, Lecturer, Room};
pub use timetable::{Placement, Timetable, TimetableDocument};
