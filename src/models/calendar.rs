//! Slot calendar.
//!
//! The calendar is the fixed, ordered list of teaching periods shared by
//! every timetable. Slot order matters: idle time is measured in index
//! distance and crossover cuts the week at a slot index.

use serde::{Deserialize, Serialize};

/// Day labels used by [`SlotCalendar::weekly`].
pub const WEEKDAYS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// Ordered list of slot identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCalendar {
    slots: Vec<String>,
}

impl SlotCalendar {
    /// Creates a calendar from explicit slot ids, in order.
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds `days × periods` slots named `MON1, MON2, ..., FRI8`.
    ///
    /// `days` is capped at 7.
    ///
    /// ```
    /// use u_timetable::models::SlotCalendar;
    ///
    /// let cal = SlotCalendar::weekly(5, 8);
    /// assert_eq!(cal.len(), 40);
    /// assert_eq!(cal.slot(0), Some("MON1"));
    /// assert_eq!(cal.slot(39), Some("FRI8"));
    /// ```
    pub fn weekly(days: usize, periods: usize) -> Self {
        let slots = WEEKDAYS
            .iter()
            .take(days)
            .flat_map(|day| (1..=periods).map(move |p| format!("{day}{p}")))
            .collect();
        Self { slots }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the calendar has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot id at `index`.
    pub fn slot(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    /// All slot ids in order.
    pub fn slots(&self) -> &[String] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_order() {
        let cal = SlotCalendar::weekly(2, 3);
        assert_eq!(
            cal.slots(),
            &["MON1", "MON2", "MON3", "TUE1", "TUE2", "TUE3"]
        );
    }

    #[test]
    fn test_weekly_caps_days() {
        assert_eq!(SlotCalendar::weekly(10, 1).len(), 7);
    }

    #[test]
    fn test_explicit() {
        let cal = SlotCalendar::new(["S1", "S2"]);
        assert_eq!(cal.len(), 2);
        assert!(!cal.is_empty());
        assert_eq!(cal.slot(2), None);
    }
}
