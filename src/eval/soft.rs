//! Soft quality score.
//!
//! For every subgroup and every lecturer, the slot indices they occupy are
//! collected in calendar order. Per entity:
//!
//! - *fatigue*: number of occurrences
//! - *idle*: empty periods between consecutive occurrences, over `slots - 1`
//! - *spread*: `2 × fatigue`
//!
//! Each metric is divided by its maximum over the entity kind and then
//! averaged over all entities of that kind, placed or not. Lecturer
//! workload balance is `max(0, 1 - var / mean)` of per-lecturer duration
//! sums, over lecturers with at least one placement.

use crate::error::Result;
use crate::models::{Problem, Timetable};
use serde::{Deserialize, Serialize};

/// Soft score with its components. All values lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftScore {
    /// Mean normalized subgroup fatigue.
    pub student_fatigue: f64,
    /// Mean normalized subgroup idle time.
    pub student_idle: f64,
    /// Mean normalized subgroup lecture spread.
    pub student_spread: f64,
    /// Mean normalized lecturer fatigue.
    pub lecturer_fatigue: f64,
    /// Mean normalized lecturer idle time.
    pub lecturer_idle: f64,
    /// Mean normalized lecturer lecture spread.
    pub lecturer_spread: f64,
    /// Lecturer workload balance (1 = perfectly even).
    pub workload_balance: f64,
    /// Weighted total (higher is better).
    pub total: f64,
}

impl SoftScore {
    fn from_components(
        student: [f64; 3],
        lecturer: [f64; 3],
        workload_balance: f64,
    ) -> Self {
        let [sf, si, ss] = student;
        let [lf, li, ls] = lecturer;
        let total = 0.2 * sf
            + 0.2 * (1.0 - si)
            + 0.2 * (1.0 - ss)
            + 0.1 * (1.0 - lf)
            + 0.1 * (1.0 - li)
            + 0.1 * (1.0 - ls)
            + 0.1 * workload_balance;
        Self {
            student_fatigue: sf,
            student_idle: si,
            student_spread: ss,
            lecturer_fatigue: lf,
            lecturer_idle: li,
            lecturer_spread: ls,
            workload_balance,
            total,
        }
    }
}

/// Computes the soft score of a timetable.
///
/// # Errors
/// Same contract errors as [`hard_violations`](super::hard_violations).
pub fn soft_score(problem: &Problem, timetable: &Timetable) -> Result<SoftScore> {
    timetable.check(problem)?;

    let mut group_slots: Vec<Vec<usize>> = vec![Vec::new(); problem.groups().len()];
    let mut lecturer_slots: Vec<Vec<usize>> = vec![Vec::new(); problem.lecturers().len()];
    let mut workload = vec![0u64; problem.lecturers().len()];

    // Placements come out in slot order, so every list is already sorted.
    for p in timetable.placements() {
        for &g in problem.groups_of(p.activity) {
            group_slots[g].push(p.slot);
        }
        let teacher = problem.teacher_of(p.activity);
        lecturer_slots[teacher].push(p.slot);
        workload[teacher] += u64::from(problem.activity(p.activity).duration);
    }

    let slot_count = timetable.slot_count();
    let student = kind_metrics(&group_slots, slot_count);
    let lecturer = kind_metrics(&lecturer_slots, slot_count);

    let active: Vec<f64> = workload
        .iter()
        .zip(&lecturer_slots)
        .filter(|(_, slots)| !slots.is_empty())
        .map(|(&w, _)| w as f64)
        .collect();

    Ok(SoftScore::from_components(
        student,
        lecturer,
        workload_balance(&active),
    ))
}

/// Normalized mean fatigue, idle and spread over one entity kind.
fn kind_metrics(slots: &[Vec<usize>], slot_count: usize) -> [f64; 3] {
    let fatigue: Vec<f64> = slots.iter().map(|s| s.len() as f64).collect();
    let idle: Vec<f64> = slots.iter().map(|s| idle_time(s, slot_count)).collect();
    let spread: Vec<f64> = fatigue.iter().map(|f| f * 2.0).collect();
    [
        normalized_mean(&fatigue),
        normalized_mean(&idle),
        normalized_mean(&spread),
    ]
}

/// Empty periods between consecutive sorted slot indices, over `slots - 1`.
///
/// Two occurrences in the same slot contribute no idle time.
fn idle_time(sorted: &[usize], slot_count: usize) -> f64 {
    if slot_count <= 1 {
        return 0.0;
    }
    let gaps: usize = sorted
        .windows(2)
        .map(|w| (w[1] - w[0]).saturating_sub(1))
        .sum();
    gaps as f64 / (slot_count - 1) as f64
}

/// Divides by the maximum and averages. 0 for an empty kind or zero maximum.
fn normalized_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let max = values.iter().copied().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return 0.0;
    }
    values.iter().map(|v| v / max).sum::<f64>() / values.len() as f64
}

/// `max(0, 1 - variance / mean)` with population variance.
fn workload_balance(workload: &[f64]) -> f64 {
    if workload.len() <= 1 {
        return 1.0;
    }
    let n = workload.len() as f64;
    let mean = workload.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 1.0;
    }
    let var = workload.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / n;
    (1.0 - var / mean).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Group, Lecturer, Room, SlotCalendar};

    fn problem() -> Problem {
        Problem::new(
            vec![
                Activity::new("A1", "CS101", "T1").with_group("G1"),
                Activity::new("A2", "CS102", "T1").with_group("G1"),
                Activity::new("A3", "CS103", "T2").with_group("G2"),
            ],
            vec![Group::new("G1", 20), Group::new("G2", 20)],
            vec![Room::new("R1", 40), Room::new("R2", 40)],
            vec![Lecturer::new("T1", "Ada", "CS"), Lecturer::new("T2", "Alan", "CS")],
            SlotCalendar::weekly(1, 5),
        )
        .unwrap()
    }

    #[test]
    fn test_idle_time() {
        assert_eq!(idle_time(&[], 5), 0.0);
        assert_eq!(idle_time(&[0, 1, 2], 5), 0.0);
        assert!((idle_time(&[0, 4], 5) - 0.75).abs() < 1e-12);
        assert_eq!(idle_time(&[2, 2], 5), 0.0);
        assert_eq!(idle_time(&[0, 3], 1), 0.0);
    }

    #[test]
    fn test_normalized_mean() {
        assert_eq!(normalized_mean(&[]), 0.0);
        assert_eq!(normalized_mean(&[0.0, 0.0]), 0.0);
        assert!((normalized_mean(&[2.0, 1.0]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_workload_balance() {
        assert_eq!(workload_balance(&[]), 1.0);
        assert_eq!(workload_balance(&[3.0]), 1.0);
        assert_eq!(workload_balance(&[2.0, 2.0]), 1.0);
        // mean 2, var 1 → 0.5
        assert!((workload_balance(&[1.0, 3.0]) - 0.5).abs() < 1e-12);
        assert_eq!(workload_balance(&[0.0, 10.0]), 0.0);
    }

    #[test]
    fn test_empty_timetable() {
        let p = problem();
        let s = soft_score(&p, &Timetable::for_problem(&p)).unwrap();
        assert_eq!(s.student_fatigue, 0.0);
        assert_eq!(s.workload_balance, 1.0);
        // 0.2·0 + 0.2 + 0.2 + 0.1 + 0.1 + 0.1 + 0.1
        assert!((s.total - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_components() {
        let p = problem();
        let mut t = Timetable::for_problem(&p);
        t.set(0, 0, Some(0)); // G1, T1 at slot 0
        t.set(3, 0, Some(1)); // G1, T1 at slot 3
        t.set(0, 1, Some(2)); // G2, T2 at slot 0
        let s = soft_score(&p, &t).unwrap();

        // fatigue G1=2, G2=1 → (1 + 0.5) / 2
        assert!((s.student_fatigue - 0.75).abs() < 1e-12);
        // idle G1 = 2/4, G2 = 0 → normalized (1 + 0) / 2
        assert!((s.student_idle - 0.5).abs() < 1e-12);
        assert!((s.student_spread - 0.75).abs() < 1e-12);
        assert!((s.lecturer_fatigue - 0.75).abs() < 1e-12);
        // workload T1=2, T2=1: mean 1.5, var 0.25
        assert!((s.workload_balance - (1.0 - 0.25 / 1.5)).abs() < 1e-12);
        assert!(s.total > 0.0 && s.total <= 1.0);
    }
}
