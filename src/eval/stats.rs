//! Population-wide violation statistics.

use super::{HardViolations, Individual};
use serde::{Deserialize, Serialize};

/// Severity buckets by conflict total (vacant rooms excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// 0 conflicts.
    pub none: usize,
    /// 1 to 5 conflicts.
    pub minor: usize,
    /// 6 to 20 conflicts.
    pub moderate: usize,
    /// More than 20 conflicts.
    pub severe: usize,
}

impl SeverityCounts {
    fn record(&mut self, conflicts: usize) {
        match conflicts {
            0 => self.none += 1,
            1..=5 => self.minor += 1,
            6..=20 => self.moderate += 1,
            _ => self.severe += 1,
        }
    }
}

/// Mean value of each violation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationAverages {
    pub vacant_rooms: f64,
    pub teacher_conflicts: f64,
    pub group_conflicts: f64,
    pub capacity_violations: f64,
    pub unassigned: f64,
}

/// Violation summary over a population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationStatistics {
    /// Number of individuals summarised.
    pub count: usize,
    /// Per-kind means.
    pub averages: ViolationAverages,
    /// Per-kind maxima.
    pub maxima: HardViolations,
    /// Individuals per severity bucket.
    pub severity: SeverityCounts,
}

impl ViolationStatistics {
    /// Summarises raw violation counts.
    pub fn from_violations<'a>(violations: impl IntoIterator<Item = &'a HardViolations>) -> Self {
        let mut stats = Self::default();
        let mut sums = [0usize; 5];
        for v in violations {
            stats.count += 1;
            let kinds = [
                v.vacant_rooms,
                v.teacher_conflicts,
                v.group_conflicts,
                v.capacity_violations,
                v.unassigned,
            ];
            for (sum, k) in sums.iter_mut().zip(kinds) {
                *sum += k;
            }
            let m = &mut stats.maxima;
            m.vacant_rooms = m.vacant_rooms.max(v.vacant_rooms);
            m.teacher_conflicts = m.teacher_conflicts.max(v.teacher_conflicts);
            m.group_conflicts = m.group_conflicts.max(v.group_conflicts);
            m.capacity_violations = m.capacity_violations.max(v.capacity_violations);
            m.unassigned = m.unassigned.max(v.unassigned);
            stats.severity.record(v.conflicts());
        }
        if stats.count > 0 {
            let n = stats.count as f64;
            stats.averages = ViolationAverages {
                vacant_rooms: sums[0] as f64 / n,
                teacher_conflicts: sums[1] as f64 / n,
                group_conflicts: sums[2] as f64 / n,
                capacity_violations: sums[3] as f64 / n,
                unassigned: sums[4] as f64 / n,
            };
        }
        stats
    }

    /// Summarises an evaluated population.
    pub fn from_population(population: &[Individual]) -> Self {
        Self::from_violations(population.iter().map(|ind| &ind.violations))
    }
}
