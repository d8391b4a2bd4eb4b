//! Constraint evaluation.
//!
//! Two objectives, both minimized:
//!
//! 1. **Weighted hard score**: violation counts ([`HardViolations`]) times
//!    [`ConstraintWeights`]
//! 2. **1 − soft score**: student and lecturer comfort ([`SoftScore`])
//!
//! Evaluation never mutates its input and never fails on a grid that
//! belongs to the problem. A grid with the wrong dimensions or a dangling
//! activity index is a contract violation and yields an error.

mod fitness;
mod hard;
mod soft;
mod stats;
mod violations;

pub use fitness::{best_index, ConstraintWeights, Evaluation, Evaluator, Individual, OBJECTIVES};
pub use hard::{hard_violations, HardViolations};
pub use soft::{soft_score, SoftScore};
pub use stats::{SeverityCounts, ViolationAverages, ViolationStatistics};
pub use violations::{find_violations, ViolationSite};
pub(crate) use violations::violation_sites;
