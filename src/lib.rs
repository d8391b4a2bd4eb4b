//! Multi-objective university timetabling.
//!
//! Places teaching activities into a (slot × room) grid while minimizing
//! two objectives: a weighted count of hard violations (lecturer and
//! subgroup double-booking, room capacity, unplaced activities, idle
//! rooms) and the complement of a soft comfort score (fatigue, idle gaps,
//! spread, workload balance).
//!
//! - **Domain model** ([`models`]): activities, groups, rooms, lecturers,
//!   the slot calendar and the timetable grid with its document form.
//! - **Evaluation** ([`eval`]): hard violation counts, soft score,
//!   two-objective fitness and population statistics.
//! - **Variation** ([`ga`]): constrained greedy initialization, slot
//!   crossover, repair-guided and random mutation.
//! - **Selection** ([`moo`]): NSGA-II, MOEA/D and SPEA2 behind one
//!   [`Selector`](moo::Selector) trait.
//! - **Indicators** ([`indicators`]): Pareto front, hypervolume, spacing,
//!   IGD and a per-generation metrics tracker.
//! - **Driver** ([`optimizer`]): configuration, the generational loop with
//!   cancellation and time limit, and the serializable [`optimize`]
//!   entry point.
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{Activity, Group, Lecturer, Problem, Room, SlotCalendar};
//! use u_timetable::optimizer::{Optimizer, OptimizerConfig};
//!
//! let problem = Problem::new(
//!     vec![
//!         Activity::new("A1", "Algorithms", "T1").with_group("G1"),
//!         Activity::new("A2", "Databases", "T1").with_group("G1"),
//!     ],
//!     vec![Group::new("G1", 30)],
//!     vec![Room::new("R1", 40)],
//!     vec![Lecturer::new("T1", "Han", "CS")],
//!     SlotCalendar::weekly(1, 2),
//! )
//! .unwrap();
//!
//! let config = OptimizerConfig::fast().with_seed(1).with_parallel(false);
//! let result = Optimizer::run(&problem, &config).unwrap();
//! assert!(result.best.violations.is_feasible());
//! ```

pub mod error;
pub mod eval;
pub mod ga;
pub mod indicators;
pub mod models;
pub mod moo;
pub mod optimizer;
pub mod random;
pub mod validation;

pub use error::{Result, TimetableError};
pub use optimizer::{optimize, RunOutput, RunRequest};
