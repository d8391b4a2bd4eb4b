//! Optimizer driver.
//!
//! - [`OptimizerConfig`]: strategy, population, rates, local search,
//!   termination and parallelism
//! - [`Optimizer`]: the generational loop, with cancellation and a
//!   wall-clock limit
//! - [`optimize`]: serializable request in, best timetable and metrics
//!   series out

mod api;
mod config;
mod runner;

pub use api::{optimize, EvaluationSummary, RunOutput, RunRequest};
pub use config::{LocalSearchConfig, OptimizerConfig};
pub use runner::{OptimizationResult, Optimizer};
