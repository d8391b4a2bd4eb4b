//! Genetic operators over timetable grids.
//!
//! # Initialization
//!
//! - [`initialize_population`]: constrained greedy placement, one derived
//!   RNG per individual, optionally in parallel
//!
//! # Variation
//!
//! - [`crossover`]: one-point crossover at slot granularity
//! - [`mutate`]: repair-guided (default 80%) or random swap mutation
//! - [`Variation`]: crossover + mutation pipeline used by every selector
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"
//! - Lewis (2008), "A survey of metaheuristic-based techniques for
//!   University Timetabling problems"

mod init;
mod operators;

pub use init::{
    initialize_population, initialize_timetable, oversized_activities, place_occurrence,
    placement_order, slot_is_free, suitable_rooms,
};
pub use operators::{
    crossover, mutate, place_unassigned, random_mutation, repair_mutation, repair_step, Variation,
};
