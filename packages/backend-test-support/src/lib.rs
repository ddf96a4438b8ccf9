//! Shared helpers for ono-backend tests.
//!
//! Logging initialisation, Problem Details assertions and generators for
//! unique room codes and player ids so parallel tests never collide.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
