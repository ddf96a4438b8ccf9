//! Infrastructure layer - state assembly and background tasks.

pub mod state;
