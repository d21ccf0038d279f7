//! BDD step definitions for farmwatch

pub mod condition_steps;
pub mod forecast_steps;
pub mod state_steps;
