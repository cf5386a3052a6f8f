//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod debate_service;
pub mod run_debate;
