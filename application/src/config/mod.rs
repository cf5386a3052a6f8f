//! Application-level configuration.
//!
//! - [`DebateConfig`]: orchestration policy (roster, rounds, budgets, dispatch)
//! - [`TurnFailurePolicy`] / [`StopPolicy`]: explicit continue-vs-abort switches

pub mod debate_config;

pub use debate_config::{DebateConfig, StopPolicy, TurnFailurePolicy};
