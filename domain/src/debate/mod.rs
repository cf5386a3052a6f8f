//! Debate domain
//!
//! A debate runs an optional planner, `R` rounds among the debaters and an
//! optional judge. The [`session::DebateSession`] aggregate enforces the
//! [`phase::DebatePhase`] state machine and owns the transcript; routing of
//! recipients is a pure function of phase, sender and roster.

pub mod event;
pub mod message;
pub mod phase;
pub mod roster;
pub mod routing;
pub mod session;
pub mod transcript;
