//! Core domain concepts shared across all subdomains.
//!
//! - [`agent::AgentId`] / [`agent::AgentRole`]: who speaks, and in which capacity
//! - [`topic::Topic`]: a validated debate topic
//! - [`session_id::SessionId`]: identity of one debate session
//! - [`error::DomainError`]: domain-level errors

pub mod agent;
pub mod error;
pub mod session_id;
pub mod string;
pub mod topic;
