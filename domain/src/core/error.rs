//! Domain error types

use thiserror::Error;

/// Invalid debate configuration, detected before any phase begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("At least one debater is required")]
    EmptyParticipants,

    #[error("round_count must be at least 1")]
    InvalidRoundCount,

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    #[error("Participant name cannot be empty")]
    EmptyParticipantName,

    #[error("Participant {0} collides with a reserved role name")]
    ReservedParticipantName(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Malformed tool backend list: {0}")]
    MalformedBackends(String),

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
}

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid capability name: {0}")]
    InvalidCapability(String),

    #[error("{agent} cannot speak during {phase}")]
    UnexpectedSpeaker { agent: String, phase: String },

    #[error("Session already ended in {0}")]
    SessionClosed(String),
}
