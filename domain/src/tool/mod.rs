//! Tool domain
//!
//! Agents may request auxiliary tool calls during a turn. Capabilities are
//! addressed as `<backend>:<capability>`; every request, accepted or not,
//! leaves a record in the transcript.

pub mod capability;
pub mod value_objects;
