//! Message bus and event delivery
//!
//! - [`MessageBus`]: sequence allocation, transcript append, recipient routing
//! - [`EventEmitter`]: push to the (single) subscriber
//! - [`EventStream`]: replay + live events for that subscriber

pub mod event_emitter;
pub mod event_stream;
pub mod message_bus;

pub use event_emitter::EventEmitter;
pub use event_stream::EventStream;
pub use message_bus::MessageBus;
