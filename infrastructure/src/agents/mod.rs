//! Agent adapters
//!
//! - [`OpenAiCompatibleAdapter`]: chat completions over HTTP
//! - [`PlaceholderAdapter`]: canned output, no network
//! - [`TemplatePlannerAdapter`]: deterministic structured plan
//! - [`RoutingAgentAdapter`]: picks one of the above per agent

pub mod openai;
pub mod placeholder;
pub mod routing;
pub mod template_planner;

pub use openai::OpenAiCompatibleAdapter;
pub use placeholder::PlaceholderAdapter;
pub use routing::RoutingAgentAdapter;
pub use template_planner::TemplatePlannerAdapter;
