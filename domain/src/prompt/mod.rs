//! Prompt templates and transcript rendering

pub mod history;
pub mod template;

pub use history::{render_debater_history, render_history};
pub use template::DebatePromptTemplate;
