//! CLI command definitions

use clap::{Parser, ValueEnum};
use debate_application::StartRequest;
use std::path::PathBuf;

/// How events are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable transcript
    Pretty,
    /// One JSON event per line
    Jsonl,
}

/// CLI arguments for model-debate
#[derive(Parser, Debug)]
#[command(name = "model-debate")]
#[command(author, version, about = "Multi-agent debate orchestrator")]
#[command(long_about = r#"
model-debate runs a structured debate between several agents on a topic.

The session moves through fixed phases:
1. Planning (optional): a planner briefs every debater
2. Rounds: every debater argues, then rebuts, for N barriered rounds
3. Judgment (optional): a judge reads the transcript and concludes

Configuration files are loaded from (lowest to highest priority):
1. ~/.config/model-debate/config.toml   Global config
2. ./debate.toml or ./.debate.toml      Project-level config
3. --config <path>                      Explicit config file
4. DEBATE_* environment variables       e.g. DEBATE_DEBATE__ROUND_COUNT=2
5. Command-line flags

Example:
  model-debate "Should cities ban cars from downtown?"
  model-debate -r 2 -p OpenAI,Claude --no-planner "Is remote work here to stay?"
  model-debate --format jsonl --tool-backend local-stub "Will fusion power be commercial by 2040?"
"#)]
pub struct Cli {
    /// The debate topic
    pub topic: Option<String>,

    /// Number of debate rounds
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Debaters, in turn order (comma-separated or repeated)
    #[arg(short, long = "participant", value_name = "NAME", value_delimiter = ',')]
    pub participants: Vec<String>,

    /// Skip the planning phase
    #[arg(long)]
    pub no_planner: bool,

    /// Skip the judgment phase
    #[arg(long)]
    pub no_judge: bool,

    /// Tool calls each agent may make per round
    #[arg(long, value_name = "N")]
    pub tool_budget: Option<u32>,

    /// Tool backend command line (repeatable); `local-stub` is built in
    #[arg(long = "tool-backend", value_name = "COMMAND")]
    pub tool_backends: Vec<String>,

    /// Run debater turns one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Let debaters advance through rounds independently
    #[arg(long)]
    pub unbarriered: bool,

    /// End the session on the first failed turn
    #[arg(long)]
    pub abort_on_failure: bool,

    /// Seconds allowed per adapter call (0 disables the limit)
    #[arg(long, value_name = "SECS")]
    pub turn_timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write each session's events to <DIR>/<session_id>.jsonl
    #[arg(long, value_name = "DIR")]
    pub transcript_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Session-level overrides for the debate service.
    pub fn start_request(&self, topic: &str) -> StartRequest {
        let mut request = StartRequest::new(topic);
        if let Some(rounds) = self.rounds {
            request = request.with_round_count(rounds);
        }
        if !self.participants.is_empty() {
            request = request.with_participants(
                self.participants
                    .iter()
                    .map(|p| p.trim())
                    .filter(|p| !p.is_empty())
                    .map(String::from),
            );
        }
        if self.no_planner {
            request = request.with_planner(false);
        }
        if self.no_judge {
            request = request.with_judge(false);
        }
        request
    }
}
