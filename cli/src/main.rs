//! CLI entrypoint for model-debate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use debate_application::{CallerId, DebateProgressNotifier, DebateService, NoProgress};
use debate_domain::DebatePhase;
use debate_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, FileToolBackendConfig, JsonlTranscriptStore,
    RoutingAgentAdapter, ToolStack,
};
use debate_presentation::{
    Cli, ConsoleFormatter, EventFormatter, JsonlFormatter, OutputFormat, ProgressReporter,
    SimpleProgress,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Exit status when the user interrupted the debate.
const EXIT_STOPPED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        for line in ConfigLoader::describe_sources() {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let topic = match &cli.topic {
        Some(topic) => topic.clone(),
        None => bail!("A debate topic is required. See --help."),
    };

    // === Configuration ===
    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    apply_cli_overrides(&cli, &mut file_config);
    let config = file_config.to_debate_config()?;

    let format = cli.format.unwrap_or(match file_config.output.format {
        FileOutputFormat::Pretty => OutputFormat::Pretty,
        FileOutputFormat::Jsonl => OutputFormat::Jsonl,
    });
    if cli.no_color || !file_config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let tools = ToolStack::start(&file_config.tools.backends).await;
    match tools.backend_names() {
        names if names.is_empty() => info!("No tool backends, using placeholder results"),
        names => info!("Tool backends: {}", names.join(", ")),
    }
    let agents = Arc::new(RoutingAgentAdapter::from_config(&file_config));

    let bars = (!cli.quiet && format == OutputFormat::Pretty)
        .then(|| Arc::new(ProgressReporter::new()));
    let progress: Arc<dyn DebateProgressNotifier> = match (&bars, cli.quiet) {
        (Some(bars), _) => bars.clone(),
        (None, true) => Arc::new(NoProgress),
        (None, false) => Arc::new(SimpleProgress),
    };

    let mut service = DebateService::new(agents, tools.router(), config).with_progress(progress);
    if let Some(dir) = cli
        .transcript_dir
        .clone()
        .or_else(|| file_config.output.transcript_dir.clone())
    {
        info!("Writing transcripts to {}", dir.display());
        service = service.with_transcript_store(Arc::new(JsonlTranscriptStore::new(dir)));
    }

    let formatter: Box<dyn EventFormatter> = match format {
        OutputFormat::Pretty => Box::new(ConsoleFormatter),
        OutputFormat::Jsonl => Box::new(JsonlFormatter),
    };
    let print = |text: &str| match &bars {
        Some(bars) => bars.suspend(|| println!("{}", text)),
        None => println!("{}", text),
    };

    // === Run ===
    let caller = CallerId::new("cli");
    let id = service.start(&caller, cli.start_request(&topic))?;
    let overview = service.overview(&id)?;
    info!("Session {} started", overview.id);
    if let Some(header) =
        formatter.format_header(&overview.topic, &overview.roster, overview.round_count)
    {
        print(&header);
    }

    let mut stream = service.subscribe(&id)?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut stopping = false;
    loop {
        tokio::select! {
            event = stream.next_event() => match event {
                Some(event) => print(&formatter.format_event(&event)),
                None => break,
            },
            signal = &mut ctrl_c, if !stopping => {
                if let Err(e) = signal {
                    warn!("Could not listen for Ctrl-C: {}", e);
                }
                stopping = true;
                service.stop(&id)?;
            }
        }
    }

    let summary = service.wait(&id).await;
    tools.shutdown().await;
    let summary = summary?;
    if let Some(text) = formatter.format_summary(&summary) {
        print(&text);
    }

    Ok(if summary.stopped {
        ExitCode::from(EXIT_STOPPED)
    } else if summary.final_phase == DebatePhase::Completed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Install the tracing subscriber: `-v` count picks the level, `RUST_LOG`
/// overrides it, `--log-file` moves output off stderr.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Flags that override the file configuration. Session-level flags
/// (rounds, participants, planner, judge) travel in the start request.
fn apply_cli_overrides(cli: &Cli, file: &mut FileConfig) {
    let debate = &mut file.debate;
    if let Some(budget) = cli.tool_budget {
        debate.tool_budget_per_round = budget;
    }
    if cli.sequential {
        debate.parallel_round_dispatch = false;
    }
    if cli.unbarriered {
        debate.barriered_rounds = false;
    }
    if cli.abort_on_failure {
        debate.on_turn_failure = "abort".to_string();
    }
    if let Some(secs) = cli.turn_timeout {
        debate.turn_timeout_secs = secs;
    }
    if !cli.tool_backends.is_empty() {
        file.tools.backends = cli
            .tool_backends
            .iter()
            .filter_map(|line| parse_backend(line))
            .collect();
    }
}

/// `local-stub`, or a command line split on whitespace.
fn parse_backend(line: &str) -> Option<FileToolBackendConfig> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_string();
    Some(FileToolBackendConfig {
        command,
        args: parts.map(String::from).collect(),
        ..Default::default()
    })
}
