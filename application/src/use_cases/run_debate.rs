//! Run Debate use case: the Phase Controller
//!
//! Drives a session through `Idle → Planning? → Round(1..R) → Judgment? →
//! Completed`, with `Failed` on stop or on a turn failure under the abort
//! policy.
//!
//! Turns never touch the transcript. Each turn runs against a snapshot,
//! collects its tool outcomes locally and reports back; the controller then
//! publishes the report through the [`MessageBus`]. In barriered rounds all
//! debaters share the snapshot taken at the start of the round and reports
//! are published in participant order, so parallel and sequential dispatch
//! produce the same transcript.

use crate::bus::MessageBus;
use crate::config::{DebateConfig, StopPolicy, TurnFailurePolicy};
use crate::ports::agent_adapter::{AdapterError, AgentAdapter, AgentReply, ToolExchange, TurnRequest};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::tool_router::ToolRouter;
use debate_domain::{
    AgentId, AgentRole, BudgetTracker, DebateEvent, DebatePhase, DebateRoster, DomainError,
    PhasePlan, QualifiedCapability, RoundBudget, SessionId, ToolOutcome, ToolRequest, Topic,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while driving a debate
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Session state error: {0}")]
    Domain(#[from] DomainError),

    #[error("Debater task failed: {0}")]
    TaskFailed(String),
}

/// Final state of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct DebateSummary {
    pub session_id: SessionId,
    pub final_phase: DebatePhase,
    pub messages: usize,
    pub tool_calls: usize,
    pub failures: usize,
    pub events: usize,
    /// Ended by an explicit stop
    pub stopped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Stopped,
    Aborted,
}

type Flow = Result<(), Halt>;

/// Use case for running one debate session to completion
pub struct RunDebateUseCase {
    agents: Arc<dyn AgentAdapter>,
    tools: Arc<dyn ToolRouter>,
    config: DebateConfig,
    progress: Arc<dyn DebateProgressNotifier>,
}

impl RunDebateUseCase {
    pub fn new(agents: Arc<dyn AgentAdapter>, tools: Arc<dyn ToolRouter>, config: DebateConfig) -> Self {
        Self {
            agents,
            tools,
            config,
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn DebateProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    /// Run the session held by `bus` until it reaches a terminal phase.
    ///
    /// Always leaves the session in `Completed` or `Failed`; the terminal
    /// phase change is the last event on the stream.
    pub async fn execute(
        &self,
        bus: Arc<MessageBus>,
        cancel: CancellationToken,
    ) -> Result<DebateSummary, RunDebateError> {
        let result = self.drive(&bus, &cancel).await;

        let stopped = match &result {
            Ok(Ok(())) => false,
            Ok(Err(halt)) => {
                info!("Debate {} halted: {:?}", bus.session_id(), halt);
                bus.fail();
                *halt == Halt::Stopped
            }
            Err(e) => {
                warn!("Debate {} failed: {}", bus.session_id(), e);
                bus.fail();
                false
            }
        };

        let final_phase = bus.phase();
        self.progress.on_finished(&final_phase);
        if let Err(e) = result {
            return Err(e);
        }
        Ok(summarize(&bus, stopped))
    }

    async fn drive(
        &self,
        bus: &Arc<MessageBus>,
        cancel: &CancellationToken,
    ) -> Result<Flow, RunDebateError> {
        let ctx = self.turn_factory(bus, cancel);
        let roster = ctx.roster.clone();
        let mut budgets = BudgetTracker::new(self.config.tool_budget_per_round);

        info!(
            "Starting debate {} on \"{}\": {} debaters, {} rounds",
            bus.session_id(),
            ctx.topic,
            roster.debaters().len(),
            ctx.plan.round_count
        );

        if cancel.is_cancelled() {
            return Ok(Err(Halt::Stopped));
        }

        if let Some(planner) = roster.planner() {
            bus.transition(DebatePhase::Planning)?;
            let flow = self
                .run_single_turn(bus, &ctx, &mut budgets, planner, AgentRole::Planner, DebatePhase::Planning)
                .await?;
            if flow.is_err() {
                return Ok(flow);
            }
        }

        let flow = if self.config.barriered_rounds {
            self.run_barriered_rounds(bus, &ctx, &mut budgets).await?
        } else {
            self.run_relaxed_rounds(bus, &ctx).await?
        };
        if flow.is_err() {
            return Ok(flow);
        }

        if let Some(judge) = roster.judge() {
            if cancel.is_cancelled() {
                return Ok(Err(Halt::Stopped));
            }
            bus.transition(DebatePhase::Judgment)?;
            let flow = self
                .run_single_turn(bus, &ctx, &mut budgets, judge, AgentRole::Judge, DebatePhase::Judgment)
                .await?;
            if flow.is_err() {
                return Ok(flow);
            }
        }

        bus.transition(DebatePhase::Completed)?;
        info!("Debate {} completed", bus.session_id());
        Ok(Ok(()))
    }

    fn turn_factory(&self, bus: &MessageBus, cancel: &CancellationToken) -> TurnFactory {
        let round_count = bus.round_count();
        let roster = bus.roster();
        TurnFactory {
            agents: Arc::clone(&self.agents),
            tools: Arc::clone(&self.tools),
            progress: Arc::clone(&self.progress),
            topic: bus.topic(),
            plan: roster.phase_plan(round_count),
            roster,
            capabilities: Arc::new(self.tools.capabilities()),
            max_tool_steps: self.config.max_tool_steps,
            turn_timeout: self.config.turn_timeout,
            cancel: cancel.clone(),
        }
    }

    // ==================== Phases ====================

    /// Planner or judge: one turn, same runner as debaters.
    async fn run_single_turn(
        &self,
        bus: &MessageBus,
        ctx: &TurnFactory,
        budgets: &mut BudgetTracker,
        agent: &AgentId,
        role: AgentRole,
        phase: DebatePhase,
    ) -> Result<Flow, RunDebateError> {
        info!("{}: {}", phase, agent);
        self.progress.on_phase_start(&phase, 1);
        let round = ctx.round_of(phase);
        let turn = ctx.turn(agent, role, phase, bus.snapshot(), budgets.open(agent, round));
        let flow = self.dispatch_sequential(bus, ctx, budgets, vec![turn]).await?;
        self.progress.on_phase_complete(&phase);
        Ok(flow)
    }

    async fn run_barriered_rounds(
        &self,
        bus: &MessageBus,
        ctx: &TurnFactory,
        budgets: &mut BudgetTracker,
    ) -> Result<Flow, RunDebateError> {
        for round in 1..=ctx.plan.round_count {
            if ctx.cancel.is_cancelled() {
                return Ok(Err(Halt::Stopped));
            }
            let phase = DebatePhase::Round(round);
            bus.transition(phase)?;

            let debaters = ctx.roster.debaters();
            info!("{}: {} debaters", phase, debaters.len());
            self.progress.on_phase_start(&phase, debaters.len());

            // Barrier: every turn of this round sees the same transcript
            let snapshot = bus.snapshot();
            let turns: Vec<Turn> = debaters
                .iter()
                .map(|agent| {
                    let budget = budgets.open(agent, round as i32);
                    ctx.turn(agent, AgentRole::Debater, phase, Arc::clone(&snapshot), budget)
                })
                .collect();

            let flow = if self.config.parallel_round_dispatch {
                self.dispatch_parallel(bus, ctx, budgets, phase, turns).await?
            } else {
                self.dispatch_sequential(bus, ctx, budgets, turns).await?
            };

            self.progress.on_phase_complete(&phase);
            budgets.end_round(round as i32);
            if flow.is_err() {
                return Ok(flow);
            }
        }
        Ok(Ok(()))
    }

    /// Debaters advance independently; each publishes as soon as its turn ends.
    async fn run_relaxed_rounds(
        &self,
        bus: &Arc<MessageBus>,
        ctx: &TurnFactory,
    ) -> Result<Flow, RunDebateError> {
        if !self.config.parallel_round_dispatch {
            warn!("parallel_round_dispatch=false has no effect without barriered rounds");
        }

        let mut join_set = JoinSet::new();
        for agent in ctx.roster.debaters() {
            let worker = RelaxedDebater {
                agent: agent.clone(),
                bus: Arc::clone(bus),
                factory: ctx.clone(),
                ceiling: self.config.tool_budget_per_round,
                abort_on_failure: self.config.on_turn_failure == TurnFailurePolicy::Abort,
            };
            join_set.spawn(worker.run());
        }

        let mut flow: Flow = Ok(());
        loop {
            let next = match self.config.on_stop {
                StopPolicy::Abandon => tokio::select! {
                    biased;
                    _ = ctx.cancel.cancelled() => {
                        join_set.abort_all();
                        return Ok(Err(Halt::Stopped));
                    }
                    next = join_set.join_next() => next,
                },
                StopPolicy::Drain => join_set.join_next().await,
            };

            match next {
                None => break,
                Some(Ok(Ok(Ok(())))) => {}
                Some(Ok(Ok(Err(Halt::Aborted)))) => {
                    join_set.abort_all();
                    return Ok(Err(Halt::Aborted));
                }
                Some(Ok(Ok(Err(Halt::Stopped)))) => flow = Err(Halt::Stopped),
                Some(Ok(Err(e))) => {
                    join_set.abort_all();
                    return Err(e.into());
                }
                Some(Err(join_err)) => {
                    join_set.abort_all();
                    return Err(RunDebateError::TaskFailed(join_err.to_string()));
                }
            }
        }

        if ctx.cancel.is_cancelled() {
            return Ok(Err(Halt::Stopped));
        }
        Ok(flow)
    }

    // ==================== Dispatch ====================

    /// Run turns one after another in participant order.
    async fn dispatch_sequential(
        &self,
        bus: &MessageBus,
        ctx: &TurnFactory,
        budgets: &mut BudgetTracker,
        turns: Vec<Turn>,
    ) -> Result<Flow, RunDebateError> {
        for turn in turns {
            if ctx.cancel.is_cancelled() {
                return Ok(Err(Halt::Stopped));
            }
            let report = match self.config.on_stop {
                StopPolicy::Abandon => tokio::select! {
                    biased;
                    _ = ctx.cancel.cancelled() => return Ok(Err(Halt::Stopped)),
                    report = turn.run() => report,
                },
                StopPolicy::Drain => turn.run().await,
            };

            let (succeeded, budget) = publish_report(bus, self.progress.as_ref(), report)?;
            budgets.close(budget);
            if !succeeded && self.config.on_turn_failure == TurnFailurePolicy::Abort {
                return Ok(Err(Halt::Aborted));
            }
        }
        Ok(Ok(()))
    }

    /// Run turns concurrently, then publish the reports in participant order.
    async fn dispatch_parallel(
        &self,
        bus: &MessageBus,
        ctx: &TurnFactory,
        budgets: &mut BudgetTracker,
        phase: DebatePhase,
        turns: Vec<Turn>,
    ) -> Result<Flow, RunDebateError> {
        let agents: Vec<AgentId> = turns.iter().map(|t| t.request.agent.clone()).collect();
        let mut reports: Vec<Option<Result<TurnReport, String>>> =
            (0..turns.len()).map(|_| None).collect();
        let mut slots = HashMap::new();

        let mut join_set = JoinSet::new();
        for (index, turn) in turns.into_iter().enumerate() {
            let handle = join_set.spawn(async move { (index, turn.run().await) });
            slots.insert(handle.id(), index);
        }

        loop {
            let next = match self.config.on_stop {
                StopPolicy::Abandon => tokio::select! {
                    biased;
                    _ = ctx.cancel.cancelled() => {
                        join_set.abort_all();
                        return Ok(Err(Halt::Stopped));
                    }
                    next = join_set.join_next_with_id() => next,
                },
                StopPolicy::Drain => join_set.join_next_with_id().await,
            };

            match next {
                None => break,
                Some(Ok((_, (index, report)))) => {
                    debug!("{} finished {} (slot {})", report.agent, phase, index);
                    reports[index] = Some(Ok(report));
                }
                Some(Err(join_err)) => {
                    warn!("Turn task failed in {}: {}", phase, join_err);
                    if let Some(&index) = slots.get(&join_err.id()) {
                        reports[index] = Some(Err(join_err.to_string()));
                    }
                }
            }
        }

        for (index, slot) in reports.into_iter().enumerate() {
            let succeeded = match slot {
                Some(Ok(report)) => {
                    let (succeeded, budget) = publish_report(bus, self.progress.as_ref(), report)?;
                    budgets.close(budget);
                    succeeded
                }
                Some(Err(reason)) => {
                    let agent = agents[index].clone();
                    bus.publish_failure(phase, agent.clone(), format!("turn task failed: {}", reason))?;
                    self.progress.on_turn_complete(&phase, &agent, false);
                    false
                }
                None => {
                    let agent = agents[index].clone();
                    bus.publish_failure(phase, agent.clone(), "turn produced no report".to_string())?;
                    self.progress.on_turn_complete(&phase, &agent, false);
                    false
                }
            };
            if !succeeded && self.config.on_turn_failure == TurnFailurePolicy::Abort {
                return Ok(Err(Halt::Aborted));
            }
        }
        Ok(Ok(()))
    }
}

/// Publish a turn's tool calls, then its message or failure marker.
///
/// Returns whether the turn succeeded, and hands the budget back.
fn publish_report(
    bus: &MessageBus,
    progress: &dyn DebateProgressNotifier,
    report: TurnReport,
) -> Result<(bool, RoundBudget), DomainError> {
    let TurnReport {
        agent,
        phase,
        exchanges,
        result,
        budget,
    } = report;

    for exchange in exchanges {
        bus.publish_tool_call(
            phase,
            agent.clone(),
            exchange.request.capability,
            exchange.request.arguments,
            exchange.outcome,
        )?;
    }

    let succeeded = match result {
        Ok(reply) => {
            bus.publish_message(phase, agent.clone(), reply.content, reply.status)?;
            true
        }
        Err(e) => {
            warn!("{} failed during {}: {}", agent, phase, e);
            bus.publish_failure(phase, agent.clone(), e.to_string())?;
            false
        }
    };
    progress.on_turn_complete(&phase, &agent, succeeded);
    Ok((succeeded, budget))
}

fn summarize(bus: &MessageBus, stopped: bool) -> DebateSummary {
    bus.with_session(|s| DebateSummary {
        session_id: s.id().clone(),
        final_phase: s.phase(),
        messages: s.messages().count(),
        tool_calls: s.tool_calls().count(),
        failures: s.failures().count(),
        events: s.transcript().len(),
        stopped,
    })
}

// ==================== Turns ====================

/// Everything needed to build turns for one session.
#[derive(Clone)]
struct TurnFactory {
    agents: Arc<dyn AgentAdapter>,
    tools: Arc<dyn ToolRouter>,
    progress: Arc<dyn DebateProgressNotifier>,
    topic: Topic,
    roster: DebateRoster,
    plan: PhasePlan,
    capabilities: Arc<Vec<QualifiedCapability>>,
    max_tool_steps: usize,
    turn_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl TurnFactory {
    fn round_of(&self, phase: DebatePhase) -> i32 {
        phase.round_index(&self.plan).unwrap_or(0)
    }

    fn turn(
        &self,
        agent: &AgentId,
        role: AgentRole,
        phase: DebatePhase,
        snapshot: Arc<Vec<DebateEvent>>,
        budget: RoundBudget,
    ) -> Turn {
        Turn {
            adapter: Arc::clone(&self.agents),
            tools: Arc::clone(&self.tools),
            progress: Arc::clone(&self.progress),
            request: TurnRequest {
                topic: self.topic.clone(),
                agent: agent.clone(),
                role,
                phase,
                round: self.round_of(phase),
                roster: self.roster.clone(),
                transcript: snapshot,
                remaining_budget: budget.remaining(),
                capabilities: Arc::clone(&self.capabilities),
                tool_results: Vec::new(),
            },
            budget,
            max_tool_steps: self.max_tool_steps,
            turn_timeout: self.turn_timeout,
            cancel: self.cancel.clone(),
        }
    }
}

/// Outcome of one turn, before publication.
struct TurnReport {
    agent: AgentId,
    phase: DebatePhase,
    exchanges: Vec<ToolExchange>,
    result: Result<AgentReply, AdapterError>,
    budget: RoundBudget,
}

/// One agent turn: invoke the adapter, resolve its tool requests against the
/// budget, re-invoke with the results, until it answers without requests.
struct Turn {
    adapter: Arc<dyn AgentAdapter>,
    tools: Arc<dyn ToolRouter>,
    progress: Arc<dyn DebateProgressNotifier>,
    request: TurnRequest,
    budget: RoundBudget,
    max_tool_steps: usize,
    turn_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl Turn {
    async fn run(mut self) -> TurnReport {
        let mut exchanges: Vec<ToolExchange> = Vec::new();
        let mut steps = 0;

        let result = loop {
            self.request.remaining_budget = self.budget.remaining();
            self.request.tool_results = exchanges.clone();

            let reply = match self.generate().await {
                Ok(reply) => reply,
                Err(e) => break Err(e),
            };
            if reply.tool_requests.is_empty() {
                break Ok(reply);
            }
            if steps >= self.max_tool_steps {
                warn!(
                    "{} still requesting tools after {} steps, ignoring {} requests",
                    self.request.agent,
                    steps,
                    reply.tool_requests.len()
                );
                break Ok(reply);
            }
            steps += 1;

            let mut halted = false;
            for request in &reply.tool_requests {
                // No budget is reserved once the session is stopping
                if self.cancel.is_cancelled() {
                    halted = true;
                    break;
                }
                let outcome = self.resolve(request).await;
                self.progress
                    .on_tool_call(&self.request.agent, &request.capability, &outcome);
                exchanges.push(ToolExchange {
                    request: request.clone(),
                    outcome,
                });
            }
            if halted {
                break Ok(reply);
            }
        };

        TurnReport {
            agent: self.request.agent.clone(),
            phase: self.request.phase,
            exchanges,
            result,
            budget: self.budget,
        }
    }

    async fn generate(&self) -> Result<AgentReply, AdapterError> {
        let call = self.adapter.generate(&self.request);
        let reply = match self.turn_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AdapterError::Timeout)??,
            None => call.await?,
        };

        if let (Some(hint), Some(expected)) = (reply.kind, self.request.expected_kind()) {
            if hint != expected {
                debug!(
                    "{} suggested kind {} during {}, using {}",
                    self.request.agent, hint, self.request.phase, expected
                );
            }
        }
        Ok(reply)
    }

    async fn resolve(&mut self, request: &ToolRequest) -> ToolOutcome {
        if !self.budget.reserve() {
            debug!(
                "{} over tool budget in {}, rejecting {}",
                self.request.agent, self.request.phase, request.capability
            );
            return ToolOutcome::BudgetExceeded {
                ceiling: self.budget.ceiling(),
            };
        }
        debug!("{} -> {}", self.request.agent, request.capability);
        self.tools
            .invoke(&request.capability, &request.arguments)
            .await
            .into()
    }
}

/// A debater running all of its rounds on its own (non-barriered mode).
struct RelaxedDebater {
    agent: AgentId,
    bus: Arc<MessageBus>,
    factory: TurnFactory,
    ceiling: u32,
    abort_on_failure: bool,
}

impl RelaxedDebater {
    async fn run(self) -> Result<Flow, DomainError> {
        for round in 1..=self.factory.plan.round_count {
            if self.factory.cancel.is_cancelled() {
                return Ok(Err(Halt::Stopped));
            }
            let phase = DebatePhase::Round(round);
            if self.bus.advance_to_round(round)?.is_some() {
                self.factory
                    .progress
                    .on_phase_start(&phase, self.factory.roster.debaters().len());
            }

            let budget = RoundBudget::new(self.agent.clone(), round as i32, self.ceiling);
            let turn = self.factory.turn(
                &self.agent,
                AgentRole::Debater,
                phase,
                self.bus.snapshot(),
                budget,
            );
            let report = turn.run().await;
            let (succeeded, _) =
                publish_report(&self.bus, self.factory.progress.as_ref(), report)?;
            if !succeeded && self.abort_on_failure {
                return Ok(Err(Halt::Aborted));
            }
        }
        Ok(Ok(()))
    }
}
