//! Autonomous agent runtime
//!
//! Architecture: Strategy + State Machine - Agents own the loop, behaviors own the domain work
//! - AgentBehavior is the seam for specialised agents: decomposition and task execution
//! - AutonomousAgent advances one state per tick so it can run on tokio or be stepped synchronously
//! - Knowledge is shared between collaborators over unbounded channels

pub mod orchestrator;
pub mod workforce;

use crate::config::AgentSettings;
use crate::domain::{
    AgentGoal, AgentKind, AgentMetrics, AgentPriority, AgentState, AgentTask, Knowledge,
    ShowcaseError, ShowcaseResult, TaskOutcome, TaskQueue, DEFAULT_MAX_RETRIES,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, error, info, warn};

pub use orchestrator::{AgentOrchestrator, FleetStatus};
pub use workforce::{ExecutiveReport, Recommendation, RoiReport, Workforce};

/// Domain logic plugged into an autonomous agent
pub trait AgentBehavior: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Break a goal into queued work
    fn decompose(&self, goal: &AgentGoal) -> ShowcaseResult<Vec<AgentTask>>;

    /// Run a single task
    fn execute(&self, task: &AgentTask, rng: &mut dyn RngCore) -> ShowcaseResult<TaskOutcome>;
}

/// Rule-based behavior used when no specialist applies
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralBehavior;

impl AgentBehavior for GeneralBehavior {
    fn kind(&self) -> AgentKind {
        AgentKind::General
    }

    fn decompose(&self, goal: &AgentGoal) -> ShowcaseResult<Vec<AgentTask>> {
        if !goal.description.to_lowercase().contains("optimize") {
            return Ok(Vec::new());
        }

        Ok(vec![
            AgentTask::new("analyze_current_state")
                .for_goal(goal)
                .with_param("target", "performance_metrics")
                .with_priority(AgentPriority::High),
            AgentTask::new("identify_bottlenecks")
                .for_goal(goal)
                .with_param("threshold", 0.7)
                .with_priority(AgentPriority::High),
            AgentTask::new("implement_optimizations")
                .for_goal(goal)
                .with_param("auto_approve", true)
                .with_priority(AgentPriority::Normal),
        ])
    }

    fn execute(&self, task: &AgentTask, _rng: &mut dyn RngCore) -> ShowcaseResult<TaskOutcome> {
        Ok(TaskOutcome::new(json!({
            "status": "completed",
            "task_id": task.id,
        })))
    }
}

/// Knowledge pushed from one agent to another
#[derive(Debug, Clone)]
pub struct KnowledgeMessage {
    pub from: String,
    pub knowledge: Knowledge,
}

/// Externally visible summary of an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatus {
    pub agent_id: String,
    pub kind: AgentKind,
    pub agent_type: String,
    pub state: AgentState,
    pub goals_active: usize,
    pub tasks_pending: usize,
    pub tasks_completed: u64,
    /// Tasks that ran out of retries
    pub tasks_failed: u64,
    pub errors_recovered: u64,
    pub uptime_hours: f64,
    pub value_generated: f64,
    pub last_human_interaction: DateTime<Utc>,
}

impl AgentStatus {
    /// Whether the agent is in error or has lost work to failures
    pub fn has_failures(&self) -> bool {
        self.state == AgentState::Error || self.tasks_failed > 0 || self.errors_recovered > 0
    }
}

/// Everything needed to resume an agent later
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: String,
    pub kind: AgentKind,
    pub state: AgentState,
    pub goals: Vec<AgentGoal>,
    pub metrics: AgentMetrics,
    pub learning_memory: Knowledge,
    pub decision_threshold: f64,
    pub last_human_interaction: DateTime<Utc>,
}

/// Deterministic per-agent seed so fleets replay from one base seed
pub fn agent_seed(base: u64, agent_id: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(agent_id.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// An agent that plans, executes, learns and collaborates on its own
pub struct AutonomousAgent {
    id: String,
    behavior: Box<dyn AgentBehavior>,
    state: AgentState,
    settings: AgentSettings,
    decision_threshold: f64,
    goals: Vec<AgentGoal>,
    queue: TaskQueue,
    completed_tasks: Vec<AgentTask>,
    learning_memory: Knowledge,
    collaborators: BTreeMap<String, mpsc::UnboundedSender<KnowledgeMessage>>,
    inbox_tx: mpsc::UnboundedSender<KnowledgeMessage>,
    inbox_rx: mpsc::UnboundedReceiver<KnowledgeMessage>,
    metrics: AgentMetrics,
    started_at: Option<DateTime<Utc>>,
    last_human_interaction: DateTime<Utc>,
    last_decision_confidence: Option<f64>,
    /// Finished-task count at the last learning pass
    learned_at: u64,
    /// (failed, finished) counts when oversight was last granted
    oversight_baseline: (u64, u64),
    rng: StdRng,
}

impl std::fmt::Debug for AutonomousAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutonomousAgent")
            .field("id", &self.id)
            .field("kind", &self.behavior.kind())
            .field("state", &self.state)
            .field("tasks_pending", &self.queue.len())
            .finish()
    }
}

impl AutonomousAgent {
    pub fn new(id: impl Into<String>, behavior: Box<dyn AgentBehavior>) -> Self {
        let settings = AgentSettings::default();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            id: id.into(),
            behavior,
            state: AgentState::Initializing,
            decision_threshold: settings.decision_threshold,
            settings,
            goals: Vec::new(),
            queue: TaskQueue::new(),
            completed_tasks: Vec::new(),
            learning_memory: Knowledge::new(),
            collaborators: BTreeMap::new(),
            inbox_tx,
            inbox_rx,
            metrics: AgentMetrics::default(),
            started_at: None,
            last_human_interaction: Utc::now(),
            last_decision_confidence: None,
            learned_at: 0,
            oversight_baseline: (0, 0),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn general(id: impl Into<String>) -> Self {
        Self::new(id, Box::new(GeneralBehavior))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Apply settings and become ready for work
    pub fn initialize(&mut self, settings: &AgentSettings, now: DateTime<Utc>) {
        info!("Initializing {} agent: {}", self.kind().display_name(), self.id);
        self.settings = settings.clone();
        self.decision_threshold = settings.decision_threshold;
        self.state = AgentState::Idle;
        self.started_at = Some(now);
        self.last_human_interaction = now;

        let mut queued = std::mem::take(&mut self.queue);
        while let Some(task) = queued.pop() {
            self.add_task(task);
        }
    }

    /// Restore goals, metrics and learning from a saved snapshot
    pub fn restore(&mut self, snapshot: AgentSnapshot) -> ShowcaseResult<()> {
        if snapshot.agent_id != self.id || snapshot.kind != self.kind() {
            return Err(ShowcaseError::agent(
                &self.id,
                format!("snapshot belongs to {} ({:?})", snapshot.agent_id, snapshot.kind),
            ));
        }
        self.goals = snapshot.goals;
        self.metrics = snapshot.metrics;
        self.learning_memory = snapshot.learning_memory;
        self.decision_threshold = snapshot.decision_threshold;
        self.last_human_interaction = snapshot.last_human_interaction;
        self.learned_at = self.metrics.finished_tasks();
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AgentKind {
        self.behavior.kind()
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn goals(&self) -> &[AgentGoal] {
        &self.goals
    }

    pub fn pending_tasks(&self) -> &TaskQueue {
        &self.queue
    }

    pub fn completed_tasks(&self) -> &[AgentTask] {
        &self.completed_tasks
    }

    pub fn metrics(&self) -> &AgentMetrics {
        &self.metrics
    }

    pub fn learning_memory(&self) -> &Knowledge {
        &self.learning_memory
    }

    pub fn decision_threshold(&self) -> f64 {
        self.decision_threshold
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Store a goal and queue the tasks it decomposes into
    pub fn set_goal(&mut self, goal: AgentGoal) -> ShowcaseResult<()> {
        info!("Agent {} received goal: {}", self.id, goal.description);
        let tasks = self.behavior.decompose(&goal)?;
        self.goals.push(goal);
        for task in tasks {
            self.add_task(task);
        }
        Ok(())
    }

    /// Queue a task; tasks on the default retry budget take the configured one
    pub fn add_task(&mut self, mut task: AgentTask) {
        if task.max_retries == DEFAULT_MAX_RETRIES {
            task.max_retries = self.settings.max_retries;
        }
        self.queue.push(task);
    }

    /// Sender other agents use to push knowledge into this agent
    pub fn knowledge_sender(&self) -> mpsc::UnboundedSender<KnowledgeMessage> {
        self.inbox_tx.clone()
    }

    pub fn add_collaborator(
        &mut self,
        agent_id: impl Into<String>,
        sender: mpsc::UnboundedSender<KnowledgeMessage>,
    ) {
        self.collaborators.insert(agent_id.into(), sender);
    }

    pub fn collaborators(&self) -> impl Iterator<Item = &str> {
        self.collaborators.keys().map(String::as_str)
    }

    /// Merge keys this agent does not know yet; returns how many were added
    pub fn receive_knowledge(&mut self, knowledge: &Knowledge) -> usize {
        let mut added = 0;
        for (key, value) in knowledge {
            if !self.learning_memory.contains_key(key) {
                self.learning_memory.insert(key.clone(), value.clone());
                added += 1;
            }
        }
        added
    }

    fn drain_inbox(&mut self) {
        while let Ok(message) = self.inbox_rx.try_recv() {
            let added = self.receive_knowledge(&message.knowledge);
            debug!("Agent {} merged {} insights from {}", self.id, added, message.from);
        }
    }

    /// One iteration of the autonomous loop
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> ShowcaseResult<()> {
        match self.state {
            AgentState::Initializing => {
                return Err(ShowcaseError::agent(&self.id, "agent has not been initialized"));
            }
            AgentState::Paused => {
                self.update_metrics(now);
                return Ok(());
            }
            _ => {}
        }

        if let Err(e) = self.step(now) {
            error!("Agent {} encountered error: {}", self.id, e);
            self.state = AgentState::Error;
            self.recover_from_error(&e, now);
        }
        self.update_metrics(now);
        Ok(())
    }

    fn step(&mut self, now: DateTime<Utc>) -> ShowcaseResult<()> {
        self.drain_inbox();

        if self.should_request_human_input(now) {
            self.request_human_oversight(now);
            if !self.settings.auto_approve_oversight {
                return Ok(());
            }
            self.approve_oversight(now);
        }

        self.update_state();

        match self.state {
            AgentState::Idle => self.plan_next_action(now)?,
            AgentState::Planning => self.execute_planning(),
            AgentState::Executing => self.execute_next_task(),
            AgentState::Learning => self.learn_from_experience(),
            AgentState::Collaborating => self.collaborate(),
            _ => {}
        }
        Ok(())
    }

    /// Failure rate since oversight was last granted
    fn recent_error_rate(&self) -> f64 {
        let (failed_base, finished_base) = self.oversight_baseline;
        let finished = self.metrics.finished_tasks().saturating_sub(finished_base);
        if finished == 0 {
            return 0.0;
        }
        self.metrics.tasks_failed.saturating_sub(failed_base) as f64 / finished as f64
    }

    pub fn should_request_human_input(&self, now: DateTime<Utc>) -> bool {
        // A window too large to represent never expires
        let window_exceeded = ChronoDuration::try_days(self.settings.max_autonomous_days)
            .is_some_and(|window| now - self.last_human_interaction > window);
        if window_exceeded {
            return true;
        }
        if self
            .last_decision_confidence
            .is_some_and(|confidence| confidence < self.decision_threshold)
        {
            return true;
        }
        self.recent_error_rate() > self.settings.max_error_rate
    }

    pub fn request_human_oversight(&mut self, now: DateTime<Utc>) {
        warn!("Agent {} requesting human oversight", self.id);
        self.state = AgentState::Paused;
        self.learning_memory
            .insert("oversight_requested_at".to_string(), json!(now.to_rfc3339()));
    }

    /// Resume a paused agent; returns false when it was not waiting
    pub fn approve_oversight(&mut self, now: DateTime<Utc>) -> bool {
        if self.state != AgentState::Paused {
            return false;
        }
        info!("Oversight granted for agent {}", self.id);
        self.state = AgentState::Idle;
        self.last_human_interaction = now;
        self.last_decision_confidence = None;
        self.oversight_baseline = (self.metrics.tasks_failed, self.metrics.finished_tasks());
        true
    }

    fn should_learn(&self) -> bool {
        let finished = self.metrics.finished_tasks();
        finished > 0 && finished - self.learned_at >= self.settings.learn_every.max(1)
    }

    fn update_state(&mut self) {
        if matches!(
            self.state,
            AgentState::Error | AgentState::Paused | AgentState::Initializing
        ) {
            return;
        }

        if self.should_learn() {
            self.state = AgentState::Learning;
        } else if self.state == AgentState::Executing && self.queue.is_empty() {
            self.state = AgentState::Idle;
        } else if self.state == AgentState::Idle && !self.queue.is_empty() {
            self.state = AgentState::Planning;
        }
    }

    /// Re-evaluate goals and replan those that still need work
    fn plan_next_action(&mut self, now: DateTime<Utc>) -> ShowcaseResult<()> {
        let mut new_tasks = Vec::new();

        for goal in self.goals.iter_mut().filter(|g| !g.completed) {
            goal.progress = goal.evaluate_progress(&self.metrics);
            if goal.progress >= 1.0 {
                goal.completed = true;
                self.metrics.goals_achieved += 1;
                info!("Agent {} achieved goal: {}", self.id, goal.description);
                continue;
            }
            if goal.is_expired(now) {
                debug!("Agent {} skipping expired goal: {}", self.id, goal.description);
                continue;
            }
            if self.queue.iter().any(|t| t.goal_id == Some(goal.id)) {
                continue;
            }
            new_tasks.extend(self.behavior.decompose(goal)?);
        }

        for task in new_tasks {
            self.add_task(task);
        }
        if !self.queue.is_empty() {
            self.state = AgentState::Planning;
        }
        Ok(())
    }

    fn execute_planning(&mut self) {
        self.state = if self.queue.is_empty() {
            AgentState::Idle
        } else {
            AgentState::Executing
        };
    }

    fn execute_next_task(&mut self) {
        let Some(mut task) = self.queue.pop() else {
            self.state = AgentState::Idle;
            return;
        };

        match self.behavior.execute(&task, &mut self.rng) {
            Ok(outcome) => {
                task.result = Some(outcome.details);
                task.completed = true;
                self.metrics.tasks_completed += 1;
                self.metrics.decisions_made += outcome.decisions;
                self.metrics.outcome_value += outcome.value_generated;
                self.metrics.merge_observations(&outcome.observations);
                if outcome.confidence.is_some() {
                    self.last_decision_confidence = outcome.confidence;
                }
                info!("Agent {} completed task: {}", self.id, task.action);
                self.completed_tasks.push(task);
            }
            Err(e) => {
                task.error = Some(e.to_string());
                task.retry_count += 1;
                if task.can_retry() {
                    warn!(
                        "Task {} failed, retrying ({}/{})",
                        task.id, task.retry_count, task.max_retries
                    );
                    self.add_task(task);
                } else {
                    error!("Task {} failed after {} retries", task.id, task.max_retries);
                    self.metrics.tasks_failed += 1;
                    self.completed_tasks.push(task);
                }
            }
        }
    }

    /// Summarise finished tasks and adapt the decision threshold
    fn learn_from_experience(&mut self) {
        self.learned_at = self.metrics.finished_tasks();
        if self.completed_tasks.is_empty() {
            self.state = AgentState::Idle;
            return;
        }

        let succeeded = self.completed_tasks.iter().filter(|t| t.completed).count();
        let success_rate = succeeded as f64 / self.completed_tasks.len() as f64;

        let mut common_errors: BTreeMap<String, u64> = BTreeMap::new();
        for error in self.completed_tasks.iter().filter_map(|t| t.error.as_deref()) {
            let kind = error.split(':').next().unwrap_or(error).trim().to_string();
            *common_errors.entry(kind).or_insert(0) += 1;
        }

        self.learning_memory
            .insert("success_rate".to_string(), json!(success_rate));
        self.learning_memory
            .insert("common_errors".to_string(), json!(common_errors));

        let rate = self.settings.learning_rate;
        self.decision_threshold = if success_rate < 0.8 {
            self.decision_threshold * (1.0 - rate)
        } else {
            (self.decision_threshold * (1.0 + rate / 2.0)).min(0.95)
        };

        info!("Agent {} learned: success_rate={:.2}%", self.id, success_rate * 100.0);

        self.state = if success_rate > 0.9 && !self.collaborators.is_empty() {
            AgentState::Collaborating
        } else {
            AgentState::Idle
        };
    }

    /// Push learning memory to every collaborator still listening
    fn collaborate(&mut self) {
        let share = self
            .learning_memory
            .get("success_rate")
            .and_then(Value::as_f64)
            .is_some_and(|rate| rate > 0.9);

        if share {
            let message = KnowledgeMessage {
                from: self.id.clone(),
                knowledge: self.learning_memory.clone(),
            };
            let id = self.id.clone();
            self.collaborators.retain(|peer, sender| {
                let delivered = sender.send(message.clone()).is_ok();
                if !delivered {
                    debug!("Agent {} dropping departed collaborator {}", id, peer);
                }
                delivered
            });
        }
        self.state = AgentState::Idle;
    }

    pub fn recover_from_error(&mut self, error: &ShowcaseError, now: DateTime<Utc>) {
        info!("Agent {} recovering from error: {}", self.id, error);
        self.metrics.errors_recovered += 1;
        self.queue.clear();
        self.state = AgentState::Idle;
        self.learning_memory
            .insert("last_error".to_string(), json!(error.to_string()));
        self.learning_memory
            .insert("error_timestamp".to_string(), json!(now.to_rfc3339()));
    }

    fn update_metrics(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.started_at {
            self.metrics.uptime_hours = (now - started).num_milliseconds().max(0) as f64 / 3_600_000.0;
        }
        self.metrics.refresh_error_rate();
        self.metrics.value_generated = self.metrics.base_value() + self.metrics.outcome_value;
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            agent_id: self.id.clone(),
            kind: self.kind(),
            agent_type: self.kind().display_name().to_string(),
            state: self.state,
            goals_active: self.goals.iter().filter(|g| !g.completed).count(),
            tasks_pending: self.queue.len(),
            tasks_completed: self.metrics.tasks_completed,
            tasks_failed: self.metrics.tasks_failed,
            errors_recovered: self.metrics.errors_recovered,
            uptime_hours: self.metrics.uptime_hours,
            value_generated: self.metrics.value_generated,
            last_human_interaction: self.last_human_interaction,
        }
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            agent_id: self.id.clone(),
            kind: self.kind(),
            state: self.state,
            goals: self.goals.clone(),
            metrics: self.metrics.clone(),
            learning_memory: self.learning_memory.clone(),
            decision_threshold: self.decision_threshold,
            last_human_interaction: self.last_human_interaction,
        }
    }
}

/// Tick a shared agent every `interval` until `shutdown` turns true or its sender drops
pub async fn run_agent(
    agent: Arc<Mutex<AutonomousAgent>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    {
        let agent = agent.lock().await;
        info!("Agent {} starting autonomous operation", agent.id());
    }

    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let mut agent = agent.lock().await;
                if let Err(e) = agent.tick_at(Utc::now()) {
                    error!("{}", e);
                    break;
                }
            }
        }
    }

    let agent = agent.lock().await;
    info!("Agent {} stopped", agent.id());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn settings() -> AgentSettings {
        AgentSettings {
            learn_every: 3,
            ..AgentSettings::default()
        }
    }

    fn ready(agent: AutonomousAgent, now: DateTime<Utc>) -> AutonomousAgent {
        let mut agent = agent.with_seed(7);
        agent.initialize(&settings(), now);
        agent
    }

    fn tick_n(agent: &mut AutonomousAgent, now: &mut DateTime<Utc>, n: usize) {
        for _ in 0..n {
            agent.tick_at(*now).unwrap();
            *now += ChronoDuration::seconds(1);
        }
    }

    /// Fails the first `failures` attempts of every task
    struct Flaky {
        failures: u32,
        attempts: AtomicU32,
        confidence: Option<f64>,
    }

    impl AgentBehavior for Flaky {
        fn kind(&self) -> AgentKind {
            AgentKind::General
        }

        fn decompose(&self, goal: &AgentGoal) -> ShowcaseResult<Vec<AgentTask>> {
            Ok(vec![AgentTask::new("flaky_step").for_goal(goal)])
        }

        fn execute(&self, task: &AgentTask, _rng: &mut dyn RngCore) -> ShowcaseResult<TaskOutcome> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures {
                return Err(ShowcaseError::task(&task.action, "timeout: upstream"));
            }
            let mut outcome = TaskOutcome::new(json!({"ok": true})).observe("progress_points", 1.0);
            if let Some(c) = self.confidence {
                outcome = outcome.with_confidence(c);
            }
            Ok(outcome)
        }
    }

    fn flaky(failures: u32, confidence: Option<f64>) -> Box<dyn AgentBehavior> {
        Box::new(Flaky {
            failures,
            attempts: AtomicU32::new(0),
            confidence,
        })
    }

    #[test]
    fn test_general_decomposition_only_for_optimize_goals() {
        let behavior = GeneralBehavior;
        let tasks = behavior
            .decompose(&AgentGoal::new("Optimize throughput"))
            .unwrap();
        let actions: Vec<_> = tasks.iter().map(|t| t.action.as_str()).collect();
        assert_eq!(
            actions,
            vec!["analyze_current_state", "identify_bottlenecks", "implement_optimizations"]
        );
        assert_eq!(tasks[1].param_f64("threshold", 0.0), 0.7);

        assert!(behavior
            .decompose(&AgentGoal::new("Write poetry"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_uninitialized_agent_cannot_tick() {
        let mut agent = AutonomousAgent::general("general_000");
        assert!(agent.tick_at(Utc::now()).is_err());
    }

    #[test]
    fn test_goal_tasks_run_in_priority_order() {
        let mut now = Utc::now();
        let mut agent = ready(AutonomousAgent::general("general_000"), now);
        agent.set_goal(AgentGoal::new("optimize onboarding")).unwrap();
        assert_eq!(agent.pending_tasks().len(), 3);

        // Idle -> Planning, Planning -> Executing, then one task per tick
        tick_n(&mut agent, &mut now, 5);

        let done: Vec<_> = agent.completed_tasks().iter().map(|t| t.action.as_str()).collect();
        assert_eq!(
            done,
            vec!["analyze_current_state", "identify_bottlenecks", "implement_optimizations"]
        );
        assert_eq!(agent.metrics().tasks_completed, 3);
        assert_eq!(agent.metrics().value_generated, 300.0);
    }

    #[test]
    fn test_goal_completes_when_criteria_met() {
        let mut now = Utc::now();
        let mut agent = ready(AutonomousAgent::new("general_000", flaky(0, None)), now);
        agent
            .set_goal(AgentGoal::new("collect points").with_criterion("progress_points", 2))
            .unwrap();

        tick_n(&mut agent, &mut now, 12);

        assert!(agent.goals()[0].completed);
        assert_eq!(agent.metrics().goals_achieved, 1);
        assert_eq!(agent.metrics().value_generated, 2.0 * 100.0 + 1000.0);
        // no replanning once the goal is done
        assert!(agent.pending_tasks().is_empty());
    }

    #[test]
    fn test_failed_task_is_retried_then_succeeds() {
        let mut now = Utc::now();
        let mut agent = ready(AutonomousAgent::new("general_000", flaky(2, None)), now);
        agent.set_goal(AgentGoal::new("retry me")).unwrap();

        tick_n(&mut agent, &mut now, 5);

        let task = &agent.completed_tasks()[0];
        assert!(task.completed);
        assert_eq!(task.retry_count, 2);
        assert_eq!(agent.metrics().tasks_failed, 0);
    }

    #[test]
    fn test_exhausted_retries_pause_agent_for_oversight() {
        let mut now = Utc::now();
        let mut agent = AutonomousAgent::new("general_000", flaky(10, None)).with_seed(1);
        let manual = AgentSettings {
            auto_approve_oversight: false,
            ..settings()
        };
        agent.initialize(&manual, now);
        agent.set_goal(AgentGoal::new("doomed")).unwrap();

        tick_n(&mut agent, &mut now, 6);

        assert_eq!(agent.metrics().tasks_failed, 1);
        assert_eq!(agent.state(), AgentState::Paused);

        // a paused agent does no work
        let pending = agent.pending_tasks().len();
        tick_n(&mut agent, &mut now, 3);
        assert_eq!(agent.pending_tasks().len(), pending);

        assert!(agent.approve_oversight(now));
        assert_eq!(agent.state(), AgentState::Idle);
        assert!(!agent.should_request_human_input(now));
    }

    #[test]
    fn test_configured_retry_budget_applies_to_tasks() {
        let mut now = Utc::now();
        let mut agent = AutonomousAgent::new("general_000", flaky(u32::MAX, None)).with_seed(1);
        let single_retry = AgentSettings {
            max_retries: 1,
            ..settings()
        };
        agent.initialize(&single_retry, now);
        agent.set_goal(AgentGoal::new("fragile")).unwrap();

        tick_n(&mut agent, &mut now, 3);

        let task = &agent.completed_tasks()[0];
        assert!(!task.completed);
        assert_eq!((task.retry_count, task.max_retries), (1, 1));
        assert_eq!(agent.metrics().tasks_failed, 1);
        assert!(agent.status().has_failures());
    }

    #[test]
    fn test_explicit_retry_budget_is_kept() {
        let now = Utc::now();
        let mut agent = ready(AutonomousAgent::general("general_000"), now);
        agent.add_task(AgentTask::new("careful").with_max_retries(7));
        agent.add_task(AgentTask::new("ordinary"));

        let budgets: Vec<_> = agent.pending_tasks().iter().map(|t| t.max_retries).collect();
        assert_eq!(budgets, vec![7, 3]);
    }

    #[test]
    fn test_settings_reach_tasks_queued_before_initialize() {
        let mut agent = AutonomousAgent::general("general_000");
        agent.add_task(AgentTask::new("early"));
        agent.initialize(
            &AgentSettings {
                max_retries: 0,
                ..settings()
            },
            Utc::now(),
        );
        assert_eq!(agent.pending_tasks().peek().map(|t| t.max_retries), Some(0));
    }

    #[test]
    fn test_unrepresentable_autonomy_window_never_expires() {
        let now = Utc::now();
        let mut agent = AutonomousAgent::general("general_000");
        agent.initialize(
            &AgentSettings {
                max_autonomous_days: i64::MAX / 1000,
                ..settings()
            },
            now,
        );
        assert!(!agent.should_request_human_input(now + ChronoDuration::days(10_000)));
    }

    #[test]
    fn test_low_confidence_requests_oversight() {
        let mut now = Utc::now();
        let mut agent = AutonomousAgent::new("general_000", flaky(0, Some(0.5))).with_seed(1);
        let manual = AgentSettings {
            auto_approve_oversight: false,
            ..settings()
        };
        agent.initialize(&manual, now);
        agent.set_goal(AgentGoal::new("judgement call")).unwrap();

        tick_n(&mut agent, &mut now, 4);
        assert_eq!(agent.state(), AgentState::Paused);
    }

    #[test]
    fn test_autonomy_window_triggers_oversight() {
        let now = Utc::now();
        let agent = ready(AutonomousAgent::general("general_000"), now);
        assert!(!agent.should_request_human_input(now + ChronoDuration::days(6)));
        assert!(agent.should_request_human_input(now + ChronoDuration::days(8)));
    }

    #[test]
    fn test_learning_adjusts_threshold_and_shares_knowledge() {
        let mut now = Utc::now();
        let mut agent = ready(AutonomousAgent::general("general_000"), now);
        let mut peer = ready(AutonomousAgent::general("general_001"), now);
        agent.add_collaborator(peer.id().to_string(), peer.knowledge_sender());

        agent.set_goal(AgentGoal::new("optimize everything")).unwrap();
        // 3 tasks finish, then learn, then collaborate
        tick_n(&mut agent, &mut now, 7);

        assert_eq!(agent.learning_memory()["success_rate"], json!(1.0));
        assert!((agent.decision_threshold() - 0.84).abs() < 1e-9);

        peer.tick_at(now).unwrap();
        assert_eq!(peer.learning_memory()["success_rate"], json!(1.0));
        assert!(!agent.status().has_failures());
    }

    #[test]
    fn test_learning_rate_scales_threshold_adjustment() {
        let mut now = Utc::now();
        let mut agent = AutonomousAgent::general("general_000").with_seed(7);
        agent.initialize(
            &AgentSettings {
                learning_rate: 0.2,
                ..settings()
            },
            now,
        );
        agent.set_goal(AgentGoal::new("optimize everything")).unwrap();
        tick_n(&mut agent, &mut now, 7);

        assert!((agent.decision_threshold() - 0.88).abs() < 1e-9);
    }

    #[test]
    fn test_receive_knowledge_keeps_existing_keys() {
        let mut agent = AutonomousAgent::general("general_000");
        let mut mine = Knowledge::new();
        mine.insert("success_rate".into(), json!(0.5));
        agent.receive_knowledge(&mine);

        let mut theirs = Knowledge::new();
        theirs.insert("success_rate".into(), json!(0.99));
        theirs.insert("common_errors".into(), json!({}));
        assert_eq!(agent.receive_knowledge(&theirs), 1);
        assert_eq!(agent.learning_memory()["success_rate"], json!(0.5));
    }

    #[test]
    fn test_recover_from_error_clears_queue() {
        let now = Utc::now();
        let mut agent = ready(AutonomousAgent::general("general_000"), now);
        agent.set_goal(AgentGoal::new("optimize")).unwrap();
        agent.recover_from_error(&ShowcaseError::agent("general_000", "boom"), now);

        assert!(agent.pending_tasks().is_empty());
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(agent.metrics().errors_recovered, 1);
        assert!(agent.learning_memory().contains_key("last_error"));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut now = Utc::now();
        let mut agent = ready(AutonomousAgent::general("general_000"), now);
        agent.set_goal(AgentGoal::new("optimize")).unwrap();
        tick_n(&mut agent, &mut now, 5);

        let snapshot = agent.snapshot();
        let mut revived = ready(AutonomousAgent::general("general_000"), now);
        revived.restore(snapshot.clone()).unwrap();
        assert_eq!(revived.metrics().tasks_completed, 3);
        assert_eq!(revived.goals().len(), 1);

        let mut stranger = ready(AutonomousAgent::general("general_009"), now);
        assert!(stranger.restore(snapshot).is_err());
    }

    #[test]
    fn test_agent_seed_is_stable_and_distinct() {
        assert_eq!(agent_seed(42, "nias_000"), agent_seed(42, "nias_000"));
        assert_ne!(agent_seed(42, "nias_000"), agent_seed(42, "nias_001"));
    }

    #[tokio::test]
    async fn test_run_agent_stops_on_shutdown() {
        let now = Utc::now();
        let agent = Arc::new(Mutex::new(ready(AutonomousAgent::general("general_000"), now)));
        agent
            .lock()
            .await
            .set_goal(AgentGoal::new("optimize quickly"))
            .unwrap();

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_agent(agent.clone(), Duration::from_millis(5), rx));

        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(agent.lock().await.metrics().tasks_completed > 0);
    }
}
