//! Core domain models for autonomous agents
//!
//! Architecture: Rich Domain Models - Goals and tasks are entities with behavior, not just data
//! - Goals evaluate their own progress against agent metrics
//! - TaskQueue owns the ordering rules for pending work
//! - Outcomes carry the value and observations a task produced back to its agent

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use uuid::Uuid;

/// Learning memory and shared knowledge, keyed by insight name
pub type Knowledge = BTreeMap<String, Value>;

/// Agent operational states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Initializing,
    Idle,
    Planning,
    Executing,
    Learning,
    Collaborating,
    Paused,
    Error,
}

impl AgentState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Idle => "idle",
            Self::Planning => "planning",
            Self::Executing => "executing",
            Self::Learning => "learning",
            Self::Collaborating => "collaborating",
            Self::Paused => "paused",
            Self::Error => "error",
        }
    }

    /// Whether an agent in this state is doing autonomous work
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Initializing | Self::Paused | Self::Error)
    }
}

/// Task priority levels, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentPriority {
    Critical = 1,
    High = 2,
    Normal = 3,
    Low = 4,
    Background = 5,
}

impl AgentPriority {
    /// Numeric rank where 1 is the most urgent
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// The kinds of agent the showcase can deploy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Rule-based agent without a specialised action catalogue
    General,
    /// NIΛS emotional intelligence manager
    EmotionalIntelligence,
    /// ΛBAS attention and productivity optimizer
    ProductivityOptimizer,
    /// DΛST context intelligence orchestrator
    ContextOrchestrator,
}

impl AgentKind {
    /// Short prefix used when generating agent ids
    pub fn prefix(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::EmotionalIntelligence => "nias",
            Self::ProductivityOptimizer => "abas",
            Self::ContextOrchestrator => "dast",
        }
    }

    /// Display name shown in reports
    pub fn display_name(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::EmotionalIntelligence => "NIΛS_Emotional_Intelligence",
            Self::ProductivityOptimizer => "ΛBAS_Productivity_Optimizer",
            Self::ContextOrchestrator => "DΛST_Context_Orchestrator",
        }
    }

    pub fn all() -> &'static [AgentKind] {
        &[
            Self::General,
            Self::EmotionalIntelligence,
            Self::ProductivityOptimizer,
            Self::ContextOrchestrator,
        ]
    }
}

/// A high-level goal for an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentGoal {
    pub id: Uuid,
    pub description: String,
    /// Metric name to target value; numeric targets are minimums
    pub success_criteria: BTreeMap<String, Value>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: AgentPriority,
    pub progress: f64,
    pub completed: bool,
}

impl AgentGoal {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            success_criteria: BTreeMap::new(),
            deadline: None,
            priority: AgentPriority::Normal,
            progress: 0.0,
            completed: false,
        }
    }

    pub fn with_criterion(mut self, metric: impl Into<String>, target: impl Into<Value>) -> Self {
        self.success_criteria.insert(metric.into(), target.into());
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_priority(mut self, priority: AgentPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Fraction of success criteria currently met by `metrics`
    pub fn evaluate_progress(&self, metrics: &AgentMetrics) -> f64 {
        if self.success_criteria.is_empty() {
            return 0.0;
        }

        let met = self
            .success_criteria
            .iter()
            .filter(|(criterion, target)| match metrics.lookup(criterion) {
                Some(value) => match target.as_f64() {
                    Some(minimum) => value >= minimum,
                    None => Value::from(value) == **target,
                },
                None => false,
            })
            .count();

        met as f64 / self.success_criteria.len() as f64
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }
}

/// Retry budget of a task nobody has tuned
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// A specific unit of work for an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTask {
    pub id: Uuid,
    pub goal_id: Option<Uuid>,
    pub action: String,
    pub parameters: BTreeMap<String, Value>,
    pub priority: AgentPriority,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub max_retries: u32,
    pub retry_count: u32,
    pub completed: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl AgentTask {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id: None,
            action: action.into(),
            parameters: BTreeMap::new(),
            priority: AgentPriority::Normal,
            scheduled_time: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_count: 0,
            completed: false,
            result: None,
            error: None,
        }
    }

    pub fn for_goal(mut self, goal: &AgentGoal) -> Self {
        self.goal_id = Some(goal.id);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_priority(mut self, priority: AgentPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn scheduled_at(mut self, time: DateTime<Utc>) -> Self {
        self.scheduled_time = Some(time);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Integer parameter, falling back to `default` when absent or mistyped
    pub fn param_u64(&self, key: &str, default: u64) -> u64 {
        self.parameters
            .get(key)
            .and_then(Value::as_u64)
            .unwrap_or(default)
    }

    pub fn param_f64(&self, key: &str, default: f64) -> f64 {
        self.parameters
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(default)
    }

    pub fn param_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.parameters
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }

    /// Whether another attempt is allowed after a failure
    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Unscheduled tasks sort after scheduled ones of the same priority
    fn queue_key(&self) -> (u8, bool, Option<DateTime<Utc>>) {
        (
            self.priority.rank(),
            self.scheduled_time.is_none(),
            self.scheduled_time,
        )
    }
}

/// Pending tasks ordered by priority, then scheduled time, then arrival
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: VecDeque<AgentTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every task that sorts at or before `task`
    pub fn push(&mut self, task: AgentTask) {
        let key = task.queue_key();
        let position = self.tasks.partition_point(|queued| queued.queue_key() <= key);
        self.tasks.insert(position, task);
    }

    pub fn pop(&mut self) -> Option<AgentTask> {
        self.tasks.pop_front()
    }

    pub fn peek(&self) -> Option<&AgentTask> {
        self.tasks.front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentTask> {
        self.tasks.iter()
    }
}

/// What a task produced, reported back to the executing agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub details: Value,
    pub value_generated: f64,
    pub decisions: u64,
    /// Confidence in the decisions taken, when the task made any judgement call
    pub confidence: Option<f64>,
    /// Named increments added to the agent's running observations
    pub observations: BTreeMap<String, f64>,
}

impl TaskOutcome {
    pub fn new(details: Value) -> Self {
        Self {
            details,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value_generated = value;
        self
    }

    pub fn with_decisions(mut self, decisions: u64) -> Self {
        self.decisions = decisions;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn observe(mut self, name: impl Into<String>, value: f64) -> Self {
        self.observations.insert(name.into(), value);
        self
    }
}

/// Running counters for a single agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub goals_achieved: u64,
    pub uptime_hours: f64,
    pub decisions_made: u64,
    pub errors_recovered: u64,
    /// Value reported by task outcomes
    pub outcome_value: f64,
    /// Base value plus outcome value
    pub value_generated: f64,
    pub error_rate: f64,
    pub observations: BTreeMap<String, f64>,
}

impl AgentMetrics {
    /// Look up a counter or observation by name
    pub fn lookup(&self, name: &str) -> Option<f64> {
        match name {
            "tasks_completed" => Some(self.tasks_completed as f64),
            "tasks_failed" => Some(self.tasks_failed as f64),
            "goals_achieved" => Some(self.goals_achieved as f64),
            "uptime_hours" => Some(self.uptime_hours),
            "decisions_made" => Some(self.decisions_made as f64),
            "errors_recovered" => Some(self.errors_recovered as f64),
            "value_generated" => Some(self.value_generated),
            "error_rate" => Some(self.error_rate),
            other => self.observations.get(other).copied(),
        }
    }

    /// Add each reported increment to its running total
    pub fn merge_observations(&mut self, observations: &BTreeMap<String, f64>) {
        for (name, value) in observations {
            *self.observations.entry(name.clone()).or_insert(0.0) += value;
        }
    }

    /// Value from task and goal counts: 100 per task, 1000 per goal
    pub fn base_value(&self) -> f64 {
        self.tasks_completed as f64 * 100.0 + self.goals_achieved as f64 * 1000.0
    }

    pub fn finished_tasks(&self) -> u64 {
        self.tasks_completed + self.tasks_failed
    }

    pub fn refresh_error_rate(&mut self) {
        let finished = self.finished_tasks();
        self.error_rate = if finished == 0 {
            0.0
        } else {
            self.tasks_failed as f64 / finished as f64
        };
    }
}
