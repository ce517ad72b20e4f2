//! Specialised workforce agents and their business case
//!
//! Architecture: Strategy Implementations - Each product line is an AgentBehavior with its own catalogue
//! - NIΛS manages well-being, ΛBAS protects attention, DΛST orchestrates knowledge
//! - Outcomes report observation increments named after the standard goal criteria
//! - Workforce steps every agent in parallel on a simulated clock and prices the result

use super::{agent_seed, AgentBehavior, AgentStatus, AutonomousAgent, GeneralBehavior};
use crate::config::{ShowcaseConfig, WorkforceConfig};
use crate::domain::{
    AgentGoal, AgentKind, AgentPriority, AgentTask, ShowcaseError, ShowcaseResult,
    TaskOutcome,
};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Kinds deployed by the workforce, in deployment order
pub const WORKFORCE_KINDS: [AgentKind; 3] = [
    AgentKind::EmotionalIntelligence,
    AgentKind::ProductivityOptimizer,
    AgentKind::ContextOrchestrator,
];

fn between(rng: &mut dyn RngCore, low: f64, high: f64) -> f64 {
    rng.gen_range(low..high)
}

fn count(rng: &mut dyn RngCore, low: u64, high: u64) -> u64 {
    rng.gen_range(low..=high)
}

fn employee_id(rng: &mut dyn RngCore) -> String {
    format!("emp_{}", rng.gen_range(1000..=9999))
}

fn pick<'a>(rng: &mut dyn RngCore, options: &[&'a str], low: usize, high: usize) -> Vec<&'a str> {
    let k = rng.gen_range(low..=high).min(options.len());
    options.choose_multiple(rng, k).copied().collect()
}

fn catalogue_task(goal: &AgentGoal, action: &str, priority: AgentPriority) -> AgentTask {
    AgentTask::new(action).for_goal(goal).with_priority(priority)
}

/// NIΛS autonomous emotional intelligence manager
#[derive(Debug, Clone)]
pub struct EmotionalIntelligenceBehavior {
    pub employees: u64,
}

impl EmotionalIntelligenceBehavior {
    fn monitor_emotional_state(&self, task: &AgentTask, rng: &mut dyn RngCore) -> TaskOutcome {
        let employees = task.param_u64("employee_count", self.employees);
        let actions = ["schedule_break", "reduce_workload", "team_support", "manager_checkin"];
        let risks = ["low", "medium", "high"];

        let interventions: Vec<_> = (0..count(rng, 1, 10))
            .map(|_| {
                json!({
                    "employee_id": employee_id(rng),
                    "risk_level": risks.choose(rng).copied().unwrap_or("low"),
                    "recommended_action": actions.choose(rng).copied().unwrap_or("team_support"),
                })
            })
            .collect();

        info!("NIΛS agent monitored {} employees", employees);
        let decisions = interventions.len() as u64;
        TaskOutcome::new(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "employees_analyzed": employees,
            "average_stress_level": between(rng, 0.3, 0.7),
            "average_satisfaction": between(rng, 0.6, 0.9),
            "burnout_risk_count": count(rng, 5, 20),
            "intervention_needed": interventions,
        }))
        .with_decisions(decisions)
    }

    fn detect_burnout_risk(&self, task: &AgentTask, rng: &mut dyn RngCore) -> TaskOutcome {
        let threshold = task.param_f64("risk_threshold", 0.7);
        let factors = [
            "overtime_hours",
            "missed_breaks",
            "high_stress_projects",
            "poor_work_life_balance",
            "team_conflicts",
        ];

        let screened = count(rng, 5, 15);
        let mut at_risk = Vec::new();
        for _ in 0..screened {
            let risk_score = between(rng, 0.5, 1.0);
            if risk_score > threshold {
                at_risk.push(json!({
                    "employee_id": employee_id(rng),
                    "risk_score": risk_score,
                    "factors": pick(rng, &factors, 2, 4),
                    "intervention": {
                        "type": "preventive",
                        "actions": ["mandatory_time_off", "workload_redistribution", "wellness_program_enrollment"],
                    },
                }));
            }
        }

        let prevented = at_risk.len() as f64;
        TaskOutcome::new(json!({
            "at_risk_count": at_risk.len(),
            "interventions_deployed": at_risk.len(),
            "estimated_value_saved": prevented * 10_000.0,
            "at_risk": at_risk,
        }))
        .with_value(prevented * 10_000.0)
        .observe("burnout_prevention", prevented / screened as f64 * 0.5)
    }

    fn optimize_communication_timing(&self, rng: &mut dyn RngCore) -> TaskOutcome {
        let messages = count(rng, 100, 500);
        let stress_reduction = between(rng, 0.15, 0.35);
        TaskOutcome::new(json!({
            "messages_rescheduled": messages,
            "stress_reduction": stress_reduction,
            "engagement_increase": between(rng, 0.20, 0.45),
            "productivity_gain": between(rng, 0.10, 0.25),
        }))
        .with_value(messages as f64 * 50.0)
        .observe("stress_reduction", stress_reduction)
    }

    fn create_wellness_intervention(&self, task: &AgentTask, rng: &mut dyn RngCore) -> TaskOutcome {
        let components = [
            "meditation_sessions",
            "flexible_hours",
            "mental_health_resources",
            "team_building_activities",
            "workload_adjustment",
            "coaching_sessions",
        ];
        let target_employees = count(rng, 10, 50);
        let satisfaction_increase = between(rng, 0.15, 0.35);

        TaskOutcome::new(json!({
            "id": format!("intervention_{}", uuid::Uuid::new_v4()),
            "type": task.param_str("type", "general"),
            "created_at": Utc::now().to_rfc3339(),
            "target_employees": target_employees,
            "components": pick(rng, &components, 3, 5),
            "expected_impact": {
                "stress_reduction": between(rng, 0.20, 0.40),
                "satisfaction_increase": satisfaction_increase,
                "retention_improvement": between(rng, 0.10, 0.25),
            },
        }))
        .with_value(target_employees as f64 * 5_000.0)
        .observe("satisfaction_increase", satisfaction_increase)
    }

    fn manage_team_dynamics(&self, task: &AgentTask, rng: &mut dyn RngCore) -> TaskOutcome {
        let teams = task.param_u64("team_count", 10);
        TaskOutcome::new(json!({
            "teams_optimized": teams,
            "conflicts_resolved": count(rng, 2, 8),
            "collaboration_improvement": between(rng, 0.20, 0.45),
            "team_satisfaction": between(rng, 0.70, 0.90),
            "recommendations_implemented": count(rng, 15, 30),
        }))
        .with_value(teams as f64 * 15_000.0)
    }
}

impl AgentBehavior for EmotionalIntelligenceBehavior {
    fn kind(&self) -> AgentKind {
        AgentKind::EmotionalIntelligence
    }

    fn decompose(&self, goal: &AgentGoal) -> ShowcaseResult<Vec<AgentTask>> {
        Ok(vec![
            catalogue_task(goal, "monitor_emotional_state", AgentPriority::High)
                .with_param("employee_count", self.employees),
            catalogue_task(goal, "detect_burnout_risk", AgentPriority::High)
                .with_param("risk_threshold", 0.7),
            catalogue_task(goal, "optimize_communication_timing", AgentPriority::Normal),
            catalogue_task(goal, "create_wellness_intervention", AgentPriority::Normal)
                .with_param("type", "preventive"),
            catalogue_task(goal, "manage_team_dynamics", AgentPriority::Low)
                .with_param("team_count", (self.employees / 10).max(1)),
        ])
    }

    fn execute(&self, task: &AgentTask, rng: &mut dyn RngCore) -> ShowcaseResult<TaskOutcome> {
        match task.action.as_str() {
            "monitor_emotional_state" => Ok(self.monitor_emotional_state(task, rng)),
            "detect_burnout_risk" => Ok(self.detect_burnout_risk(task, rng)),
            "optimize_communication_timing" => Ok(self.optimize_communication_timing(rng)),
            "create_wellness_intervention" => Ok(self.create_wellness_intervention(task, rng)),
            "manage_team_dynamics" => Ok(self.manage_team_dynamics(task, rng)),
            _ => GeneralBehavior.execute(task, rng),
        }
    }
}

/// ΛBAS autonomous attention and productivity optimizer
#[derive(Debug, Clone)]
pub struct ProductivityBehavior {
    pub employees: u64,
}

impl ProductivityBehavior {
    fn optimize_meeting_schedule(&self, task: &AgentTask, rng: &mut dyn RngCore) -> TaskOutcome {
        let meetings = task.param_u64("meeting_count", 50).max(1);
        let eliminated = count(rng, 10, 20);
        let hours_saved = count(rng, 50, 150);
        let productivity_gain = between(rng, 0.25, 0.45);

        info!("ΛBAS agent optimized {} meetings, saved {} hours", meetings, hours_saved);
        TaskOutcome::new(json!({
            "meetings_eliminated": eliminated,
            "meetings_shortened": count(rng, 15, 25),
            "meetings_rescheduled": count(rng, 20, 30),
            "time_saved_hours": hours_saved,
            "productivity_gain": productivity_gain,
            "employee_satisfaction": between(rng, 0.75, 0.95),
        }))
        .with_value(hours_saved as f64 * 150.0)
        .observe("productivity_increase", productivity_gain)
        .observe("meeting_reduction", eliminated as f64 / meetings as f64)
    }

    fn protect_flow_states(&self, rng: &mut dyn RngCore) -> TaskOutcome {
        let deep_work_hours = count(rng, 100, 300);
        TaskOutcome::new(json!({
            "flow_sessions_protected": count(rng, 200, 500),
            "interruptions_blocked": count(rng, 1000, 3000),
            "deep_work_hours_gained": deep_work_hours,
            "quality_improvement": between(rng, 0.30, 0.50),
            "error_reduction": between(rng, 0.20, 0.40),
        }))
        .with_value(deep_work_hours as f64 * 200.0)
        .observe("flow_state_hours", deep_work_hours as f64)
    }

    fn eliminate_distractions(&self, rng: &mut dyn RngCore) -> TaskOutcome {
        let sources = [
            "unnecessary_notifications",
            "non_critical_emails",
            "social_media",
            "irrelevant_meetings",
            "context_switching",
            "open_office_noise",
        ];
        let eliminated = count(rng, 3, 5);
        TaskOutcome::new(json!({
            "distractions_identified": sources.len(),
            "distractions_eliminated": eliminated,
            "focus_time_increase": between(rng, 0.35, 0.55),
            "productivity_boost": between(rng, 0.25, 0.45),
            "employee_satisfaction": between(rng, 0.80, 0.95),
        }))
        .with_value(eliminated as f64 * 25_000.0)
    }

    fn optimize_workspace(&self, task: &AgentTask, rng: &mut dyn RngCore) -> TaskOutcome {
        let implementations = count(rng, 200, 400);
        TaskOutcome::new(json!({
            "workspaces_analyzed": task.param_u64("workspace_count", 100),
            "recommendations_made": count(rng, 300, 500),
            "implementations": implementations,
            "productivity_gain": between(rng, 0.20, 0.35),
            "ergonomic_improvements": count(rng, 50, 100),
            "tool_optimizations": count(rng, 30, 60),
        }))
        .with_value(implementations as f64 * 500.0)
    }

    fn manage_cognitive_load(&self, task: &AgentTask, rng: &mut dyn RngCore) -> TaskOutcome {
        let balanced = count(rng, 15, 35);
        TaskOutcome::new(json!({
            "employees_analyzed": task.param_u64("employee_count", 100),
            "overload_cases_detected": count(rng, 20, 40),
            "load_balanced": balanced,
            "task_redistribution": count(rng, 50, 100),
            "mental_fatigue_reduction": between(rng, 0.30, 0.50),
            "decision_quality_improvement": between(rng, 0.25, 0.40),
        }))
        .with_value(balanced as f64 * 8_000.0)
        .with_decisions(balanced)
    }
}

impl AgentBehavior for ProductivityBehavior {
    fn kind(&self) -> AgentKind {
        AgentKind::ProductivityOptimizer
    }

    fn decompose(&self, goal: &AgentGoal) -> ShowcaseResult<Vec<AgentTask>> {
        Ok(vec![
            catalogue_task(goal, "optimize_meeting_schedule", AgentPriority::High)
                .with_param("meeting_count", 50),
            catalogue_task(goal, "protect_flow_states", AgentPriority::High)
                .with_param("employee_count", self.employees),
            catalogue_task(goal, "eliminate_distractions", AgentPriority::Normal),
            catalogue_task(goal, "optimize_workspace", AgentPriority::Normal)
                .with_param("workspace_count", self.employees),
            catalogue_task(goal, "manage_cognitive_load", AgentPriority::Low)
                .with_param("employee_count", self.employees),
        ])
    }

    fn execute(&self, task: &AgentTask, rng: &mut dyn RngCore) -> ShowcaseResult<TaskOutcome> {
        match task.action.as_str() {
            "optimize_meeting_schedule" => Ok(self.optimize_meeting_schedule(task, rng)),
            "protect_flow_states" => Ok(self.protect_flow_states(rng)),
            "eliminate_distractions" => Ok(self.eliminate_distractions(rng)),
            "optimize_workspace" => Ok(self.optimize_workspace(task, rng)),
            "manage_cognitive_load" => Ok(self.manage_cognitive_load(task, rng)),
            _ => GeneralBehavior.execute(task, rng),
        }
    }
}

/// DΛST autonomous context intelligence orchestrator
#[derive(Debug, Clone)]
pub struct ContextBehavior {
    pub employees: u64,
}

impl ContextBehavior {
    fn build_knowledge_graph(&self, rng: &mut dyn RngCore) -> TaskOutcome {
        let nodes = count(rng, 1000, 5000);
        let insights = count(rng, 20, 100);
        let domains = count(rng, 10, 30);

        info!("DΛST agent created knowledge graph with {} nodes", nodes);
        TaskOutcome::new(json!({
            "nodes_created": nodes,
            "edges_created": count(rng, 5000, 20000),
            "patterns_discovered": count(rng, 50, 200),
            "insights_generated": insights,
            "knowledge_domains": domains,
            "cross_connections": count(rng, 100, 500),
        }))
        .with_value(insights as f64 * 5_000.0)
        .observe("knowledge_graph_coverage", domains as f64 / 100.0)
    }

    fn predict_information_needs(&self, rng: &mut dyn RngCore) -> TaskOutcome {
        let hours_saved = count(rng, 50, 200);
        let accuracy = between(rng, 0.75, 0.95);
        TaskOutcome::new(json!({
            "predictions_made": count(rng, 100, 500),
            "accuracy_rate": accuracy,
            "time_saved_hours": hours_saved,
            "decisions_accelerated": count(rng, 30, 100),
            "information_delivered_proactively": count(rng, 200, 1000),
            "search_time_reduction": between(rng, 0.60, 0.80),
        }))
        .with_value(hours_saved as f64 * 150.0)
        .observe("prediction_accuracy", accuracy)
    }

    fn optimize_knowledge_flow(&self, rng: &mut dyn RngCore) -> TaskOutcome {
        let resolved = count(rng, 8, 25);
        let latency_reduction = between(rng, 0.40, 0.60);
        TaskOutcome::new(json!({
            "bottlenecks_identified": count(rng, 10, 30),
            "bottlenecks_resolved": resolved,
            "knowledge_paths_optimized": count(rng, 50, 150),
            "information_latency_reduction": latency_reduction,
            "knowledge_sharing_increase": between(rng, 0.50, 0.80),
            "collaboration_improvement": between(rng, 0.35, 0.55),
        }))
        .with_value(resolved as f64 * 20_000.0)
        .observe("information_latency", latency_reduction)
    }

    fn identify_knowledge_gaps(&self, rng: &mut dyn RngCore) -> TaskOutcome {
        let critical = count(rng, 5, 15);
        TaskOutcome::new(json!({
            "gaps_identified": count(rng, 20, 50),
            "critical_gaps": critical,
            "recommendations_made": count(rng, 30, 80),
            "training_needs_identified": count(rng, 10, 30),
            "expertise_gaps": count(rng, 5, 15),
            "documentation_gaps": count(rng, 15, 40),
            "training_programs_created": count(rng, 3, 10),
        }))
        .with_value(critical as f64 * 30_000.0)
    }

    fn create_context_intelligence(&self, rng: &mut dyn RngCore) -> TaskOutcome {
        let supported = count(rng, 50, 150);
        TaskOutcome::new(json!({
            "contexts_analyzed": count(rng, 100, 300),
            "decisions_supported": supported,
            "context_switches_optimized": count(rng, 200, 500),
            "relevant_info_delivered": count(rng, 1000, 3000),
            "decision_speed_improvement": between(rng, 0.40, 0.60),
            "decision_quality_improvement": between(rng, 0.30, 0.50),
        }))
        .with_value(supported as f64 * 10_000.0)
        .with_decisions(supported)
    }
}

impl AgentBehavior for ContextBehavior {
    fn kind(&self) -> AgentKind {
        AgentKind::ContextOrchestrator
    }

    fn decompose(&self, goal: &AgentGoal) -> ShowcaseResult<Vec<AgentTask>> {
        Ok(vec![
            catalogue_task(goal, "build_knowledge_graph", AgentPriority::High),
            catalogue_task(goal, "predict_information_needs", AgentPriority::High),
            catalogue_task(goal, "optimize_knowledge_flow", AgentPriority::Normal),
            catalogue_task(goal, "identify_knowledge_gaps", AgentPriority::Normal),
            catalogue_task(goal, "create_context_intelligence", AgentPriority::Low),
        ])
    }

    fn execute(&self, task: &AgentTask, rng: &mut dyn RngCore) -> ShowcaseResult<TaskOutcome> {
        match task.action.as_str() {
            "build_knowledge_graph" => Ok(self.build_knowledge_graph(rng)),
            "predict_information_needs" => Ok(self.predict_information_needs(rng)),
            "optimize_knowledge_flow" => Ok(self.optimize_knowledge_flow(rng)),
            "identify_knowledge_gaps" => Ok(self.identify_knowledge_gaps(rng)),
            "create_context_intelligence" => Ok(self.create_context_intelligence(rng)),
            _ => GeneralBehavior.execute(task, rng),
        }
    }
}

/// Behavior for `kind`, covering `employees` people
pub fn behavior_for(kind: AgentKind, employees: u64) -> Box<dyn AgentBehavior> {
    match kind {
        AgentKind::General => Box::new(GeneralBehavior),
        AgentKind::EmotionalIntelligence => Box::new(EmotionalIntelligenceBehavior { employees }),
        AgentKind::ProductivityOptimizer => Box::new(ProductivityBehavior { employees }),
        AgentKind::ContextOrchestrator => Box::new(ContextBehavior { employees }),
    }
}

/// Goal each kind is given when the workforce is deployed
pub fn standard_goal(kind: AgentKind, employees: u64) -> AgentGoal {
    match kind {
        AgentKind::EmotionalIntelligence => {
            AgentGoal::new(format!("Optimize emotional well-being for {employees} employees"))
                .with_criterion("stress_reduction", 0.3)
                .with_criterion("satisfaction_increase", 0.9)
                .with_criterion("burnout_prevention", 0.95)
                .with_priority(AgentPriority::High)
        }
        AgentKind::ProductivityOptimizer => {
            AgentGoal::new(format!("Maximize productivity for {employees} employees"))
                .with_criterion("productivity_increase", 0.4)
                .with_criterion("meeting_reduction", 0.3)
                .with_criterion("flow_state_hours", 1000)
                .with_priority(AgentPriority::High)
        }
        AgentKind::ContextOrchestrator => {
            AgentGoal::new(format!("Optimize knowledge management for {employees} employees"))
                .with_criterion("knowledge_graph_coverage", 0.9)
                .with_criterion("prediction_accuracy", 0.85)
                .with_criterion("information_latency", 0.2)
                .with_priority(AgentPriority::Normal)
        }
        AgentKind::General => AgentGoal::new("Optimize operations"),
    }
}

/// Agents of `kind` needed for a company of `company_size`
pub fn agents_needed(config: &WorkforceConfig, kind: AgentKind, company_size: usize) -> usize {
    config
        .employees_per_agent(kind)
        .map_or(1, |ratio| (company_size / ratio.max(1)).max(1))
}

/// Financial summary of the workforce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiReport {
    pub total_value_generated: f64,
    pub monthly_cost: f64,
    pub net_value: f64,
    pub roi_percentage: f64,
    /// Days of value needed to cover a month of cost; None while nothing has been generated
    pub payback_period_days: Option<f64>,
    pub agents_deployed: usize,
    pub autonomous_hours: f64,
    pub tasks_completed: u64,
    pub decisions_made: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "SCALE UP")]
    ScaleUp,
    #[serde(rename = "MAINTAIN")]
    Maintain,
}

impl Recommendation {
    /// SCALE UP strictly above the threshold
    pub fn for_roi(roi_percentage: f64, threshold: f64) -> Self {
        if roi_percentage > threshold {
            Self::ScaleUp
        } else {
            Self::Maintain
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScaleUp => "SCALE UP",
            Self::Maintain => "MAINTAIN",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub agents_active: usize,
    pub total_value_generated: f64,
    pub roi: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessImpact {
    pub productivity_gain: f64,
    pub cost_reduction: f64,
    pub employee_satisfaction: f64,
    pub innovation_increase: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveReport {
    pub timestamp: DateTime<Utc>,
    pub executive_summary: ExecutiveSummary,
    pub roi: RoiReport,
    pub agent_performance: BTreeMap<String, AgentStatus>,
    pub business_impact: BusinessImpact,
    pub future_recommendations: Vec<String>,
}

/// A company's full complement of workforce agents
pub struct Workforce {
    agents: Vec<AutonomousAgent>,
    config: WorkforceConfig,
    tick: Duration,
    company_size: usize,
}

impl Workforce {
    /// Deploy NIΛS, ΛBAS and DΛST agents sized to `company_size`, each with its standard goal
    pub fn deploy(config: &ShowcaseConfig, company_size: usize, now: DateTime<Utc>) -> ShowcaseResult<Self> {
        if company_size == 0 {
            return Err(ShowcaseError::config("Company size must be at least 1"));
        }
        info!("Deploying workforce for {} employee company", company_size);

        let mut agents = Vec::new();
        for kind in WORKFORCE_KINDS {
            let employees = config.workforce.employees_per_agent(kind).unwrap_or(company_size) as u64;
            let days = config
                .workforce
                .autonomous_days(kind)
                .unwrap_or(config.agents.max_autonomous_days);
            let settings = config.agents.with_autonomous_days(days);

            let first = agents.len();
            for i in 0..agents_needed(&config.workforce, kind, company_size) {
                let id = format!("{}_{:03}", kind.prefix(), i);
                let mut agent = AutonomousAgent::new(&id, behavior_for(kind, employees));
                if let Some(seed) = config.seed {
                    agent = agent.with_seed(agent_seed(seed, &id));
                }
                agent.initialize(&settings, now);
                agent.set_goal(standard_goal(kind, employees))?;
                agents.push(agent);
            }
            connect_all(&mut agents[first..]);
        }

        info!("Deployed {} workforce agents", agents.len());
        Ok(Self {
            agents,
            config: config.workforce.clone(),
            tick: Duration::milliseconds(config.agents.tick_interval_ms as i64),
            company_size,
        })
    }

    pub fn agents(&self) -> &[AutonomousAgent] {
        &self.agents
    }

    pub fn company_size(&self) -> usize {
        self.company_size
    }

    pub fn count_by_kind(&self) -> BTreeMap<AgentKind, usize> {
        let mut counts = BTreeMap::new();
        for agent in &self.agents {
            *counts.entry(agent.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Tick every agent `ticks` times in parallel; returns the simulated clock afterwards
    pub fn simulate(&mut self, ticks: u64, start: DateTime<Utc>) -> DateTime<Utc> {
        let mut now = start;
        for _ in 0..ticks {
            self.agents.par_iter_mut().for_each(|agent| {
                if let Err(e) = agent.tick_at(now) {
                    warn!("{}", e);
                }
            });
            now += self.tick;
        }
        now
    }

    /// Whether any agent errored or exhausted a task's retries
    pub fn has_errors(&self) -> bool {
        self.agents.iter().any(|a| a.status().has_failures())
    }

    pub fn calculate_roi(&self) -> RoiReport {
        let total_value: f64 = self.agents.iter().map(|a| a.metrics().value_generated).sum();
        let monthly_cost: f64 = self
            .agents
            .iter()
            .map(|a| self.config.monthly_cost(a.kind()))
            .sum();

        let roi_percentage = if monthly_cost > 0.0 {
            (total_value - monthly_cost) / monthly_cost * 100.0
        } else {
            0.0
        };
        let payback_period_days = (total_value > 0.0).then(|| monthly_cost / (total_value / 30.0));

        RoiReport {
            total_value_generated: total_value,
            monthly_cost,
            net_value: total_value - monthly_cost,
            roi_percentage,
            payback_period_days,
            agents_deployed: self.agents.len(),
            autonomous_hours: self.agents.iter().map(|a| a.metrics().uptime_hours).sum(),
            tasks_completed: self.agents.iter().map(|a| a.metrics().tasks_completed).sum(),
            decisions_made: self.agents.iter().map(|a| a.metrics().decisions_made).sum(),
        }
    }

    pub fn executive_report<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> ExecutiveReport {
        let roi = self.calculate_roi();
        let recommendation = Recommendation::for_roi(roi.roi_percentage, self.config.scale_up_roi_threshold);

        ExecutiveReport {
            timestamp: now,
            executive_summary: ExecutiveSummary {
                agents_active: self.agents.iter().filter(|a| a.state().is_active()).count(),
                total_value_generated: roi.total_value_generated,
                roi: roi.roi_percentage,
                recommendation,
            },
            agent_performance: self
                .agents
                .iter()
                .map(|a| (a.id().to_string(), a.status()))
                .collect(),
            business_impact: BusinessImpact {
                productivity_gain: rng.gen_range(0.25..0.45),
                cost_reduction: rng.gen_range(0.20..0.35),
                employee_satisfaction: rng.gen_range(0.15..0.30),
                innovation_increase: rng.gen_range(0.30..0.50),
            },
            future_recommendations: vec![
                "Deploy additional ΛBAS agents for Q2 planning".to_string(),
                "Integrate with GPT-5 for enhanced decision making".to_string(),
                "Expand to customer service with NIΛS agents".to_string(),
                "Implement predictive hiring with DΛST".to_string(),
            ],
            roi,
        }
    }
}

/// Make every agent in `agents` a collaborator of every other
fn connect_all(agents: &mut [AutonomousAgent]) {
    let links: Vec<_> = agents
        .iter()
        .map(|a| (a.id().to_string(), a.knowledge_sender()))
        .collect();
    for agent in agents.iter_mut() {
        for (peer, sender) in &links {
            if peer != agent.id() {
                agent.add_collaborator(peer.clone(), sender.clone());
            }
        }
    }
}
