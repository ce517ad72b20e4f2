//! Fleet orchestration for autonomous agents
//!
//! Architecture: Coordinator - Owns the running agent tasks and their shutdown signals
//! - Each deployed agent runs its own tokio loop behind an Arc<Mutex<_>>
//! - Fleets are grouped by kind so they can be scaled up and down
//! - Shutdown signals every loop, waits for it and optionally persists the final state

use super::workforce::behavior_for;
use super::{agent_seed, run_agent, AgentStatus, AutonomousAgent};
use crate::config::{AgentSettings, WorkforceConfig};
use crate::domain::{AgentGoal, AgentKind, ShowcaseError, ShowcaseResult};
use crate::store::StateStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

struct Deployment {
    agent: Arc<Mutex<AutonomousAgent>>,
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    kind: AgentKind,
}

/// Aggregate view over every deployed agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetStatus {
    pub total_agents: usize,
    pub agents_by_kind: BTreeMap<AgentKind, usize>,
    pub total_value_generated: f64,
    pub total_tasks_completed: u64,
    pub agents: Vec<AgentStatus>,
}

/// Deploys, connects, scales and stops agents running on the tokio runtime
#[derive(Default)]
pub struct AgentOrchestrator {
    deployments: BTreeMap<String, Deployment>,
    /// Agent ids per kind in deployment order
    pools: BTreeMap<AgentKind, Vec<String>>,
    seed: Option<u64>,
    /// Staffing ratios that size specialist behaviors
    workforce: WorkforceConfig,
}

impl AgentOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive each fleet agent's random stream from `seed`
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_workforce(mut self, workforce: WorkforceConfig) -> Self {
        self.workforce = workforce;
        self
    }

    /// Employees one fleet agent of `kind` looks after
    pub fn employees_for(&self, kind: AgentKind) -> u64 {
        self.workforce.employees_per_agent(kind).unwrap_or(1) as u64
    }

    pub fn len(&self) -> usize {
        self.deployments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.deployments.keys().map(String::as_str)
    }

    pub fn pool(&self, kind: AgentKind) -> &[String] {
        self.pools.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Initialize `agent` and start its loop
    pub fn deploy_agent(&mut self, mut agent: AutonomousAgent, settings: &AgentSettings) -> ShowcaseResult<String> {
        let id = agent.id().to_string();
        if self.deployments.contains_key(&id) {
            return Err(ShowcaseError::agent(&id, "an agent with this id is already deployed"));
        }

        agent.initialize(settings, Utc::now());
        let kind = agent.kind();
        let agent = Arc::new(Mutex::new(agent));
        let (shutdown, receiver) = watch::channel(false);
        let handle = tokio::spawn(run_agent(agent.clone(), settings.tick_interval(), receiver));

        self.pools.entry(kind).or_default().push(id.clone());
        self.deployments.insert(
            id.clone(),
            Deployment {
                agent,
                handle,
                shutdown,
                kind,
            },
        );
        info!("Deployed agent {}", id);
        Ok(id)
    }

    /// Deploy `count` agents of `kind`, numbering ids after any already taken
    pub fn deploy_fleet(
        &mut self,
        kind: AgentKind,
        count: usize,
        settings: &AgentSettings,
    ) -> ShowcaseResult<Vec<String>> {
        let mut deployed = Vec::with_capacity(count);
        let mut index = 0usize;

        while deployed.len() < count {
            let id = format!("{}_{:03}", kind.prefix(), index);
            index += 1;
            if self.deployments.contains_key(&id) {
                continue;
            }

            let mut agent = AutonomousAgent::new(&id, behavior_for(kind, self.employees_for(kind)));
            if let Some(seed) = self.seed {
                agent = agent.with_seed(agent_seed(seed, &id));
            }
            deployed.push(self.deploy_agent(agent, settings)?);
        }

        info!("Deployed fleet of {} {} agents", count, kind.display_name());
        Ok(deployed)
    }

    fn deployment(&self, agent_id: &str) -> ShowcaseResult<&Deployment> {
        self.deployments
            .get(agent_id)
            .ok_or_else(|| ShowcaseError::agent(agent_id, "no such agent is deployed"))
    }

    pub async fn assign_goal(&self, agent_id: &str, goal: AgentGoal) -> ShowcaseResult<()> {
        let deployment = self.deployment(agent_id)?;
        deployment.agent.lock().await.set_goal(goal)
    }

    /// Make two deployed agents collaborators of each other
    pub async fn connect(&self, first: &str, second: &str) -> ShowcaseResult<()> {
        if first == second {
            return Err(ShowcaseError::agent(first, "an agent cannot collaborate with itself"));
        }
        let a = self.deployment(first)?;
        let b = self.deployment(second)?;

        let a_sender = a.agent.lock().await.knowledge_sender();
        let b_sender = b.agent.lock().await.knowledge_sender();
        a.agent.lock().await.add_collaborator(second, b_sender);
        b.agent.lock().await.add_collaborator(first, a_sender);
        Ok(())
    }

    /// Agents whose loop is still running and whose state counts as active
    pub async fn active_agents(&self) -> usize {
        let mut active = 0;
        for deployment in self.deployments.values() {
            if !deployment.handle.is_finished() && deployment.agent.lock().await.state().is_active() {
                active += 1;
            }
        }
        active
    }

    /// Approve every agent waiting for oversight; returns how many resumed
    pub async fn approve_pending_oversight(&self) -> usize {
        let now = Utc::now();
        let mut approved = 0;
        for deployment in self.deployments.values() {
            if deployment.agent.lock().await.approve_oversight(now) {
                approved += 1;
            }
        }
        approved
    }

    /// Grow or shrink the `kind` fleet to `target`; the newest agents are retired first
    pub async fn scale_fleet(
        &mut self,
        kind: AgentKind,
        target: usize,
        settings: &AgentSettings,
        store: Option<&StateStore>,
    ) -> ShowcaseResult<usize> {
        let current = self.pool(kind).len();

        if target > current {
            self.deploy_fleet(kind, target - current, settings)?;
        } else {
            let retiring: Vec<String> = self.pool(kind)[target..].iter().rev().cloned().collect();
            for id in retiring {
                self.retire(&id, store).await?;
            }
        }

        info!("Scaled {} fleet from {} to {}", kind.display_name(), current, target);
        Ok(self.pool(kind).len())
    }

    async fn retire(&mut self, agent_id: &str, store: Option<&StateStore>) -> ShowcaseResult<()> {
        let Some(deployment) = self.deployments.remove(agent_id) else {
            return Ok(());
        };
        if let Some(pool) = self.pools.get_mut(&deployment.kind) {
            pool.retain(|id| id != agent_id);
        }
        stop(deployment, store).await
    }

    pub async fn fleet_status(&self) -> FleetStatus {
        let mut agents = Vec::with_capacity(self.deployments.len());
        for deployment in self.deployments.values() {
            agents.push(deployment.agent.lock().await.status());
        }

        FleetStatus {
            total_agents: agents.len(),
            agents_by_kind: self
                .pools
                .iter()
                .filter(|(_, ids)| !ids.is_empty())
                .map(|(kind, ids)| (*kind, ids.len()))
                .collect(),
            total_value_generated: agents.iter().map(|a| a.value_generated).sum(),
            total_tasks_completed: agents.iter().map(|a| a.tasks_completed).sum(),
            agents,
        }
    }

    /// Stop every agent, persisting final snapshots when a store is given
    pub async fn shutdown_all(&mut self, store: Option<&StateStore>) -> ShowcaseResult<()> {
        info!("Shutting down {} agents", self.deployments.len());
        for deployment in self.deployments.values() {
            let _ = deployment.shutdown.send(true);
        }

        let mut first_error = None;
        for (_, deployment) in std::mem::take(&mut self.deployments) {
            if let Err(e) = stop(deployment, store).await {
                warn!("{}", e);
                first_error.get_or_insert(e);
            }
        }
        self.pools.clear();

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

async fn stop(deployment: Deployment, store: Option<&StateStore>) -> ShowcaseResult<()> {
    let _ = deployment.shutdown.send(true);
    if let Err(e) = deployment.handle.await {
        warn!("Agent loop ended abnormally: {}", e);
    }

    if let Some(store) = store {
        let snapshot = deployment.agent.lock().await.snapshot();
        store.save(&snapshot)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AgentState;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fast_settings() -> AgentSettings {
        AgentSettings {
            tick_interval_ms: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_deploy_fleet_ids() {
        let mut orchestrator = AgentOrchestrator::new().with_seed(Some(7));
        let ids = orchestrator
            .deploy_fleet(AgentKind::EmotionalIntelligence, 3, &fast_settings())
            .unwrap();
        assert_eq!(ids, vec!["nias_000", "nias_001", "nias_002"]);

        let more = orchestrator
            .deploy_fleet(AgentKind::EmotionalIntelligence, 2, &fast_settings())
            .unwrap();
        assert_eq!(more, vec!["nias_003", "nias_004"]);
        assert_eq!(orchestrator.len(), 5);

        orchestrator.shutdown_all(None).await.unwrap();
        assert!(orchestrator.is_empty());
    }

    #[test]
    fn test_fleet_sizing_follows_staffing_ratios() {
        let orchestrator = AgentOrchestrator::new();
        assert_eq!(orchestrator.employees_for(AgentKind::EmotionalIntelligence), 100);
        assert_eq!(orchestrator.employees_for(AgentKind::ContextOrchestrator), 500);

        let custom = AgentOrchestrator::new().with_workforce(WorkforceConfig {
            abas_employees_per_agent: 40,
            ..WorkforceConfig::default()
        });
        assert_eq!(custom.employees_for(AgentKind::ProductivityOptimizer), 40);
        assert_eq!(custom.employees_for(AgentKind::General), 1);
    }

    #[tokio::test]
    async fn test_duplicate_deploy_is_rejected() {
        let mut orchestrator = AgentOrchestrator::new();
        orchestrator
            .deploy_agent(AutonomousAgent::general("ops"), &fast_settings())
            .unwrap();
        let result = orchestrator.deploy_agent(AutonomousAgent::general("ops"), &fast_settings());
        assert!(matches!(result, Err(ShowcaseError::Agent { .. })));
        orchestrator.shutdown_all(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_agents_work_while_running() {
        let mut orchestrator = AgentOrchestrator::new().with_seed(Some(11));
        orchestrator
            .deploy_fleet(AgentKind::ProductivityOptimizer, 2, &fast_settings())
            .unwrap();
        orchestrator
            .assign_goal("abas_000", AgentGoal::new("Maximize productivity"))
            .await
            .unwrap();
        orchestrator.connect("abas_000", "abas_001").await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        let status = orchestrator.fleet_status().await;
        assert_eq!(status.total_agents, 2);
        assert_eq!(status.agents_by_kind[&AgentKind::ProductivityOptimizer], 2);
        assert!(status.total_tasks_completed > 0);
        assert!(status.total_value_generated > 0.0);

        orchestrator.shutdown_all(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_agent_and_self_connection() {
        let mut orchestrator = AgentOrchestrator::new();
        orchestrator
            .deploy_agent(AutonomousAgent::general("solo"), &fast_settings())
            .unwrap();

        assert!(orchestrator.assign_goal("ghost", AgentGoal::new("optimize")).await.is_err());
        assert!(orchestrator.connect("solo", "solo").await.is_err());
        assert!(orchestrator.connect("solo", "ghost").await.is_err());
        orchestrator.shutdown_all(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_scale_down_retires_newest_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path());
        let settings = fast_settings();
        let mut orchestrator = AgentOrchestrator::new();

        orchestrator
            .deploy_fleet(AgentKind::ContextOrchestrator, 4, &settings)
            .unwrap();
        let size = orchestrator
            .scale_fleet(AgentKind::ContextOrchestrator, 2, &settings, Some(&store))
            .await
            .unwrap();

        assert_eq!(size, 2);
        assert_eq!(orchestrator.pool(AgentKind::ContextOrchestrator), ["dast_000", "dast_001"]);
        assert_eq!(store.list().unwrap(), vec!["dast_002", "dast_003"]);

        let size = orchestrator
            .scale_fleet(AgentKind::ContextOrchestrator, 3, &settings, None)
            .await
            .unwrap();
        assert_eq!(size, 3);
        assert!(orchestrator.agent_ids().any(|id| id == "dast_002"));

        orchestrator.shutdown_all(Some(&store)).await.unwrap();
        assert_eq!(store.list().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_oversight_approval() {
        let settings = AgentSettings {
            tick_interval_ms: 5,
            max_autonomous_days: 0,
            auto_approve_oversight: false,
            ..Default::default()
        };
        let mut orchestrator = AgentOrchestrator::new();
        orchestrator
            .deploy_agent(AutonomousAgent::general("watched"), &settings)
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        let status = orchestrator.fleet_status().await;
        assert_eq!(status.agents[0].state, AgentState::Paused);
        assert_eq!(orchestrator.active_agents().await, 0);

        assert_eq!(orchestrator.approve_pending_oversight().await, 1);
        orchestrator.shutdown_all(None).await.unwrap();
    }
}
