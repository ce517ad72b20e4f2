//! LUKHΛS Showcase - Adaptive tone, consciousness states and autonomous agents
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure domain logic separated from terminal and filesystem concerns
//! - Every demonstration is reachable as a typed API as well as through the CLI
//! - Randomness is injected so seeded runs are reproducible

pub mod agents;
pub mod config;
pub mod consciousness;
pub mod domain;
pub mod reasoning;
pub mod report;
pub mod showcase;
pub mod store;
pub mod tone;

// Re-export main types for convenient access
pub use domain::{
    AgentGoal, AgentKind, AgentMetrics, AgentPriority, AgentState, AgentTask, ShowcaseError,
    ShowcaseResult, TaskOutcome,
};

pub use config::{AgentSettings, ConfigBuilder, ShowcaseConfig};

pub use tone::{Exchange, ToneLayer, ToneSystem};

pub use consciousness::{Consciousness, ConsciousnessState};

pub use reasoning::{Collapse, CollapseMode, ReasoningRun};

pub use agents::{
    AgentBehavior, AgentOrchestrator, AutonomousAgent, ExecutiveReport, FleetStatus, RoiReport,
    Workforce,
};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use store::{StateStore, StoreStatistics};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Entry point bundling configuration, randomness and formatting
pub struct Showcase {
    config: ShowcaseConfig,
    formatter: ReportFormatter,
}

impl Showcase {
    /// Create a showcase with the given configuration
    pub fn new_with_config(config: ShowcaseConfig) -> ShowcaseResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            formatter: ReportFormatter::default(),
        })
    }

    /// Create a showcase with default configuration
    pub fn new() -> ShowcaseResult<Self> {
        Self::new_with_config(ShowcaseConfig::default())
    }

    /// Create a showcase loading configuration from file
    pub fn from_config_file<P: AsRef<std::path::Path>>(path: P) -> ShowcaseResult<Self> {
        Self::new_with_config(ShowcaseConfig::load_from_file(path)?)
    }

    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    pub fn formatter(&self) -> &ReportFormatter {
        &self.formatter
    }

    /// Seeded generator when a seed is configured, entropy otherwise
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn tone_system(&self) -> ShowcaseResult<ToneSystem> {
        ToneSystem::new(&self.config.tone)
    }

    pub fn consciousness(&self) -> Consciousness {
        Consciousness::new(&self.config.consciousness)
    }

    /// Run the built-in route-planning problem
    pub fn reason_route(&self, rounds: u32, gain: f64, mode: CollapseMode) -> ShowcaseResult<ReasoningRun> {
        let (candidates, constraints) = reasoning::route_planning_example();
        reasoning::reason(
            reasoning::ROUTE_PROBLEM,
            candidates,
            &constraints,
            rounds,
            gain,
            mode,
            &mut self.rng(),
        )
    }

    /// Deploy and simulate a workforce, returning it for reporting
    pub fn simulate_workforce(&self, company_size: usize, ticks: u64) -> ShowcaseResult<Workforce> {
        let start = Utc::now();
        let mut workforce = Workforce::deploy(&self.config, company_size, start)?;
        workforce.simulate(ticks, start);
        Ok(workforce)
    }

    pub fn state_store(&self) -> StateStore {
        StateStore::new(&self.config.agents.state_dir)
    }
}
