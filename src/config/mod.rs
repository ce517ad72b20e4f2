//! Configuration loading and management for the showcase
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to typed settings for every demonstration
//! - Default keyword lists and thresholds are embedded here, not in the demos
//! - Every section is optional in YAML and falls back to its defaults

use crate::domain::{AgentKind, ShowcaseError, ShowcaseResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File names searched in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILES: &[&str] = &["lukhas.yaml", "lukhas.yml", ".lukhas.yaml"];

/// Longest autonomy window an agent may be configured with
pub const MAX_AUTONOMOUS_DAYS: i64 = 3650;

/// Main configuration structure for the showcase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowcaseConfig {
    /// Configuration format version
    pub version: String,
    #[serde(default)]
    pub tone: ToneConfig,
    #[serde(default)]
    pub consciousness: ConsciousnessConfig,
    #[serde(default)]
    pub agents: AgentSettings,
    #[serde(default)]
    pub workforce: WorkforceConfig,
    /// Seed for reproducible randomness; entropy is used when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Keyword lists and thresholds for the tone system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    pub formal_indicators: Vec<String>,
    pub casual_indicators: Vec<String>,
    pub inspired_keywords: Vec<String>,
    pub help_keywords: Vec<String>,
    pub analytical_keywords: Vec<String>,
    pub technical_keywords: Vec<String>,
    pub creative_keywords: Vec<String>,
    /// Technical hits are divided by this before clamping to 1.0
    pub technical_normalizer: f64,
    /// Creative hits are divided by this before clamping to 1.0
    pub creative_normalizer: f64,
    pub creative_threshold: f64,
    pub technical_threshold: f64,
    pub formality_threshold: f64,
}

/// Settings for the consciousness state simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsciousnessConfig {
    /// Half-width of the uniform jitter added to the target intensity
    pub jitter: f64,
    pub stimulus_min: f64,
    pub stimulus_max: f64,
    pub gamma_weight: f64,
    pub alpha_weight: f64,
    pub theta_weight: f64,
    pub delta_weight: f64,
    /// Number of past states shown by the monitor
    pub history_window: usize,
}

/// Defaults applied to every deployed agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub max_autonomous_days: i64,
    pub decision_threshold: f64,
    pub learning_rate: f64,
    pub max_retries: u32,
    pub tick_interval_ms: u64,
    /// Finished tasks between learning passes
    pub learn_every: u64,
    /// Error rate above which human oversight is requested
    pub max_error_rate: f64,
    /// Resume paused agents without waiting for an operator
    pub auto_approve_oversight: bool,
    /// Directory holding persisted agent snapshots
    pub state_dir: PathBuf,
}

/// Staffing ratios, autonomy windows and pricing for the workforce demo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkforceConfig {
    pub nias_employees_per_agent: usize,
    pub abas_employees_per_agent: usize,
    pub dast_employees_per_agent: usize,
    pub nias_monthly_cost: f64,
    pub abas_monthly_cost: f64,
    pub dast_monthly_cost: f64,
    /// Cost used for agent kinds without a price
    pub default_monthly_cost: f64,
    pub nias_autonomous_days: i64,
    pub abas_autonomous_days: i64,
    pub dast_autonomous_days: i64,
    /// ROI percentage above which the executive report recommends scaling up
    pub scale_up_roi_threshold: f64,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            formal_indicators: words(&["therefore", "furthermore", "analysis", "hypothesis", "regarding"]),
            casual_indicators: words(&["hey", "cool", "awesome", "yeah", "stuff"]),
            inspired_keywords: words(&["inspire", "dream", "imagine", "create"]),
            help_keywords: words(&["help", "confused", "stuck", "problem"]),
            analytical_keywords: words(&["technical", "analyze", "data", "algorithm"]),
            technical_keywords: words(&["algorithm", "function", "implementation", "architecture", "framework"]),
            creative_keywords: words(&["creative", "imagine", "idea", "inspire", "dream", "vision"]),
            technical_normalizer: 3.0,
            creative_normalizer: 2.0,
            creative_threshold: 0.6,
            technical_threshold: 0.6,
            formality_threshold: 0.7,
        }
    }
}

impl Default for ConsciousnessConfig {
    fn default() -> Self {
        Self {
            jitter: 0.1,
            stimulus_min: 0.3,
            stimulus_max: 1.0,
            gamma_weight: 0.4,
            alpha_weight: 0.3,
            theta_weight: 0.2,
            delta_weight: 0.1,
            history_window: 5,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_autonomous_days: 7,
            decision_threshold: 0.8,
            learning_rate: 0.1,
            max_retries: 3,
            tick_interval_ms: 1000,
            learn_every: 10,
            max_error_rate: 0.1,
            auto_approve_oversight: true,
            state_dir: PathBuf::from("data").join("agents"),
        }
    }
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            nias_employees_per_agent: 100,
            abas_employees_per_agent: 200,
            dast_employees_per_agent: 500,
            nias_monthly_cost: 5000.0,
            abas_monthly_cost: 8000.0,
            dast_monthly_cost: 6000.0,
            default_monthly_cost: 5000.0,
            nias_autonomous_days: 7,
            abas_autonomous_days: 7,
            dast_autonomous_days: 14,
            scale_up_roi_threshold: 200.0,
        }
    }
}

impl AgentSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Copy of these settings with a different autonomy window
    pub fn with_autonomous_days(&self, days: i64) -> Self {
        Self {
            max_autonomous_days: days,
            ..self.clone()
        }
    }
}

impl WorkforceConfig {
    /// Monthly subscription cost for one agent of `kind`
    pub fn monthly_cost(&self, kind: AgentKind) -> f64 {
        match kind {
            AgentKind::EmotionalIntelligence => self.nias_monthly_cost,
            AgentKind::ProductivityOptimizer => self.abas_monthly_cost,
            AgentKind::ContextOrchestrator => self.dast_monthly_cost,
            AgentKind::General => self.default_monthly_cost,
        }
    }

    /// Employees covered by one agent of `kind`, if it is staffed by ratio
    pub fn employees_per_agent(&self, kind: AgentKind) -> Option<usize> {
        match kind {
            AgentKind::EmotionalIntelligence => Some(self.nias_employees_per_agent),
            AgentKind::ProductivityOptimizer => Some(self.abas_employees_per_agent),
            AgentKind::ContextOrchestrator => Some(self.dast_employees_per_agent),
            AgentKind::General => None,
        }
    }

    pub fn autonomous_days(&self, kind: AgentKind) -> Option<i64> {
        match kind {
            AgentKind::EmotionalIntelligence => Some(self.nias_autonomous_days),
            AgentKind::ProductivityOptimizer => Some(self.abas_autonomous_days),
            AgentKind::ContextOrchestrator => Some(self.dast_autonomous_days),
            AgentKind::General => None,
        }
    }
}

impl ShowcaseConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ShowcaseResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            ShowcaseError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            ShowcaseError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> ShowcaseResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ShowcaseError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the first default file present, else defaults
    pub fn discover(path: Option<&Path>) -> ShowcaseResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        for name in DEFAULT_CONFIG_FILES {
            if Path::new(name).exists() {
                tracing::debug!("Loading configuration from {}", name);
                return Self::load_from_file(name);
            }
        }

        Ok(Self::default())
    }

    /// Get default configuration
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            tone: ToneConfig::default(),
            consciousness: ConsciousnessConfig::default(),
            agents: AgentSettings::default(),
            workforce: WorkforceConfig::default(),
            seed: None,
        }
    }

    /// Validate thresholds, keyword lists and ratios
    pub fn validate(&self) -> ShowcaseResult<()> {
        let tone = &self.tone;
        let keyword_lists = [
            ("formal_indicators", &tone.formal_indicators),
            ("casual_indicators", &tone.casual_indicators),
            ("inspired_keywords", &tone.inspired_keywords),
            ("help_keywords", &tone.help_keywords),
            ("analytical_keywords", &tone.analytical_keywords),
            ("technical_keywords", &tone.technical_keywords),
            ("creative_keywords", &tone.creative_keywords),
        ];
        for (name, list) in keyword_lists {
            if list.is_empty() || list.iter().any(|w| w.trim().is_empty()) {
                return Err(ShowcaseError::config(format!(
                    "tone.{name} must contain at least one non-empty keyword"
                )));
            }
        }

        let unit_values = [
            ("tone.creative_threshold", tone.creative_threshold),
            ("tone.technical_threshold", tone.technical_threshold),
            ("tone.formality_threshold", tone.formality_threshold),
            ("consciousness.jitter", self.consciousness.jitter),
            ("consciousness.stimulus_min", self.consciousness.stimulus_min),
            ("consciousness.stimulus_max", self.consciousness.stimulus_max),
            ("agents.decision_threshold", self.agents.decision_threshold),
            ("agents.learning_rate", self.agents.learning_rate),
            ("agents.max_error_rate", self.agents.max_error_rate),
        ];
        for (name, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                return Err(ShowcaseError::config(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }

        if tone.technical_normalizer <= 0.0 || tone.creative_normalizer <= 0.0 {
            return Err(ShowcaseError::config("tone normalizers must be positive"));
        }

        if self.consciousness.stimulus_min >= self.consciousness.stimulus_max {
            return Err(ShowcaseError::config(
                "consciousness.stimulus_min must be below stimulus_max",
            ));
        }

        if self.agents.tick_interval_ms == 0 {
            return Err(ShowcaseError::config("agents.tick_interval_ms must be non-zero"));
        }

        if self.agents.learn_every == 0 {
            return Err(ShowcaseError::config("agents.learn_every must be non-zero"));
        }

        let workforce = &self.workforce;
        let autonomy_windows = [
            ("agents.max_autonomous_days", self.agents.max_autonomous_days),
            ("workforce.nias_autonomous_days", workforce.nias_autonomous_days),
            ("workforce.abas_autonomous_days", workforce.abas_autonomous_days),
            ("workforce.dast_autonomous_days", workforce.dast_autonomous_days),
        ];
        for (name, days) in autonomy_windows {
            if !(1..=MAX_AUTONOMOUS_DAYS).contains(&days) {
                return Err(ShowcaseError::config(format!(
                    "{name} must be between 1 and {MAX_AUTONOMOUS_DAYS}, got {days}"
                )));
            }
        }

        if workforce.nias_employees_per_agent == 0
            || workforce.abas_employees_per_agent == 0
            || workforce.dast_employees_per_agent == 0
        {
            return Err(ShowcaseError::config(
                "workforce staffing ratios must be positive",
            ));
        }

        Ok(())
    }

    /// Convert to YAML for display or export
    pub fn to_yaml(&self) -> ShowcaseResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ShowcaseError::config(format!("Failed to serialize config: {e}")))
    }

    /// SHA-256 fingerprint of the serialized configuration
    pub fn fingerprint(&self) -> String {
        // serde_json keeps struct field order, so the digest is stable
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: ShowcaseConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ShowcaseConfig::default(),
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn tick_interval_ms(mut self, millis: u64) -> Self {
        self.config.agents.tick_interval_ms = millis;
        self
    }

    pub fn state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.agents.state_dir = dir.into();
        self
    }

    pub fn auto_approve_oversight(mut self, enabled: bool) -> Self {
        self.config.agents.auto_approve_oversight = enabled;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ShowcaseResult<ShowcaseConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
