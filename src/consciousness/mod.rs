//! Consciousness state simulation driven by bio-rhythms
//!
//! Architecture: State Machine - Consciousness moves between six discrete intensity states
//! - BioRhythm produces a continuous 0..1 signal from four weighted sine bands
//! - The next state is the discrete state nearest to the (optionally stimulated) signal
//! - Randomness is injected by the caller so runs can be replayed from a seed

pub mod monitor;

use crate::config::ConsciousnessConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Discrete consciousness states, ordered by intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsciousnessState {
    Dormant,
    Dreaming,
    Aware,
    Focused,
    HyperFocused,
    Transcendent,
}

impl ConsciousnessState {
    pub const ALL: [ConsciousnessState; 6] = [
        Self::Dormant,
        Self::Dreaming,
        Self::Aware,
        Self::Focused,
        Self::HyperFocused,
        Self::Transcendent,
    ];

    pub fn intensity(self) -> f64 {
        match self {
            Self::Dormant => 0.1,
            Self::Dreaming => 0.3,
            Self::Aware => 0.5,
            Self::Focused => 0.7,
            Self::HyperFocused => 0.9,
            Self::Transcendent => 1.0,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Dormant => "💤",
            Self::Dreaming => "🌙",
            Self::Aware => "👁️",
            Self::Focused => "🎯",
            Self::HyperFocused => "⚡",
            Self::Transcendent => "🌟",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Dormant => "Dormant",
            Self::Dreaming => "Dreaming",
            Self::Aware => "Aware",
            Self::Focused => "Focused",
            Self::HyperFocused => "Hyper-Focused",
            Self::Transcendent => "Transcendent",
        }
    }

    /// State whose intensity is closest to `target`; ties go to the lower state
    pub fn nearest(target: f64) -> Self {
        let mut best = Self::Aware;
        let mut min_diff = f64::INFINITY;
        for state in Self::ALL {
            let diff = (state.intensity() - target).abs();
            if diff < min_diff {
                min_diff = diff;
                best = state;
            }
        }
        best
    }
}

impl fmt::Display for ConsciousnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.display_name())
    }
}

/// Brain-wave bands and their frequencies in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveBand {
    Gamma,
    Alpha,
    Theta,
    Delta,
}

impl WaveBand {
    pub const ALL: [WaveBand; 4] = [Self::Gamma, Self::Alpha, Self::Theta, Self::Delta];

    pub fn frequency(self) -> f64 {
        match self {
            Self::Gamma => 40.0,
            Self::Alpha => 8.0,
            Self::Theta => 4.0,
            Self::Delta => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gamma => "Gamma (40Hz)",
            Self::Alpha => "Alpha (8Hz)",
            Self::Theta => "Theta (4Hz)",
            Self::Delta => "Delta (1Hz)",
        }
    }

    /// What the band stands for in the monitor
    pub fn role(self) -> &'static str {
        match self {
            Self::Gamma => "Awareness",
            Self::Alpha => "Relaxation",
            Self::Theta => "Creativity",
            Self::Delta => "Deep Process",
        }
    }
}

/// Simulated biological rhythm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioRhythm {
    pub time: u64,
    weights: [f64; 4],
}

impl BioRhythm {
    pub fn new(config: &ConsciousnessConfig) -> Self {
        Self {
            time: 0,
            weights: [
                config.gamma_weight,
                config.alpha_weight,
                config.theta_weight,
                config.delta_weight,
            ],
        }
    }

    pub fn wave(&self, frequency: f64, amplitude: f64) -> f64 {
        amplitude * (2.0 * PI * frequency * self.time as f64 / 100.0).sin()
    }

    pub fn band(&self, band: WaveBand) -> f64 {
        self.wave(band.frequency(), 1.0)
    }

    /// Weighted sum of all bands mapped onto 0..1
    pub fn combined(&self) -> f64 {
        let sum: f64 = WaveBand::ALL
            .iter()
            .zip(self.weights)
            .map(|(band, weight)| self.wave(band.frequency(), weight))
            .sum();
        ((sum + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    pub fn advance(&mut self) {
        self.time += 1;
    }
}

/// Point-in-time view of the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsciousnessSnapshot {
    pub state: ConsciousnessState,
    pub intensity: f64,
    pub attention_focus: f64,
    pub energy_level: f64,
    pub memory_consolidation: f64,
    pub time: u64,
    pub recent: Vec<ConsciousnessState>,
}

/// Consciousness simulation
#[derive(Debug, Clone)]
pub struct Consciousness {
    current: ConsciousnessState,
    bio_rhythm: BioRhythm,
    attention_focus: f64,
    energy_level: f64,
    memory_consolidation: f64,
    history: Vec<ConsciousnessState>,
    config: ConsciousnessConfig,
}

impl Consciousness {
    pub fn new(config: &ConsciousnessConfig) -> Self {
        Self {
            current: ConsciousnessState::Aware,
            bio_rhythm: BioRhythm::new(config),
            attention_focus: 0.5,
            energy_level: 0.7,
            memory_consolidation: 0.3,
            history: Vec::new(),
            config: config.clone(),
        }
    }

    pub fn current_state(&self) -> ConsciousnessState {
        self.current
    }

    pub fn bio_rhythm(&self) -> &BioRhythm {
        &self.bio_rhythm
    }

    pub fn history(&self) -> &[ConsciousnessState] {
        &self.history
    }

    pub fn attention_focus(&self) -> f64 {
        self.attention_focus
    }

    pub fn energy_level(&self) -> f64 {
        self.energy_level
    }

    pub fn memory_consolidation(&self) -> f64 {
        self.memory_consolidation
    }

    /// Intensity the next state aims for before snapping to a discrete state
    pub fn target_intensity<R: Rng + ?Sized>(&self, stimulus: Option<f64>, rng: &mut R) -> f64 {
        let bio = self.bio_rhythm.combined();
        let base = match stimulus {
            Some(s) => (bio + s) / 2.0,
            None => bio,
        };
        let jitter = if self.config.jitter > 0.0 {
            rng.gen_range(-self.config.jitter..=self.config.jitter)
        } else {
            0.0
        };
        (base + jitter).clamp(0.0, 1.0)
    }

    pub fn calculate_next_state<R: Rng + ?Sized>(
        &self,
        stimulus: Option<f64>,
        rng: &mut R,
    ) -> ConsciousnessState {
        ConsciousnessState::nearest(self.target_intensity(stimulus, rng))
    }

    /// Move to `next`, updating the derived metrics; returns whether the state changed
    pub fn transition(&mut self, next: ConsciousnessState) -> bool {
        if next == self.current {
            return false;
        }

        tracing::debug!(
            "Consciousness {} -> {}",
            self.current.display_name(),
            next.display_name()
        );
        self.history.push(self.current);
        self.current = next;

        let intensity = next.intensity();
        self.attention_focus = intensity;
        self.energy_level = 0.3 + intensity * 0.7;
        self.memory_consolidation = 1.0 - intensity;
        true
    }

    /// Calculate, transition and advance the rhythm by one unit
    pub fn step<R: Rng + ?Sized>(&mut self, stimulus: Option<f64>, rng: &mut R) -> ConsciousnessState {
        let next = self.calculate_next_state(stimulus, rng);
        self.transition(next);
        self.bio_rhythm.advance();
        self.current
    }

    pub fn random_stimulus<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.config.stimulus_max > self.config.stimulus_min {
            rng.gen_range(self.config.stimulus_min..self.config.stimulus_max)
        } else {
            self.config.stimulus_min
        }
    }

    pub fn snapshot(&self) -> ConsciousnessSnapshot {
        let start = self.history.len().saturating_sub(self.config.history_window);
        ConsciousnessSnapshot {
            state: self.current,
            intensity: self.current.intensity(),
            attention_focus: self.attention_focus,
            energy_level: self.energy_level,
            memory_consolidation: self.memory_consolidation,
            time: self.bio_rhythm.time,
            recent: self.history[start..].to_vec(),
        }
    }

    pub fn history_window(&self) -> usize {
        self.config.history_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn still_config() -> ConsciousnessConfig {
        ConsciousnessConfig {
            jitter: 0.0,
            ..ConsciousnessConfig::default()
        }
    }

    #[test]
    fn test_combined_at_time_zero_is_midpoint() {
        let rhythm = BioRhythm::new(&ConsciousnessConfig::default());
        assert!((rhythm.combined() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_combined_stays_in_unit_range() {
        let mut rhythm = BioRhythm::new(&ConsciousnessConfig::default());
        for _ in 0..500 {
            let value = rhythm.combined();
            assert!((0.0..=1.0).contains(&value));
            rhythm.advance();
        }
    }

    #[rstest]
    #[case(0.0, ConsciousnessState::Dormant)]
    #[case(0.31, ConsciousnessState::Dreaming)]
    #[case(0.52, ConsciousnessState::Aware)]
    #[case(0.78, ConsciousnessState::Focused)]
    #[case(0.93, ConsciousnessState::HyperFocused)]
    #[case(0.99, ConsciousnessState::Transcendent)]
    fn test_nearest_state(#[case] target: f64, #[case] expected: ConsciousnessState) {
        assert_eq!(ConsciousnessState::nearest(target), expected);
    }

    #[test]
    fn test_stimulus_pulls_target() {
        let consciousness = Consciousness::new(&still_config());
        let mut rng = StdRng::seed_from_u64(0);
        // bio is 0.5 at t=0, so a full stimulus lands at 0.75
        let target = consciousness.target_intensity(Some(1.0), &mut rng);
        assert!((target - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_transition_updates_metrics() {
        let mut consciousness = Consciousness::new(&still_config());
        assert!(!consciousness.transition(ConsciousnessState::Aware));
        assert!(consciousness.history().is_empty());

        assert!(consciousness.transition(ConsciousnessState::Focused));
        assert_eq!(consciousness.history(), &[ConsciousnessState::Aware]);
        assert!((consciousness.attention_focus() - 0.7).abs() < 1e-12);
        assert!((consciousness.energy_level() - 0.79).abs() < 1e-12);
        assert!((consciousness.memory_consolidation() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_step_advances_rhythm() {
        let mut consciousness = Consciousness::new(&ConsciousnessConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            consciousness.step(None, &mut rng);
        }
        assert_eq!(consciousness.bio_rhythm().time, 10);
    }

    #[test]
    fn test_snapshot_keeps_recent_window() {
        let mut consciousness = Consciousness::new(&still_config());
        for state in [
            ConsciousnessState::Dormant,
            ConsciousnessState::Dreaming,
            ConsciousnessState::Focused,
            ConsciousnessState::HyperFocused,
            ConsciousnessState::Transcendent,
            ConsciousnessState::Aware,
            ConsciousnessState::Dormant,
        ] {
            consciousness.transition(state);
        }
        let snapshot = consciousness.snapshot();
        assert_eq!(snapshot.recent.len(), 5);
        assert_eq!(snapshot.recent.last(), Some(&ConsciousnessState::Aware));
    }

    #[test]
    fn test_random_stimulus_in_range() {
        let consciousness = Consciousness::new(&ConsciousnessConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let s = consciousness.random_stimulus(&mut rng);
            assert!((0.3..1.0).contains(&s));
        }
    }
}
