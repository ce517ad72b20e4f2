//! Quantum-inspired candidate selection
//!
//! Architecture: Pipeline - Four classical steps borrowed from quantum metaphors
//! - Superposition: every candidate starts with the same amplitude
//! - Entanglement and interference: constraint scores reinforce or cancel amplitudes
//! - Collapse: probabilities are squared amplitudes, resolved greedily or by sampling

use crate::domain::{ShowcaseError, ShowcaseResult};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A possible solution described by named numeric features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub features: BTreeMap<String, f64>,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: BTreeMap::new(),
        }
    }

    pub fn with_feature(mut self, feature: impl Into<String>, value: f64) -> Self {
        self.features.insert(feature.into(), value);
        self
    }

    pub fn feature(&self, feature: &str) -> Option<f64> {
        self.features.get(feature).copied()
    }
}

/// How a constraint judges a feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Lower is better, scored relative to the other candidates
    Minimize,
    /// Higher is better, scored relative to the other candidates
    Maximize,
    AtMost(f64),
    AtLeast(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub feature: String,
    pub kind: ConstraintKind,
    pub weight: f64,
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        feature: impl Into<String>,
        kind: ConstraintKind,
        weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            feature: feature.into(),
            kind,
            weight,
        }
    }

    /// Score every candidate against this constraint in 0..=1; a missing feature scores 0
    fn score_all(&self, candidates: &[Candidate]) -> Vec<f64> {
        let values: Vec<Option<f64>> = candidates.iter().map(|c| c.feature(&self.feature)).collect();
        let present = values.iter().flatten();
        let min = present.clone().copied().fold(f64::INFINITY, f64::min);
        let max = present.copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        values
            .into_iter()
            .map(|value| match (value, self.kind) {
                (None, _) => 0.0,
                (Some(_), ConstraintKind::Minimize | ConstraintKind::Maximize) if range <= 0.0 => 1.0,
                (Some(v), ConstraintKind::Minimize) => (max - v) / range,
                (Some(v), ConstraintKind::Maximize) => (v - min) / range,
                (Some(v), ConstraintKind::AtMost(limit)) => f64::from(u8::from(v <= limit)),
                (Some(v), ConstraintKind::AtLeast(limit)) => f64::from(u8::from(v >= limit)),
            })
            .collect()
    }
}

/// How the superposition resolves to one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapseMode {
    /// Highest probability; ties go to the earlier candidate
    #[default]
    MostProbable,
    /// Drawn from the probability distribution
    Sampled,
}

/// Result of collapsing a superposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collapse {
    pub chosen: String,
    pub index: usize,
    pub probability: f64,
    pub distribution: Vec<(String, f64)>,
}

/// Weighted amplitudes over a fixed candidate set
#[derive(Debug, Clone)]
pub struct Superposition {
    candidates: Vec<Candidate>,
    amplitudes: Vec<f64>,
    scores: Option<Vec<f64>>,
}

impl Superposition {
    pub fn new(candidates: Vec<Candidate>) -> ShowcaseResult<Self> {
        if candidates.is_empty() {
            return Err(ShowcaseError::reasoning("Superposition needs at least one candidate"));
        }
        let amplitudes = uniform(candidates.len());
        Ok(Self {
            candidates,
            amplitudes,
            scores: None,
        })
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    /// Constraint scores, available once entangled
    pub fn scores(&self) -> Option<&[f64]> {
        self.scores.as_deref()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a * a).collect()
    }

    pub fn distribution(&self) -> Vec<(String, f64)> {
        self.candidates
            .iter()
            .zip(self.probabilities())
            .map(|(c, p)| (c.name.clone(), p))
            .collect()
    }

    /// Score each candidate as the weighted mean of its constraint scores
    pub fn entangle(&mut self, constraints: &[Constraint]) -> ShowcaseResult<&[f64]> {
        let total_weight: f64 = constraints.iter().map(|c| c.weight).sum();
        if constraints.is_empty() || total_weight <= 0.0 || !total_weight.is_finite() {
            return Err(ShowcaseError::reasoning(
                "Entanglement needs constraints with a positive total weight",
            ));
        }

        let mut scores = vec![0.0; self.candidates.len()];
        for constraint in constraints {
            for (score, partial) in scores.iter_mut().zip(constraint.score_all(&self.candidates)) {
                *score += constraint.weight * partial;
            }
        }
        for score in &mut scores {
            *score /= total_weight;
        }

        tracing::debug!("Entangled {} candidates with {} constraints", scores.len(), constraints.len());
        Ok(self.scores.insert(scores).as_slice())
    }

    /// Reinforce candidates scoring above the mean and cancel those below it
    pub fn interfere(&mut self, rounds: u32, gain: f64) -> ShowcaseResult<()> {
        if !(gain > 0.0 && gain.is_finite()) {
            return Err(ShowcaseError::reasoning(format!("Interference gain must be positive, got {gain}")));
        }
        let scores = self
            .scores
            .as_ref()
            .ok_or_else(|| ShowcaseError::reasoning("Interference requires entangled candidates"))?;

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        for _ in 0..rounds {
            for (amplitude, score) in self.amplitudes.iter_mut().zip(scores) {
                *amplitude = (*amplitude * (1.0 + gain * (score - mean))).max(0.0);
            }
            normalize(&mut self.amplitudes);
        }
        Ok(())
    }

    pub fn collapse<R: Rng + ?Sized>(&self, mode: CollapseMode, rng: &mut R) -> ShowcaseResult<Collapse> {
        let probabilities = self.probabilities();
        let index = match mode {
            CollapseMode::MostProbable => probabilities
                .iter()
                .enumerate()
                .fold(0, |best, (i, p)| if *p > probabilities[best] { i } else { best }),
            CollapseMode::Sampled => WeightedIndex::new(&probabilities)
                .map_err(|e| ShowcaseError::reasoning(format!("Cannot sample collapse: {e}")))?
                .sample(rng),
        };

        Ok(Collapse {
            chosen: self.candidates[index].name.clone(),
            index,
            probability: probabilities[index],
            distribution: self.distribution(),
        })
    }
}

fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / (n as f64).sqrt(); n]
}

/// Rescale so squared amplitudes sum to one; a fully cancelled state resets to uniform
fn normalize(amplitudes: &mut [f64]) {
    let norm = amplitudes.iter().map(|a| a * a).sum::<f64>().sqrt();
    if norm > 0.0 {
        for a in amplitudes.iter_mut() {
            *a /= norm;
        }
    } else {
        let reset = uniform(amplitudes.len());
        amplitudes.copy_from_slice(&reset);
    }
}

/// Probability distribution captured after one pipeline step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub label: String,
    pub distribution: Vec<(String, f64)>,
}

/// Full trace of a reasoning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningRun {
    pub problem: String,
    pub steps: Vec<ReasoningStep>,
    pub scores: Vec<(String, f64)>,
    pub collapse: Collapse,
}

/// Run superposition, entanglement, interference and collapse in order
pub fn reason<R: Rng + ?Sized>(
    problem: &str,
    candidates: Vec<Candidate>,
    constraints: &[Constraint],
    rounds: u32,
    gain: f64,
    mode: CollapseMode,
    rng: &mut R,
) -> ShowcaseResult<ReasoningRun> {
    let mut superposition = Superposition::new(candidates)?;
    let mut steps = vec![ReasoningStep {
        label: "Superposition".to_string(),
        distribution: superposition.distribution(),
    }];

    let names: Vec<String> = superposition.candidates().iter().map(|c| c.name.clone()).collect();
    let scores: Vec<(String, f64)> = names
        .into_iter()
        .zip(superposition.entangle(constraints)?.iter().copied())
        .collect();

    superposition.interfere(rounds, gain)?;
    steps.push(ReasoningStep {
        label: format!("Interference x{rounds}"),
        distribution: superposition.distribution(),
    });

    let collapse = superposition.collapse(mode, rng)?;
    tracing::info!("Collapsed '{}' to {} (p={:.3})", problem, collapse.chosen, collapse.probability);

    Ok(ReasoningRun {
        problem: problem.to_string(),
        steps,
        scores,
        collapse,
    })
}

/// Problem statement of the built-in example
pub const ROUTE_PROBLEM: &str = "Find optimal route through complex constraints";

/// Five routes judged on travel time, risk, tolls and a distance cap
pub fn route_planning_example() -> (Vec<Candidate>, Vec<Constraint>) {
    let route = |name: &str, distance: f64, duration: f64, toll: f64, risk: f64| {
        Candidate::new(name)
            .with_feature("distance_km", distance)
            .with_feature("duration_min", duration)
            .with_feature("toll", toll)
            .with_feature("risk", risk)
    };

    let candidates = vec![
        route("Coastal Highway", 320.0, 240.0, 12.0, 0.2),
        route("Mountain Pass", 280.0, 260.0, 0.0, 0.6),
        route("City Express", 300.0, 200.0, 18.0, 0.3),
        route("Scenic Backroads", 360.0, 330.0, 0.0, 0.15),
        route("Freight Corridor", 420.0, 230.0, 8.0, 0.25),
    ];

    let constraints = vec![
        Constraint::new("fastest", "duration_min", ConstraintKind::Minimize, 0.4),
        Constraint::new("safest", "risk", ConstraintKind::Minimize, 0.3),
        Constraint::new("cheapest", "toll", ConstraintKind::Minimize, 0.2),
        Constraint::new("fuel range", "distance_km", ConstraintKind::AtMost(400.0), 0.1),
    ];

    (candidates, constraints)
}
