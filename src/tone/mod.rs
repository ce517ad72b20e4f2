//! Three-layer adaptive tone system
//!
//! Architecture: Domain Service - ToneSystem turns free text into a tone layer and a reply
//! - KeywordSet compiles each configured word list into one case-insensitive RegexSet
//! - Layer selection is a pure function of the context analysis
//! - The session keeps its own history so the CLI only handles input and output

pub mod responses;

use crate::config::ToneConfig;
use crate::domain::{ShowcaseError, ShowcaseResult};
use rand::Rng;
use regex::{RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use responses::{ResponseKind, EXAMPLE_PROMPTS};

/// Communication layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneLayer {
    Poetic,
    UserFriendly,
    Academic,
}

impl ToneLayer {
    pub fn label(self) -> &'static str {
        match self {
            Self::Poetic => "🎨 Poetic",
            Self::UserFriendly => "💬 User Friendly",
            Self::Academic => "📚 Academic",
        }
    }
}

impl fmt::Display for ToneLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Emotional context detected in a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Inspired,
    SeekingHelp,
    Analytical,
    Neutral,
}

impl Emotion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inspired => "inspired",
            Self::SeekingHelp => "seeking_help",
            Self::Analytical => "analytical",
            Self::Neutral => "neutral",
        }
    }
}

/// Scores extracted from a single message
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextAnalysis {
    /// 0.0 casual .. 1.0 formal, 0.5 when no indicator is present
    pub formality: f64,
    pub emotion: Emotion,
    pub technical: f64,
    pub creative: f64,
}

/// A compiled keyword list; each keyword counts at most once per message
#[derive(Debug, Clone)]
pub struct KeywordSet {
    set: RegexSet,
}

impl KeywordSet {
    /// Compile keywords as case-insensitive literal substrings
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> ShowcaseResult<Self> {
        let patterns: Vec<String> = keywords
            .iter()
            .map(|k| regex::escape(k.as_ref()))
            .collect();

        let set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()
            .map_err(|e| ShowcaseError::config(format!("Invalid keyword list: {e}")))?;

        Ok(Self { set })
    }

    /// Number of distinct keywords present in `text`
    pub fn hits(&self, text: &str) -> usize {
        self.set.matches(text).iter().count()
    }

    pub fn any(&self, text: &str) -> bool {
        self.set.is_match(text)
    }
}

/// Compiled detectors for every context dimension
#[derive(Debug, Clone)]
pub struct ContextAnalyzer {
    formal: KeywordSet,
    casual: KeywordSet,
    inspired: KeywordSet,
    seeking_help: KeywordSet,
    analytical: KeywordSet,
    technical: KeywordSet,
    creative: KeywordSet,
    config: ToneConfig,
}

impl ContextAnalyzer {
    pub fn new(config: &ToneConfig) -> ShowcaseResult<Self> {
        Ok(Self {
            formal: KeywordSet::new(&config.formal_indicators)?,
            casual: KeywordSet::new(&config.casual_indicators)?,
            inspired: KeywordSet::new(&config.inspired_keywords)?,
            seeking_help: KeywordSet::new(&config.help_keywords)?,
            analytical: KeywordSet::new(&config.analytical_keywords)?,
            technical: KeywordSet::new(&config.technical_keywords)?,
            creative: KeywordSet::new(&config.creative_keywords)?,
            config: config.clone(),
        })
    }

    pub fn analyze(&self, text: &str) -> ContextAnalysis {
        ContextAnalysis {
            formality: self.formality(text),
            emotion: self.emotion(text),
            technical: (self.technical.hits(text) as f64 / self.config.technical_normalizer).min(1.0),
            creative: (self.creative.hits(text) as f64 / self.config.creative_normalizer).min(1.0),
        }
    }

    fn formality(&self, text: &str) -> f64 {
        let formal = self.formal.hits(text);
        let casual = self.casual.hits(text);
        if formal + casual == 0 {
            return 0.5;
        }
        formal as f64 / (formal + casual) as f64
    }

    fn emotion(&self, text: &str) -> Emotion {
        if self.inspired.any(text) {
            Emotion::Inspired
        } else if self.seeking_help.any(text) {
            Emotion::SeekingHelp
        } else if self.analytical.any(text) {
            Emotion::Analytical
        } else {
            Emotion::Neutral
        }
    }

    /// Poetic beats Academic beats User Friendly
    pub fn select_layer(&self, context: &ContextAnalysis) -> ToneLayer {
        if context.creative > self.config.creative_threshold || context.emotion == Emotion::Inspired {
            ToneLayer::Poetic
        } else if context.technical > self.config.technical_threshold
            || context.formality > self.config.formality_threshold
        {
            ToneLayer::Academic
        } else {
            ToneLayer::UserFriendly
        }
    }
}

/// A layer change caused by a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneTransition {
    pub from: ToneLayer,
    pub to: ToneLayer,
}

/// One message handled by the tone system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub input: String,
    pub context: ContextAnalysis,
    pub layer: ToneLayer,
    pub kind: ResponseKind,
    pub transition: Option<ToneTransition>,
    pub response: String,
}

/// Current session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneStatus {
    pub current_layer: ToneLayer,
    pub emotional_state: Emotion,
    pub interactions: usize,
}

/// Adaptive tone session
pub struct ToneSystem {
    analyzer: ContextAnalyzer,
    current_layer: ToneLayer,
    emotional_state: Emotion,
    history: Vec<Exchange>,
}

impl ToneSystem {
    pub fn new(config: &ToneConfig) -> ShowcaseResult<Self> {
        Ok(Self {
            analyzer: ContextAnalyzer::new(config)?,
            current_layer: ToneLayer::UserFriendly,
            emotional_state: Emotion::Neutral,
            history: Vec::new(),
        })
    }

    pub fn analyze_context(&self, input: &str) -> ContextAnalysis {
        self.analyzer.analyze(input)
    }

    pub fn select_tone_layer(&self, context: &ContextAnalysis) -> ToneLayer {
        self.analyzer.select_layer(context)
    }

    /// Template reply for `message` in `layer`; unmatched messages get a random kind
    pub fn generate_response<R: Rng + ?Sized>(
        &self,
        message: &str,
        layer: ToneLayer,
        rng: &mut R,
    ) -> (ResponseKind, &'static str) {
        let kind = ResponseKind::detect(message).unwrap_or_else(|| ResponseKind::random(rng));
        (kind, responses::template(layer, kind))
    }

    /// Analyze, adapt the layer and reply, recording the exchange
    pub fn respond<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> Exchange {
        let context = self.analyze_context(input);
        let layer = self.select_tone_layer(&context);

        let transition = (layer != self.current_layer).then(|| ToneTransition {
            from: self.current_layer,
            to: layer,
        });
        if let Some(t) = transition {
            tracing::debug!("Tone transition {:?} -> {:?}", t.from, t.to);
        }

        self.current_layer = layer;
        self.emotional_state = context.emotion;

        let (kind, response) = self.generate_response(input, layer, rng);
        let exchange = Exchange {
            input: input.to_string(),
            context,
            layer,
            kind,
            transition,
            response: response.to_string(),
        };

        self.history.push(exchange.clone());
        exchange
    }

    pub fn current_layer(&self) -> ToneLayer {
        self.current_layer
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    pub fn status(&self) -> ToneStatus {
        ToneStatus {
            current_layer: self.current_layer,
            emotional_state: self.emotional_state,
            interactions: self.history.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn system() -> ToneSystem {
        ToneSystem::new(&ToneConfig::default()).unwrap()
    }

    #[test]
    fn test_formality_defaults_to_neutral() {
        let ctx = system().analyze_context("nothing to see");
        assert_eq!(ctx.formality, 0.5);
        assert_eq!(ctx.emotion, Emotion::Neutral);
        assert_eq!(ctx.technical, 0.0);
        assert_eq!(ctx.creative, 0.0);
    }

    #[test]
    fn test_formality_ratio() {
        let ctx = system().analyze_context("Furthermore, regarding this hypothesis... yeah");
        assert!((ctx.formality - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_keywords_count_once_and_match_substrings() {
        let ctx = system().analyze_context("ALGORITHM algorithm algorithms");
        assert!((ctx.technical - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(ctx.emotion, Emotion::Analytical);
    }

    #[test]
    fn test_scores_are_clamped() {
        let ctx = system().analyze_context(
            "algorithm function implementation architecture framework with creative idea vision",
        );
        assert_eq!(ctx.technical, 1.0);
        assert_eq!(ctx.creative, 1.0);
    }

    #[rstest]
    #[case("Inspire me with your creative vision of the future", ToneLayer::Poetic)]
    #[case("Imagine a world where AI truly understands", ToneLayer::Poetic)]
    #[case("What is the theoretical foundation of your architecture?", ToneLayer::UserFriendly)]
    #[case(
        "I need help with a technical problem regarding algorithm implementation",
        ToneLayer::Academic
    )]
    #[case("Therefore the analysis of this hypothesis", ToneLayer::Academic)]
    #[case("algorithm function implementation framework", ToneLayer::Academic)]
    #[case("Hey, this is cool! Tell me more!", ToneLayer::UserFriendly)]
    fn test_layer_selection(#[case] input: &str, #[case] expected: ToneLayer) {
        let tone = system();
        let ctx = tone.analyze_context(input);
        assert_eq!(tone.select_tone_layer(&ctx), expected);
    }

    #[test]
    fn test_emotion_priority_order() {
        let tone = system();
        assert_eq!(
            tone.analyze_context("help me dream").emotion,
            Emotion::Inspired
        );
        assert_eq!(
            tone.analyze_context("stuck on data").emotion,
            Emotion::SeekingHelp
        );
    }

    #[test]
    fn test_respond_records_transition_and_history() {
        let mut tone = system();
        let mut rng = StdRng::seed_from_u64(1);

        let first = tone.respond("Hello, can you explain how you work?", &mut rng);
        assert!(first.transition.is_none());
        assert_eq!(first.kind, ResponseKind::Greeting);
        assert_eq!(first.layer, ToneLayer::UserFriendly);

        let second = tone.respond("Imagine a world where AI truly understands", &mut rng);
        assert_eq!(
            second.transition,
            Some(ToneTransition {
                from: ToneLayer::UserFriendly,
                to: ToneLayer::Poetic
            })
        );
        assert_eq!(tone.current_layer(), ToneLayer::Poetic);

        let status = tone.status();
        assert_eq!(status.interactions, 2);
        assert_eq!(status.emotional_state, Emotion::Inspired);
    }

    #[test]
    fn test_unmatched_message_still_gets_a_template() {
        let tone = system();
        let mut rng = StdRng::seed_from_u64(99);
        let (kind, text) = tone.generate_response("zzz", ToneLayer::Academic, &mut rng);
        assert_eq!(text, responses::template(ToneLayer::Academic, kind));
    }
}
