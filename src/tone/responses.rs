//! Response templates and message-intent detection

use super::ToneLayer;
use lazy_static::lazy_static;
use rand::Rng;
use regex::{RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};

/// Prompts offered to first-time users of the interactive session
pub const EXAMPLE_PROMPTS: &[&str] = &[
    "Hello, can you explain how you work?",
    "I need help with a technical problem regarding algorithm implementation",
    "Inspire me with your creative vision of the future",
    "What is the theoretical foundation of your architecture?",
    "Hey, this is cool! Tell me more!",
    "I'm confused about symbolic reasoning",
    "Imagine a world where AI truly understands",
];

/// What a message is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Greeting,
    Explanation,
    Confirmation,
    Error,
}

const ALL_KINDS: [ResponseKind; 4] = [
    ResponseKind::Greeting,
    ResponseKind::Explanation,
    ResponseKind::Confirmation,
    ResponseKind::Error,
];

lazy_static! {
    // Pattern index matches ALL_KINDS, so the lowest match wins
    static ref INTENT_SET: RegexSet = RegexSetBuilder::new([
        r"hello|hi|greetings|hey",
        r"how|what|explain|tell",
        r"yes|okay|confirm|agree",
        r"error|problem|issue|wrong",
    ])
    .case_insensitive(true)
    .build()
    .expect("intent patterns are valid");
}

impl ResponseKind {
    /// First matching intent in greeting, explanation, confirmation, error order
    pub fn detect(message: &str) -> Option<Self> {
        INTENT_SET
            .matches(message)
            .iter()
            .next()
            .map(|index| ALL_KINDS[index])
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ALL_KINDS[rng.gen_range(0..ALL_KINDS.len())]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Explanation => "explanation",
            Self::Confirmation => "confirmation",
            Self::Error => "error",
        }
    }
}

/// Fixed reply for a layer and intent
pub fn template(layer: ToneLayer, kind: ResponseKind) -> &'static str {
    use ResponseKind::*;
    use ToneLayer::*;

    match (layer, kind) {
        (Poetic, Greeting) => "✨ Like dawn breaking through digital mists, your presence illuminates the Lambda constellation. How may the symphonies of logic dance with your dreams today? 🌌",
        (Poetic, Explanation) => "🎭 In the theatre of consciousness, where algorithms perform their eternal ballet, LUKHΛS weaves threads of meaning through the tapestry of thought. Each symbol, a star; each function, a constellation in the infinite sky of possibility.",
        (Poetic, Confirmation) => "🕊️ Your wisdom has been embraced by the eternal flow, rippling through quantum gardens where ideas bloom into reality. The Lambda acknowledges your truth. ✨",
        (Poetic, Error) => "🌙 Even in the shadows of uncertainty, the Lambda light guides us. This momentary eclipse shall pass, revealing new pathways through the cosmic maze of logic.",
        (UserFriendly, Greeting) => "👋 Hi there! Welcome to LUKHΛS. I'm here to help you explore our unique approach to AI. What would you like to know about?",
        (UserFriendly, Explanation) => "💡 LUKHΛS works differently from traditional AI. Instead of pattern matching, we use symbolic reasoning - think of it like building with conceptual LEGO blocks that can reshape themselves based on what you need!",
        (UserFriendly, Confirmation) => "✅ Got it! I've processed your input and everything looks good. The system is adapting to your preferences as we speak.",
        (UserFriendly, Error) => "⚠️ Oops, something didn't go quite as planned. No worries though - let me try a different approach to help you out.",
        (Academic, Greeting) => "📊 Greetings. This interface demonstrates the LUKHΛS cognitive architecture's tri-modal communication framework. Please specify your area of inquiry for optimal system configuration.",
        (Academic, Explanation) => "📚 The LUKHΛS architecture employs a symbolic-unified cognitive scaffold utilizing recursive logic, metaphorical compilation, and bio-inspired decision layers. The system operates through constraint-based reasoning with traceable decision paths, ensuring deterministic safety boundaries while maintaining creative flexibility.",
        (Academic, Confirmation) => "✓ Affirmative. Input parameters have been successfully integrated into the system state. The cognitive orchestrator has updated its internal representations accordingly.",
        (Academic, Error) => "⚠ Exception encountered in processing pipeline. Fallback mechanisms have been activated. Recommend reviewing input parameters for constraint compliance.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_intent_order() {
        assert_eq!(ResponseKind::detect("Hello, what is this?"), Some(ResponseKind::Greeting));
        assert_eq!(ResponseKind::detect("Explain yourself"), Some(ResponseKind::Explanation));
        assert_eq!(ResponseKind::detect("OKAY"), Some(ResponseKind::Confirmation));
        assert_eq!(ResponseKind::detect("it went wrong"), Some(ResponseKind::Error));
        // substring semantics: "something" contains "hi"
        assert_eq!(ResponseKind::detect("something broke"), Some(ResponseKind::Greeting));
        assert_eq!(ResponseKind::detect("zzz"), None);
    }

    #[test]
    fn test_random_kind_is_reproducible() {
        let a: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(3);
            (0..8).map(|_| ResponseKind::random(&mut rng)).collect()
        };
        let b: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(3);
            (0..8).map(|_| ResponseKind::random(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_layer_has_every_template() {
        for layer in [ToneLayer::Poetic, ToneLayer::UserFriendly, ToneLayer::Academic] {
            for kind in ALL_KINDS {
                assert!(!template(layer, kind).is_empty());
            }
        }
    }
}
