//! Demo catalogue for the showcase portal
//!
//! Architecture: Static Catalogue - Demo metadata and overview text compiled into the binary
//! - Demos are looked up by menu number or by slug
//! - Demos without a runnable engine expose an overview instead
//! - The CLI decides how each entry is launched

use serde::Serialize;

/// What a catalogue entry launches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    Tone,
    Consciousness,
    QuantumReasoning,
    AbstractReasoning,
    Workforce,
    AutonomousFramework,
}

/// One entry of the portal menu
#[derive(Debug, Clone, Serialize)]
pub struct Demo {
    pub id: &'static str,
    pub slug: &'static str,
    pub kind: DemoKind,
    pub name: &'static str,
    /// Subsystem the demo exercises
    pub source: &'static str,
    pub description: &'static str,
    pub duration: &'static str,
    pub difficulty: &'static str,
}

pub const DEMOS: [Demo; 6] = [
    Demo {
        id: "1",
        slug: "tone",
        kind: DemoKind::Tone,
        name: "🎭 Three-Layer Tone System",
        source: "tone",
        description: "Experience adaptive communication across poetic, friendly, and academic styles",
        duration: "5-10 min",
        difficulty: "Beginner",
    },
    Demo {
        id: "2",
        slug: "consciousness",
        kind: DemoKind::Consciousness,
        name: "🧠 Consciousness State Transitions",
        source: "consciousness",
        description: "Watch bio-rhythmic patterns influence consciousness states",
        duration: "5-10 min",
        difficulty: "Intermediate",
    },
    Demo {
        id: "3",
        slug: "quantum-reasoning",
        kind: DemoKind::QuantumReasoning,
        name: "🔮 Quantum Reasoning Showcase",
        source: "reasoning",
        description: "Explore quantum-inspired reasoning mechanisms",
        duration: "10-15 min",
        difficulty: "Advanced",
    },
    Demo {
        id: "4",
        slug: "abstract-reasoning",
        kind: DemoKind::AbstractReasoning,
        name: "🎨 Abstract Reasoning Demo",
        source: "overview",
        description: "See symbolic reasoning and metaphor processing in action",
        duration: "10-15 min",
        difficulty: "Advanced",
    },
    Demo {
        id: "5",
        slug: "workforce",
        kind: DemoKind::Workforce,
        name: "🤖 Lambda Workforce Agents",
        source: "agents::workforce",
        description: "Commercial AI agent framework demonstration",
        duration: "15-20 min",
        difficulty: "Professional",
    },
    Demo {
        id: "6",
        slug: "agents",
        kind: DemoKind::AutonomousFramework,
        name: "🚀 Autonomous Agent Framework",
        source: "agents",
        description: "Self-organizing agent systems with LUKHΛS",
        duration: "15-20 min",
        difficulty: "Professional",
    },
];

/// Find a demo by menu number or slug, ignoring case
pub fn find(id: &str) -> Option<&'static Demo> {
    let id = id.trim();
    DEMOS
        .iter()
        .find(|demo| demo.id == id || demo.slug.eq_ignore_ascii_case(id))
}

pub fn banner() -> &'static str {
    BANNER
}

pub fn about() -> &'static str {
    ABOUT
}

/// Overview text for demos presented without a live engine
pub fn overview(kind: DemoKind) -> Option<&'static str> {
    match kind {
        DemoKind::AbstractReasoning => Some(ABSTRACT_REASONING_OVERVIEW),
        DemoKind::QuantumReasoning => Some(QUANTUM_REASONING_OVERVIEW),
        DemoKind::Workforce => Some(WORKFORCE_PREVIEW),
        _ => None,
    }
}

const BANNER: &str = "\
╔══════════════════════════════════════════════════════════════════════╗
║                                                                      ║
║                    L U K H Λ S   A I                                 ║
║         Logical Unified Knowledge Hyper-Adaptable System             ║
║                                                                      ║
║              \"Beyond prediction → toward reasoning\"                  ║
║              \"Beyond imitation → toward interpretation\"              ║
║              \"Beyond scale → toward structure\"                       ║
║                                                                      ║
╠══════════════════════════════════════════════════════════════════════╣
║                     INTERACTIVE SHOWCASE PORTAL                      ║
╚══════════════════════════════════════════════════════════════════════╝";

const ABOUT: &str = "\
═══════════════════════════════════════════════════════════════════════
                           ABOUT LUKHΛS AI
═══════════════════════════════════════════════════════════════════════

LUKHΛS is a cognitive architecture built around symbolic reasoning,
recursive logic and metaphorical understanding rather than statistical
pattern matching alone.

🔹 Core Innovations:
   • Symbolic-unified cognitive scaffold
   • Metaphor-to-function compilation engine
   • Foldable knowledge systems
   • Bio-inspired decision layers
   • Safety through structural constraints

🔹 Key Features:
   • Memory Folding Logic - Recursive, layered information storage
   • Mirror Architecture - Dual-phase processing and validation
   • Dream-to-Reason Pathway - Abstract synthesis to logical structure
   • Meta-Orchestration - Dynamic self-modification with safety
   • Metaphor Compiler - Natural language to executable logic

🔹 Philosophy:
   \"What if intelligence was structured, symbolic, safe, and still
   wildly creative?\"";

const ABSTRACT_REASONING_OVERVIEW: &str = "\
╔══════════════════════════════════════════════════════════════╗
║            ABSTRACT REASONING DEMO (Simplified)              ║
╚══════════════════════════════════════════════════════════════╝

This demo showcases LUKHΛS's abstract reasoning capabilities:

🎯 Key Features:
- Symbolic manipulation of abstract concepts
- Recursive logic pattern generation
- Metaphor-to-function compilation
- Constraint-based reasoning

The core concepts demonstrated:

   1. Pattern Recognition: Identifying abstract patterns in data
   2. Concept Folding: Compressing complex ideas into symbols
   3. Logic Synthesis: Creating new reasoning paths
   4. Validation: Ensuring logical consistency

💡 In production, this powers:
   - Creative problem solving
   - Scientific hypothesis generation
   - Artistic concept development
   - Strategic planning systems";

const QUANTUM_REASONING_OVERVIEW: &str = "\
╔══════════════════════════════════════════════════════════════╗
║       QUANTUM-INSPIRED REASONING (No Quantum Hardware!)      ║
╚══════════════════════════════════════════════════════════════╝

This demo shows how quantum metaphors become practical algorithms:

🌌 Quantum Concepts → Classical Computing:

1. SUPERPOSITION → Parallel exploration of solution spaces
   Instead of one path, explore multiple simultaneously

2. ENTANGLEMENT → Symbolic relationships between concepts
   Changes in one area affect related areas automatically

3. COLLAPSE → Decision crystallization
   Multiple possibilities resolve into optimal solution

4. INTERFERENCE → Pattern reinforcement/cancellation
   Compatible ideas strengthen, incompatible ones cancel

Example in action:
   Input: \"Find optimal route through complex constraints\"

   Step 1: Create superposition of all possible routes
   Step 2: Entangle routes with constraint evaluations
   Step 3: Apply interference (good routes amplify)
   Step 4: Collapse to optimal solution";

const WORKFORCE_PREVIEW: &str = "\
╔══════════════════════════════════════════════════════════════╗
║              LAMBDA WORKFORCE AGENTS PREVIEW                 ║
╚══════════════════════════════════════════════════════════════╝

🤖 Autonomous Agent Framework for Enterprise

🔄 Key Capabilities:
- Self-organizing teams of specialized agents
- Adaptive task distribution based on expertise
- Real-time collaboration and knowledge sharing
- Continuous learning from outcomes
- Human oversight when autonomy limits are reached

💼 Agents deployed by the simulation:
- NIΛS  - emotional intelligence, one per 100 employees
- ΛBAS  - attention and productivity, one per 200 employees
- DΛST  - context and knowledge orchestration, one per 500 employees";
