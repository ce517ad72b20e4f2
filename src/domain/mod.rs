//! Domain layer for the LUKHΛS showcase
//!
//! Architecture: Domain Model - Plain entities shared by every demonstration
//! - Agent goals, tasks and outcomes carry their own evaluation rules
//! - Errors are expressed once and reused across tone, consciousness, reasoning and agents
//! - Independent of terminals, files and the async runtime

pub mod agents;
pub mod errors;

// Re-export main domain types for convenience
pub use agents::*;
pub use errors::*;
