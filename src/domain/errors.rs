//! Error types shared by every showcase subsystem

/// Error types that can occur while running a demonstration
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    /// Configuration file could not be loaded, parsed or validated
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or written
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// An agent could not complete a lifecycle operation
    #[error("Agent error in {agent_id}: {message}")]
    Agent { agent_id: String, message: String },

    /// A single task failed while executing
    #[error("Task error in {action}: {message}")]
    Task { action: String, message: String },

    /// Agent state persistence failed
    #[error("State store error: {message}")]
    Store { message: String },

    /// Reasoning input was unusable
    #[error("Reasoning error: {message}")]
    Reasoning { message: String },

    /// JSON or YAML conversion failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ShowcaseError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an agent error
    pub fn agent(agent_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Agent {
            agent_id: agent_id.into(),
            message: message.into(),
        }
    }

    /// Create a task error
    pub fn task(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Task {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Create a state store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a reasoning error
    pub fn reasoning(message: impl Into<String>) -> Self {
        Self::Reasoning {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ShowcaseError {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e.to_string())
    }
}

/// Result type for showcase operations
pub type ShowcaseResult<T> = Result<T, ShowcaseError>;
