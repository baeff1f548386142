use thiserror::Error;

/// Classified failure of a forge pipeline run.
///
/// The display text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("The Forge is currently at maximum capacity. Please try again in a few moments.")]
    RateLimited,

    #[error("The Forge returned invalid data. Could not parse the project files.")]
    MalformedResponse(String),

    #[error("The Forge returned an incomplete or invalid project structure.")]
    IncompleteProject { found: usize },

    #[error("Validation failed: Critical files (main.py, agent.py) are missing.")]
    MissingCriticalFile { filename: String },

    #[error("The Forge did not respond within {secs}s.")]
    Timeout { secs: u64 },

    #[error("{0}")]
    Unknown(String),
}

impl GenerationError {
    /// Whether re-submitting the same order may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::RateLimited | GenerationError::Timeout { .. })
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Stable short name, used in structured logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::RateLimited => "rate_limited",
            GenerationError::MalformedResponse(_) => "malformed_response",
            GenerationError::IncompleteProject { .. } => "incomplete_project",
            GenerationError::MissingCriticalFile { .. } => "missing_critical_file",
            GenerationError::Timeout { .. } => "timeout",
            GenerationError::Unknown(_) => "unknown",
        }
    }
}

/// Failure reported by a code synthesis collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("synthesis capacity exhausted")]
    RateLimited,

    #[error("synthesis failed: {0}")]
    Failed(String),
}

impl From<SynthesisError> for GenerationError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::RateLimited => GenerationError::RateLimited,
            SynthesisError::Failed(message) => GenerationError::Unknown(message),
        }
    }
}

/// Failure reported by an execution backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("execution backend unavailable: {0}")]
    Unavailable(String),

    #[error("execution failed: {0}")]
    Failed(String),

    #[error("execution timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Errors from repository operations (used by trait definitions in agentforge-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Failure of a full forge-and-register run.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("agent could not be registered: {0}")]
    Registry(#[from] RepositoryError),
}
