//! CodeSynthesisClient trait definition (port).

use agentforge_types::error::SynthesisError;
use agentforge_types::order::OrderDetails;

/// Target output shape handed to the synthesis collaborator.
#[derive(Debug, Clone)]
pub struct ProjectSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

impl ProjectSchema {
    /// Array of `{filename, content}` records.
    pub fn generated_files() -> Self {
        Self {
            name: "GeneratedProject".to_string(),
            schema: agentforge_types::project::project_schema(),
        }
    }
}

/// Everything a synthesis collaborator needs to produce one project.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Natural-language generation instructions.
    pub prompt: String,
    pub details: OrderDetails,
    pub schema: ProjectSchema,
}

/// External code-synthesis collaborator.
///
/// Returns the raw candidate project text; parsing and validation belong to
/// the pipeline. Implementations live in agentforge-infra.
pub trait CodeSynthesisClient: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<String, SynthesisError>> + Send;
}
