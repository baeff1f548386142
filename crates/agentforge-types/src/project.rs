//! Generated project files.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Filename of the project's entry point.
pub const ENTRY_POINT_FILE: &str = "main.py";

/// Filename of the project's core logic.
pub const CORE_LOGIC_FILE: &str = "agent.py";

/// Minimum number of files a generated project must contain.
pub const MIN_PROJECT_FILES: usize = 5;

/// One file of a generated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedFile {
    /// Filename including extension, e.g. "agent.py".
    pub filename: String,
    /// Full file contents.
    pub content: String,
}

impl GeneratedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// JSON schema of a whole project: an array of `{filename, content}` objects.
///
/// Objects are closed (`additionalProperties: false`) for strict structured output.
pub fn project_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(Vec<GeneratedFile>);
    let mut value = serde_json::to_value(schema).unwrap_or_default();
    crate::llm::add_additional_properties_false(&mut value);
    value
}

/// Find a file by exact filename.
pub fn find_file<'a>(files: &'a [GeneratedFile], filename: &str) -> Option<&'a GeneratedFile> {
    files.iter().find(|f| f.filename == filename)
}
