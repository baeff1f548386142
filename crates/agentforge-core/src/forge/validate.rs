//! Structural validation of a candidate project.

use agentforge_types::error::GenerationError;
use agentforge_types::project::{
    CORE_LOGIC_FILE, ENTRY_POINT_FILE, GeneratedFile, MIN_PROJECT_FILES, find_file,
};

/// Parse the collaborator's raw response into project files.
///
/// Fails with `MalformedResponse` when the text is not an array of
/// `{filename, content}` records and with `IncompleteProject` when it has
/// fewer than five files.
pub fn parse_project(raw: &str) -> Result<Vec<GeneratedFile>, GenerationError> {
    let files: Vec<GeneratedFile> = serde_json::from_str(raw.trim())
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    if files.len() < MIN_PROJECT_FILES {
        return Err(GenerationError::IncompleteProject { found: files.len() });
    }
    Ok(files)
}

/// Require both the entry point and the core logic file.
pub fn check_critical_files(files: &[GeneratedFile]) -> Result<(), GenerationError> {
    for filename in [ENTRY_POINT_FILE, CORE_LOGIC_FILE] {
        if find_file(files, filename).is_none() {
            return Err(GenerationError::MissingCriticalFile {
                filename: filename.to_string(),
            });
        }
    }
    Ok(())
}

/// Filenames that appear more than once, in first-seen order.
pub fn duplicate_filenames(files: &[GeneratedFile]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    let mut dups = Vec::new();
    for file in files {
        if !seen.insert(file.filename.as_str()) && !dups.contains(&file.filename.as_str()) {
            dups.push(file.filename.as_str());
        }
    }
    dups
}
