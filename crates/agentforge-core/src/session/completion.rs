//! Filename completion for the command line.

use agentforge_types::project::GeneratedFile;

/// Complete the last whitespace-delimited token to the first filename it prefixes.
///
/// Returns the input unchanged when the last token is empty or matches nothing.
pub fn complete_filename(input: &str, files: &[GeneratedFile]) -> String {
    let split_at = input
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    let (head, token) = input.split_at(split_at);

    if token.is_empty() {
        return input.to_string();
    }
    match files.iter().find(|f| f.filename.starts_with(token)) {
        Some(file) => format!("{head}{}", file.filename),
        None => input.to_string(),
    }
}
