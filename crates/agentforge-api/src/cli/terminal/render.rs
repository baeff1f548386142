//! Printing of session lines to the terminal.

use console::style;

use agentforge_types::project::GeneratedFile;
use agentforge_types::terminal::{LineKind, TerminalLine};

/// Prints the session buffer incrementally.
///
/// Tracks how many buffer lines have been printed so each turn only shows
/// what is new. Input lines are skipped by default since readline already
/// echoed them.
pub struct LineRenderer {
    printed: usize,
    echo_input: bool,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self {
            printed: 0,
            echo_input: false,
        }
    }

    /// Print lines added since the last call.
    pub fn print_new(&mut self, lines: &[TerminalLine]) {
        // The buffer only shrinks when cleared.
        if lines.len() < self.printed {
            self.printed = 0;
        }
        for line in &lines[self.printed..] {
            if let Some(text) = self.format(line) {
                println!("{text}");
            }
        }
        self.printed = lines.len();
    }

    /// Forget printed lines after the buffer was cleared.
    pub fn reset(&mut self) {
        self.printed = 0;
    }

    fn format(&self, line: &TerminalLine) -> Option<String> {
        match line.kind {
            LineKind::Input if !self.echo_input => None,
            _ => Some(format_line(line)),
        }
    }
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Style one line by its kind, indenting every physical line.
pub fn format_line(line: &TerminalLine) -> String {
    let body = indent(&line.content);
    match line.kind {
        LineKind::Input => format!("  {} {}", style("$").green().bold(), line.content),
        LineKind::Output => body,
        LineKind::System => style(body).cyan().to_string(),
        LineKind::Error => style(body).red().to_string(),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("  {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print one project file with line numbers, as the file viewer would.
pub fn print_file(file: &GeneratedFile) {
    println!();
    println!("  {}", style(&file.filename).bold().underlined());
    let width = file.content.lines().count().max(1).to_string().len();
    for (i, line) in file.content.lines().enumerate() {
        println!("  {} {line}", style(format!("{:>width$}", i + 1)).dim());
    }
    println!();
}

/// Print the project file list, marking the active file.
pub fn print_file_list(files: &[GeneratedFile], active: Option<&str>) {
    println!();
    for file in files {
        let marker = if Some(file.filename.as_str()) == active {
            style(">").cyan().bold().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {marker} {}  {}",
            file.filename,
            style(format!("{} lines", file.content.lines().count())).dim()
        );
    }
    println!();
}
