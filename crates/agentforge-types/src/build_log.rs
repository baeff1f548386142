//! Build log lines emitted while a project is forged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity / stage tag of a build log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildLogLevel {
    Info,
    Gen,
    Validate,
    Deploy,
    Success,
    Error,
}

impl BuildLogLevel {
    /// Whether a line at this level ends a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, BuildLogLevel::Success | BuildLogLevel::Error)
    }
}

impl fmt::Display for BuildLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildLogLevel::Info => write!(f, "INFO"),
            BuildLogLevel::Gen => write!(f, "GEN"),
            BuildLogLevel::Validate => write!(f, "VALIDATE"),
            BuildLogLevel::Deploy => write!(f, "DEPLOY"),
            BuildLogLevel::Success => write!(f, "SUCCESS"),
            BuildLogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for BuildLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INFO" => Ok(BuildLogLevel::Info),
            "GEN" => Ok(BuildLogLevel::Gen),
            "VALIDATE" => Ok(BuildLogLevel::Validate),
            "DEPLOY" => Ok(BuildLogLevel::Deploy),
            "SUCCESS" => Ok(BuildLogLevel::Success),
            "ERROR" => Ok(BuildLogLevel::Error),
            other => Err(format!("invalid build log level: '{other}'")),
        }
    }
}

/// One line of forge progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildLogLine {
    pub level: BuildLogLevel,
    pub message: String,
}

impl BuildLogLine {
    pub fn new(level: BuildLogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for BuildLogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Append-only record of one forge run.
///
/// Lines are never reordered or mutated. Once a SUCCESS or ERROR line has
/// been pushed the log is terminal and further pushes are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildLog {
    lines: Vec<BuildLogLine>,
}

impl BuildLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Returns `false` if the log was already terminal.
    pub fn push(&mut self, line: BuildLogLine) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.lines.push(line);
        true
    }

    pub fn lines(&self) -> &[BuildLogLine] {
        &self.lines
    }

    pub fn levels(&self) -> Vec<BuildLogLevel> {
        self.lines.iter().map(|l| l.level).collect()
    }

    pub fn is_terminal(&self) -> bool {
        self.lines.last().is_some_and(|l| l.level.is_terminal())
    }

    /// The terminal line of a completed run, if any.
    pub fn outcome(&self) -> Option<&BuildLogLine> {
        self.lines.last().filter(|l| l.level.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display_roundtrip() {
        for level in [
            BuildLogLevel::Info,
            BuildLogLevel::Gen,
            BuildLogLevel::Validate,
            BuildLogLevel::Deploy,
            BuildLogLevel::Success,
            BuildLogLevel::Error,
        ] {
            let parsed: BuildLogLevel = level.to_string().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn test_level_serde_is_uppercase() {
        let json = serde_json::to_string(&BuildLogLevel::Validate).unwrap();
        assert_eq!(json, "\"VALIDATE\"");
    }

    #[test]
    fn test_build_log_stops_after_terminal_line() {
        let mut log = BuildLog::new();
        assert!(log.push(BuildLogLine::new(BuildLogLevel::Info, "start")));
        assert!(log.outcome().is_none());
        assert!(log.push(BuildLogLine::new(BuildLogLevel::Error, "boom")));
        assert!(!log.push(BuildLogLine::new(BuildLogLevel::Info, "late")));

        assert_eq!(log.lines().len(), 2);
        assert!(log.is_terminal());
        assert_eq!(log.outcome().unwrap().message, "boom");
    }

    #[test]
    fn test_line_display() {
        let line = BuildLogLine::new(BuildLogLevel::Gen, "Engaging model");
        assert_eq!(line.to_string(), "[GEN] Engaging model");
    }
}
