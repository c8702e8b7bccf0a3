//! Log level tags and the configured level set

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A level tag such as `info` or `audit`
///
/// Levels are plain tags rather than a severity ladder: an event is delivered
/// when its tag is a member of the logger's [`LevelSet`]. Tags are trimmed and
/// lowercased on construction so `"WARN"` and `"warn"` name the same level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LogLevel(Cow<'static, str>);

impl LogLevel {
    pub const INFO: LogLevel = LogLevel(Cow::Borrowed("info"));
    pub const WARN: LogLevel = LogLevel(Cow::Borrowed("warn"));
    pub const ERROR: LogLevel = LogLevel(Cow::Borrowed("error"));
    pub const DEBUG: LogLevel = LogLevel(Cow::Borrowed("debug"));

    pub fn new(tag: impl Into<String>) -> Self {
        let tag: String = tag.into();
        let normalized = tag.trim().to_lowercase();
        match normalized.as_str() {
            "info" => LogLevel::INFO,
            "warn" => LogLevel::WARN,
            "error" => LogLevel::ERROR,
            "debug" => LogLevel::DEBUG,
            _ => LogLevel(Cow::Owned(normalized)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase form used by text plugins (`[WARN]`)
    pub fn to_uppercase(&self) -> String {
        self.0.to_uppercase()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self.as_str() {
            "info" => Cyan,
            "warn" => Yellow,
            "error" => Red,
            "debug" => BrightBlack,
            _ => White,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let level = LogLevel::new(s);
        if level.is_empty() {
            Err(format!("Invalid log level: '{}'", s))
        } else {
            Ok(level)
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        LogLevel::new(s)
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        LogLevel::new(s)
    }
}

impl From<&LogLevel> for LogLevel {
    fn from(level: &LogLevel) -> Self {
        level.clone()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.0.into_owned()
    }
}

impl PartialEq<str> for LogLevel {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for LogLevel {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Levels recognized when no explicit set is configured
pub const DEFAULT_LEVELS: [LogLevel; 4] = [
    LogLevel::INFO,
    LogLevel::WARN,
    LogLevel::ERROR,
    LogLevel::DEBUG,
];

/// Ordered, duplicate-free, non-empty set of recognized level tags
///
/// Membership is checked on normalized tags, so a call logged as `"INFO"`
/// matches a set holding `info` and plugins see `info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LogLevel>", into = "Vec<LogLevel>")]
pub struct LevelSet {
    levels: Vec<LogLevel>,
}

impl LevelSet {
    /// Build a level set, keeping first-seen order and dropping duplicates
    ///
    /// # Errors
    ///
    /// Returns an invalid-configuration error when the set would be empty or
    /// contains an empty tag.
    pub fn new<I, L>(levels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<LogLevel>,
    {
        let mut unique: Vec<LogLevel> = Vec::new();
        for level in levels {
            let level = level.into();
            if level.is_empty() {
                return Err(LoggerError::config("LevelSet", "level tags must not be empty"));
            }
            if !unique.contains(&level) {
                unique.push(level);
            }
        }

        if unique.is_empty() {
            return Err(LoggerError::config("LevelSet", "at least one level is required"));
        }

        Ok(Self { levels: unique })
    }

    pub fn contains(&self, level: &LogLevel) -> bool {
        self.levels.iter().any(|l| l == level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLevel> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl TryFrom<Vec<LogLevel>> for LevelSet {
    type Error = LoggerError;

    fn try_from(levels: Vec<LogLevel>) -> Result<Self> {
        LevelSet::new(levels)
    }
}

impl From<LevelSet> for Vec<LogLevel> {
    fn from(set: LevelSet) -> Self {
        set.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_normalization() {
        assert_eq!(LogLevel::new("WARN"), LogLevel::WARN);
        assert_eq!(LogLevel::new("  Info "), LogLevel::INFO);
        assert_eq!(LogLevel::new("Audit").as_str(), "audit");
    }

    #[test]
    fn test_level_from_str() {
        let level: LogLevel = "error".parse().expect("valid level");
        assert_eq!(level, LogLevel::ERROR);
        assert!("   ".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_display() {
        assert_eq!(LogLevel::DEBUG.to_string(), "debug");
        assert_eq!(LogLevel::WARN.to_uppercase(), "WARN");
    }

    #[test]
    fn test_default_level_set() {
        let set = LevelSet::default();
        let tags: Vec<&str> = set.iter().map(LogLevel::as_str).collect();
        assert_eq!(tags, vec!["info", "warn", "error", "debug"]);
    }

    #[test]
    fn test_level_set_dedup_keeps_order() {
        let set = LevelSet::new(["error", "info", "ERROR"]).expect("valid set");
        assert_eq!(set.len(), 2);
        assert!(set.contains(&LogLevel::ERROR));
        assert!(set.contains(&LogLevel::INFO));
        assert!(!set.contains(&LogLevel::DEBUG));
    }

    #[test]
    fn test_level_set_rejects_empty() {
        let err = LevelSet::new(Vec::<LogLevel>::new()).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LevelSet::new([""]).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_level_set_serde() {
        let set: LevelSet = serde_json::from_str(r#"["Error", "audit"]"#).expect("deserialize");
        assert!(set.contains(&LogLevel::ERROR));
        assert!(set.contains(&LogLevel::new("audit")));

        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, r#"["error","audit"]"#);

        assert!(serde_json::from_str::<LevelSet>("[]").is_err());
    }
}
