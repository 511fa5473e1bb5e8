//! # Proficiency Levels
//!
//! A credential's level is either one of the four well-known tiers or a
//! free-form tag chosen by the issuing institution. Known tiers are matched
//! case-insensitively; everything else is kept verbatim.

use serde::{Deserialize, Serialize};

/// Proficiency tag attached to a credential at mint time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SkillLevel {
    /// Entry-level proficiency.
    #[default]
    Beginner,
    /// Working proficiency.
    Intermediate,
    /// Independent, advanced proficiency.
    Advanced,
    /// Expert / mastery.
    Expert,
    /// Institution-specific tag.
    Custom(String),
}

impl SkillLevel {
    /// The serialized form of this level.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
            Self::Custom(tag) => tag,
        }
    }
}

impl From<&str> for SkillLevel {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            "expert" => Self::Expert,
            _ => Self::Custom(s.to_string()),
        }
    }
}

impl From<String> for SkillLevel {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<SkillLevel> for String {
    fn from(level: SkillLevel) -> Self {
        match level {
            SkillLevel::Custom(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_parse_case_insensitively() {
        assert_eq!(SkillLevel::from("Advanced"), SkillLevel::Advanced);
        assert_eq!(SkillLevel::from("EXPERT"), SkillLevel::Expert);
        assert_eq!(SkillLevel::from(" beginner "), SkillLevel::Beginner);
    }

    #[test]
    fn unknown_levels_are_kept_verbatim() {
        let level = SkillLevel::from("Black Belt");
        assert_eq!(level, SkillLevel::Custom("Black Belt".to_string()));
        assert_eq!(level.to_string(), "Black Belt");
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&SkillLevel::Intermediate).unwrap(), "\"intermediate\"");
        let parsed: SkillLevel = serde_json::from_str("\"Level 3\"").unwrap();
        assert_eq!(parsed, SkillLevel::Custom("Level 3".to_string()));
    }
}
