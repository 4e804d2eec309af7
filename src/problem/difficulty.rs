//! Difficulty levels reported by the question bank
//!
//! The listing filter uses the upper-case wire form (`EASY`), while detail
//! payloads and stored records use the title-case display form (`Easy`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty of a single problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Value used in the listing query's `filters.difficulty` variable
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }

    /// Title-case form stored in the database and JSON files
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Parses either wire form, ignoring case and surrounding whitespace
    pub fn parse_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Returns all difficulty levels in ascending order
    pub fn all() -> [Self; 3] {
        [Self::Easy, Self::Medium, Self::Hard]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_loose(s).ok_or_else(|| format!("unknown difficulty '{}'", s))
    }
}

/// Difficulty restriction applied to the listing query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DifficultyFilter {
    Easy,
    Medium,
    Hard,
    /// No restriction: the `difficulty` key is omitted from the filters
    #[default]
    Any,
}

impl DifficultyFilter {
    /// The difficulty to send, or `None` for an unrestricted listing
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            Self::Easy => Some(Difficulty::Easy),
            Self::Medium => Some(Difficulty::Medium),
            Self::Hard => Some(Difficulty::Hard),
            Self::Any => None,
        }
    }
}

impl From<Difficulty> for DifficultyFilter {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::Easy,
            Difficulty::Medium => Self::Medium,
            Difficulty::Hard => Self::Hard,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("any") {
            return Ok(Self::Any);
        }
        s.parse::<Difficulty>().map(Self::from)
    }
}

impl TryFrom<String> for DifficultyFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.difficulty() {
            Some(d) => write!(f, "{}", d),
            None => f.write_str("Any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loose_accepts_both_forms() {
        assert_eq!(Difficulty::parse_loose("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse_loose("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse_loose(" hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse_loose("impossible"), None);
        assert_eq!(Difficulty::parse_loose(""), None);
    }

    #[test]
    fn test_filter_and_db_forms() {
        assert_eq!(Difficulty::Easy.as_filter(), "EASY");
        assert_eq!(Difficulty::Hard.to_db_string(), "Hard");
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }

    #[test]
    fn test_difficulty_filter_parsing() {
        assert_eq!("any".parse::<DifficultyFilter>(), Ok(DifficultyFilter::Any));
        assert_eq!("ANY".parse::<DifficultyFilter>(), Ok(DifficultyFilter::Any));
        assert_eq!(
            "medium".parse::<DifficultyFilter>(),
            Ok(DifficultyFilter::Medium)
        );
        assert!("extreme".parse::<DifficultyFilter>().is_err());
    }

    #[test]
    fn test_any_filter_has_no_difficulty() {
        assert_eq!(DifficultyFilter::Any.difficulty(), None);
        assert_eq!(
            DifficultyFilter::Hard.difficulty(),
            Some(Difficulty::Hard)
        );
    }

    #[test]
    fn test_serde_uses_title_case() {
        let json = serde_json::to_string(&Difficulty::Easy).unwrap();
        assert_eq!(json, "\"Easy\"");
    }
}
