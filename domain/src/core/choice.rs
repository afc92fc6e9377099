//! Choice value object representing one of the four answer letters

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Answer letter of a multiple-choice question (Value Object)
///
/// The set is closed: anything outside `A..=D` is rejected rather than
/// coerced, so a non-compliant model surfaces as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    /// All choices in presentation order
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        }
    }

    /// Choice for a zero-based option index
    pub fn from_index(index: usize) -> Option<Choice> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Choice::A => 0,
            Choice::B => 1,
            Choice::C => 2,
            Choice::D => 3,
        }
    }

    /// Strict parse: trims whitespace, then requires an exact upper-case letter.
    pub fn parse(value: &str) -> Result<Choice, DomainError> {
        match value.trim() {
            "A" => Ok(Choice::A),
            "B" => Ok(Choice::B),
            "C" => Ok(Choice::C),
            "D" => Ok(Choice::D),
            other => Err(DomainError::invalid_choice(other, &Self::ALL)),
        }
    }

    /// All choices except `excluded`
    pub fn others(excluded: Choice) -> Vec<Choice> {
        Self::ALL.into_iter().filter(|c| *c != excluded).collect()
    }

    /// Lenient letter extraction from free text.
    ///
    /// Looks for a standalone `A`-`D` token first, then for the first
    /// `A`-`D` character anywhere in the upper-cased text.
    pub fn extract_from(text: &str) -> Option<Choice> {
        let upper = text.trim().to_uppercase();
        if upper.is_empty() {
            return None;
        }

        let standalone = upper
            .split(|c: char| !c.is_ascii_alphanumeric())
            .find_map(|token| Choice::parse(token).ok());
        if standalone.is_some() {
            return standalone;
        }

        upper.chars().find_map(|c| match c {
            'A' => Some(Choice::A),
            'B' => Some(Choice::B),
            'C' => Some(Choice::C),
            'D' => Some(Choice::D),
            _ => None,
        })
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Choice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Choice::parse(s)
    }
}

impl Serialize for Choice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Choice::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_letters() {
        assert_eq!(Choice::parse("A").unwrap(), Choice::A);
        assert_eq!(Choice::parse(" D ").unwrap(), Choice::D);
    }

    #[test]
    fn test_parse_rejects_outside_closed_set() {
        assert!(Choice::parse("E").is_err());
        assert!(Choice::parse("").is_err());
        assert!(Choice::parse("AB").is_err());
        assert!(Choice::parse("b").is_err());
    }

    #[test]
    fn test_others_excludes_choice() {
        let others = Choice::others(Choice::C);
        assert_eq!(others, vec![Choice::A, Choice::B, Choice::D]);
    }

    #[test]
    fn test_index_roundtrip() {
        for choice in Choice::ALL {
            assert_eq!(Choice::from_index(choice.index()), Some(choice));
        }
        assert_eq!(Choice::from_index(4), None);
    }

    #[test]
    fn test_extract_from_prefers_standalone_token() {
        assert_eq!(Choice::extract_from("The answer is (c)."), Some(Choice::C));
        assert_eq!(Choice::extract_from("b"), Some(Choice::B));
        assert_eq!(Choice::extract_from("OPTIONA"), Some(Choice::A));
        assert_eq!(Choice::extract_from("xyz"), None);
        assert_eq!(Choice::extract_from("   "), None);
    }

    #[test]
    fn test_serde_as_letter() {
        let json = serde_json::to_string(&Choice::B).unwrap();
        assert_eq!(json, "\"B\"");
        let parsed: Choice = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(parsed, Choice::D);
        assert!(serde_json::from_str::<Choice>("\"E\"").is_err());
    }
}
