//! Debater roles

use serde::{Deserialize, Serialize};

/// One of the two debater seats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebaterRole {
    #[serde(rename = "debater_x")]
    X,
    #[serde(rename = "debater_y")]
    Y,
}

impl DebaterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebaterRole::X => "debater_x",
            DebaterRole::Y => "debater_y",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DebaterRole::X => "Debater X",
            DebaterRole::Y => "Debater Y",
        }
    }

    pub fn opponent(&self) -> DebaterRole {
        match self {
            DebaterRole::X => DebaterRole::Y,
            DebaterRole::Y => DebaterRole::X,
        }
    }

    /// Parse a judge's `winner` field; anything but the two role ids is `None`.
    pub fn from_winner(value: &str) -> Option<DebaterRole> {
        match value.trim().to_lowercase().as_str() {
            "debater_x" => Some(DebaterRole::X),
            "debater_y" => Some(DebaterRole::Y),
            _ => None,
        }
    }
}

impl std::fmt::Display for DebaterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
