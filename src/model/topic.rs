//! Syllabus topics and their complexity tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complexity tier of a topic. Ordered `Easy < Medium < Hard`.
///
/// Deserializes tier names case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Complexity {
    Easy,
    Medium,
    Hard,
}

impl Complexity {
    /// Highest ordinal rank, used to normalize [`Complexity::rank`] into (0, 1]
    pub const MAX_RANK: u8 = 3;

    /// Ordinal rank: Easy=1, Medium=2, Hard=3
    pub fn rank(&self) -> u8 {
        match self {
            Complexity::Easy => 1,
            Complexity::Medium => 2,
            Complexity::Hard => 3,
        }
    }

    /// Rank scaled into (0, 1]
    pub fn normalized(&self) -> f64 {
        f64::from(self.rank()) / f64::from(Self::MAX_RANK)
    }

    /// Days without study after which a weakly known topic is due for revision.
    ///
    /// Harder material needs more frequent touch.
    pub fn revision_threshold_days(&self) -> i64 {
        match self {
            Complexity::Easy => 7,
            Complexity::Medium => 5,
            Complexity::Hard => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Easy => "Easy",
            Complexity::Medium => "Medium",
            Complexity::Hard => "Hard",
        }
    }

    /// Parse a tier name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Complexity::Easy),
            "medium" => Some(Complexity::Medium),
            "hard" => Some(Complexity::Hard),
            _ => None,
        }
    }
}

impl TryFrom<String> for Complexity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown complexity '{}'", value))
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An atomic syllabus unit. Immutable input to a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique within a planning run
    #[serde(alias = "topic")]
    pub name: String,
    pub complexity: Complexity,
    /// Total effort required, in hours
    pub estimated_hours: f64,
}

impl Topic {
    pub fn new(name: impl Into<String>, complexity: Complexity, estimated_hours: f64) -> Self {
        Self {
            name: name.into(),
            complexity,
            estimated_hours,
        }
    }
}
