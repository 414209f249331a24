use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty tier of a generated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Wire representation used in attempt records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Tier for a position in a session of `total` questions.
    ///
    /// The first 30% of the session is easy, the next 30% medium and the rest
    /// hard. A ten-question session maps indices 0-2, 3-5 and 6-9.
    #[must_use]
    pub fn for_index(index: usize, total: usize) -> Self {
        let easy_end = (total * 3).div_ceil(10);
        let medium_end = (total * 6).div_ceil(10);
        if index < easy_end {
            Difficulty::Easy
        } else if index < medium_end {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    /// Distance between tiers, used to find the nearest available tier.
    #[must_use]
    pub fn distance(self, other: Difficulty) -> usize {
        (self as usize).abs_diff(other as usize)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
