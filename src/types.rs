use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque ID types for type safety
pub type SenatorId = String;
pub type SessionId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Party {
    Republican,
    Democrat,
    Independent,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Party::Republican => "Republican",
            Party::Democrat => "Democrat",
            Party::Independent => "Independent",
        };
        f.write_str(name)
    }
}

/// The two buttons a player can press
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Guess {
    Republican,
    Democrat,
}

impl Guess {
    /// Independents caucus with the Democrats, so a Democrat guess counts for them.
    pub fn matches(self, party: Party) -> bool {
        matches!(
            (self, party),
            (Guess::Republican, Party::Republican)
                | (Guess::Democrat, Party::Democrat)
                | (Guess::Democrat, Party::Independent)
        )
    }
}

/// One record of `senators_metadata.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Senator {
    #[serde(rename = "bioguide_id")]
    pub id: SenatorId,
    #[serde(rename = "name")]
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub state: String,
    pub party: Party,
    #[serde(rename = "image_file")]
    pub portrait_file: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}

impl Feedback {
    pub fn is_showing(self) -> bool {
        self != Feedback::None
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}
