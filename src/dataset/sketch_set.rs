use crate::error::SketchretError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Named partition of sketches, used as either query or reference group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SketchSet {
    /// Test sketches (always the query group).
    #[serde(rename = "test_set")]
    Test,
    /// Every sketch in the train directory.
    #[serde(rename = "full_train_set")]
    FullTrain,
    /// Train sketches whose ID also appears in the test set.
    #[serde(rename = "limited_train_set")]
    LimitedTrain,
}

impl SketchSet {
    pub const ALL: [SketchSet; 3] = [SketchSet::Test, SketchSet::FullTrain, SketchSet::LimitedTrain];

    pub fn tag(&self) -> &'static str {
        match self {
            SketchSet::Test => "test_set",
            SketchSet::FullTrain => "full_train_set",
            SketchSet::LimitedTrain => "limited_train_set",
        }
    }
}

impl fmt::Display for SketchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SketchSet {
    type Err = SketchretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SketchSet::ALL
            .into_iter()
            .find(|set| set.tag() == s)
            .ok_or_else(|| SketchretError::UnknownSketchSet(s.to_string()))
    }
}
