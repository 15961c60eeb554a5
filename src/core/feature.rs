//! Feature pages. Each page is the same prompt → exchange → render loop,
//! pointed at its own backend endpoint with its own copy.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    #[default]
    Code,
    Music,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::Code, Feature::Music];

    /// Backend path, relative to the configured base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Feature::Code => "api/code",
            Feature::Music => "api/conversation",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Feature::Code => "Code Generation",
            Feature::Music => "Music Generation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Feature::Code => "Generate code using descriptive text",
            Feature::Music => "Turn your prompt into music.",
        }
    }

    /// Example prompt shown in the empty input field.
    pub fn placeholder(self) -> &'static str {
        match self {
            Feature::Code => "A simple toggle button using React hooks",
            Feature::Music => "Piano solo in the key of E",
        }
    }

    /// Shown in place of the transcript before the first exchange.
    pub fn empty_label(self) -> &'static str {
        match self {
            Feature::Code => "No conversation started",
            Feature::Music => "No music generated.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Code => "code",
            Feature::Music => "music",
        }
    }

    /// Cycles to the next page (wraps around)
    pub fn next(self) -> Feature {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Cycles to the previous page (wraps around)
    pub fn prev(self) -> Feature {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown feature '{s}' (expected 'code' or 'music')"))
    }
}
