//! Toast scenario style
//!
//! The style decides how long the OS keeps the toast on screen:
//! - REMINDER: stays until the user acts on it
//! - LONG: extended display time
//! - SHORT: default display time
//!
//! The engine never interprets the style, it is handed to the presenter as is.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Persistence class of a toast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStyle {
    #[default]
    Reminder,
    Short,
    Long,
}

impl std::fmt::Display for ScenarioStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ScenarioStyle {
    /// Value used in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioStyle::Reminder => "reminder",
            ScenarioStyle::Short => "short",
            ScenarioStyle::Long => "long",
        }
    }

    /// Whether the toast should stay until dismissed
    pub fn is_persistent(&self) -> bool {
        matches!(self, ScenarioStyle::Reminder)
    }
}

impl std::str::FromStr for ScenarioStyle {
    type Err = anyhow::Error;

    /// Case-insensitive, so both `Reminder` and `reminder` are accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reminder" => Ok(ScenarioStyle::Reminder),
            "short" => Ok(ScenarioStyle::Short),
            "long" => Ok(ScenarioStyle::Long),
            _ => Err(anyhow!("Unknown scenario type: {}", s)),
        }
    }
}
