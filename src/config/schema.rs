use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// When to colour terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Planner configuration.
///
/// Example YAML:
/// ```yaml
/// snapshot: ~/.config/college-ready/snapshot.yaml
/// upcoming_limit: 5
/// colors: auto
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the student snapshot. Relative paths are resolved against the
    /// config file's directory (default: snapshot.yaml next to the config)
    #[serde(default)]
    pub snapshot: Option<PathBuf>,

    /// How many upcoming tasks the dashboard lists (default: 5)
    #[serde(default)]
    pub upcoming_limit: Option<usize>,

    #[serde(default)]
    pub colors: Option<ColorMode>,

    /// Directory of the file this config was loaded from
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}
