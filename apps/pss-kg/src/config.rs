//! # Run Configuration
//!
//! Optional TOML file with an `[inputs]` and an `[output]` table. CLI flags
//! override whatever the file says.
//!
//! ```toml
//! [inputs]
//! nodes = "export/nodes.jsonl"
//! reactions = "export/reactions.jsonl"
//! foreign_links = "export/foreign_links.jsonl"
//! annotations = "export/ckn_annotations.tsv.gz"
//!
//! [output]
//! directory = "kg"
//! ```

use pss_core::PssError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pss-kg.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input file locations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    /// JSON Lines of node records.
    pub nodes: Option<PathBuf>,
    /// JSON Lines of reaction patterns.
    pub reactions: Option<PathBuf>,
    /// JSON Lines of foreign gene links.
    pub foreign_links: Option<PathBuf>,
    /// Gene annotation TSV, optionally gzip-compressed.
    pub annotations: Option<PathBuf>,
}

/// Output location.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("kg")
}

/// Fully resolved inputs and outputs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub nodes: PathBuf,
    pub reactions: PathBuf,
    pub foreign_links: Option<PathBuf>,
    pub annotations: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, PssError> {
        toml::from_str(text).map_err(|e| PssError::InvalidConfig(e.to_string()))
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, PssError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PssError::Io(format!("Cannot read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load the explicit config file, or the default one if it exists.
    ///
    /// No file at all yields the default configuration.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, PssError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    tracing::debug!(path = %fallback.display(), "using default config file");
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply CLI overrides; any value given on the command line wins.
    #[must_use]
    pub fn with_overrides(mut self, inputs: InputsConfig, output: Option<PathBuf>) -> Self {
        let InputsConfig {
            nodes,
            reactions,
            foreign_links,
            annotations,
        } = inputs;
        self.inputs.nodes = nodes.or(self.inputs.nodes);
        self.inputs.reactions = reactions.or(self.inputs.reactions);
        self.inputs.foreign_links = foreign_links.or(self.inputs.foreign_links);
        self.inputs.annotations = annotations.or(self.inputs.annotations);
        if let Some(directory) = output {
            self.output.directory = directory;
        }
        self
    }

    /// Check that every required input is set.
    pub fn into_plan(self) -> Result<RunPlan, PssError> {
        let missing =
            |name: &str| PssError::InvalidConfig(format!("missing required input '{name}'"));
        Ok(RunPlan {
            nodes: self.inputs.nodes.ok_or_else(|| missing("nodes"))?,
            reactions: self.inputs.reactions.ok_or_else(|| missing("reactions"))?,
            foreign_links: self.inputs.foreign_links,
            annotations: self.inputs.annotations,
            output_dir: self.output.directory,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
