//! Configuration settings
//!
//! Settings are loaded from `mdgraph.toml`, either given explicitly or found
//! next to the input document:
//!
//! ```toml
//! [render]
//! image_format = "png"
//! keep_sources = true
//!
//! [tools]
//! dot = "dot"
//! puml = "npx puml"
//! pandoc = "pandoc"
//!
//! [output]
//! dir = "out"
//! images_dir = "images"
//! suffix = "_out"
//!
//! [publish]
//! css = "styles/report.css"
//! html_css = true
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mdgraph_diagrams::{default_dot_command, ImageFormat, DEFAULT_PUML_COMMAND};

/// File name looked up next to the input document
pub const SETTINGS_FILE_NAME: &str = "mdgraph.toml";

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read
    #[error("Failed to read settings file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for this schema
    #[error("Invalid settings file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Image rendering settings
    pub render: RenderSettings,
    /// External tool command lines
    pub tools: ToolSettings,
    /// Output layout
    pub output: OutputSettings,
    /// Pandoc publishing settings
    pub publish: PublishSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings file next to `input`, if one exists
    pub fn discover(input: &Path) -> Option<PathBuf> {
        let candidate = crate::pipeline::input_dir(input).join(SETTINGS_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Load settings for `input`
    ///
    /// An explicit path wins; otherwise a discovered `mdgraph.toml` is used;
    /// otherwise defaults apply.
    pub fn resolve(input: &Path, explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit.map(Path::to_path_buf).or_else(|| Self::discover(input)) {
            Some(path) => {
                log::debug!("Loading settings from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Image rendering settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    /// Format of generated images
    pub image_format: ImageFormat,
    /// Write each block's source next to its image
    pub keep_sources: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_format: ImageFormat::Svg,
            keep_sources: true,
        }
    }
}

/// External tool command lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolSettings {
    /// Graphviz CLI
    pub dot: String,
    /// node-plantuml CLI
    pub puml: String,
    /// Pandoc
    pub pandoc: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            dot: default_dot_command().to_string(),
            puml: DEFAULT_PUML_COMMAND.to_string(),
            pandoc: "pandoc".to_string(),
        }
    }
}

/// Output layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    /// Output directory, relative to the input document's directory
    pub dir: PathBuf,
    /// Image directory, relative to the output directory
    pub images_dir: String,
    /// Appended to the input file stem for generated documents
    pub suffix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("out"),
            images_dir: "images".to_string(),
            suffix: "_out".to_string(),
        }
    }
}

/// Pandoc publishing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PublishSettings {
    /// Stylesheet copied to the output directory, relative to the input
    /// document's directory; bundled one when unset
    pub css: Option<PathBuf>,
    /// Link the stylesheet from HTML output
    pub html_css: bool,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            css: None,
            html_css: true,
        }
    }
}
