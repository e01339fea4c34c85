//! Type definitions for diagram rendering
//!
//! This module defines the supported diagram types and image formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiagramError;

/// Diagram languages that can be embedded in fenced markdown blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    /// GraphViz DOT language, rendered by `dot`
    GraphViz,
    /// PlantUML diagrams, rendered by `puml`
    PlantUml,
}

impl DiagramType {
    /// Canonical info string used after the opening fence
    pub fn fence_name(&self) -> &'static str {
        match self {
            Self::GraphViz => "graphviz",
            Self::PlantUml => "plantuml",
        }
    }

    /// Human-readable name for progress output
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GraphViz => "Graphviz",
            Self::PlantUml => "PlantUML",
        }
    }

    /// Extension of the source file written next to the rendered image
    pub fn source_extension(&self) -> &'static str {
        match self {
            Self::GraphViz => "dot",
            Self::PlantUml => "plantuml",
        }
    }

    /// File name prefix for generated images
    pub fn image_prefix(&self) -> &'static str {
        match self {
            Self::GraphViz => "graphviz_image",
            Self::PlantUml => "plantuml_image",
        }
    }

    /// Image formats the external tool can produce for this type
    pub fn supported_formats(&self) -> &'static [ImageFormat] {
        match self {
            Self::GraphViz => &[ImageFormat::Png, ImageFormat::Jpg, ImageFormat::Svg],
            Self::PlantUml => &[ImageFormat::Png, ImageFormat::Svg],
        }
    }

    /// Check whether `format` can be produced for this type
    pub fn supports_format(&self, format: ImageFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    /// All diagram types, in processing order
    pub fn all() -> &'static [DiagramType] {
        &[Self::GraphViz, Self::PlantUml]
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fence_name())
    }
}

impl FromStr for DiagramType {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "graphviz" | "dot" => Ok(Self::GraphViz),
            "plantuml" | "puml" => Ok(Self::PlantUml),
            _ => Err(DiagramError::UnsupportedType(s.to_string())),
        }
    }
}

/// Image format for rendered diagrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG raster image
    Png,
    /// JPEG raster image (GraphViz only)
    #[serde(alias = "jpeg")]
    Jpg,
    /// SVG vector image
    #[default]
    Svg,
}

impl ImageFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
        }
    }

    /// Get the MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "svg" => Ok(Self::Svg),
            _ => Err(DiagramError::UnsupportedFormat(s.to_string())),
        }
    }
}
