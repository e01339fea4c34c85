//! Diagram renderer trait and error types
//!
//! This module defines the core abstraction for diagram renderers. Each
//! renderer wraps one external command-line tool.

use std::path::PathBuf;

use crate::types::{DiagramType, ImageFormat};

/// Errors that can occur during diagram rendering
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The diagram type is not supported by this renderer
    #[error("Unsupported diagram type: {0}")]
    UnsupportedType(DiagramType),

    /// The image format cannot be produced for this diagram type
    #[error("Image format '{format}' is not supported for {diagram_type} diagrams")]
    UnsupportedFormat {
        diagram_type: DiagramType,
        format: ImageFormat,
    },

    /// The external tool is not installed or not on PATH
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),

    /// The diagram source is empty
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The external tool exited unsuccessfully
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The tool reported success but produced no image
    #[error("Renderer produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Trait for diagram renderers
///
/// Implementors provide diagram rendering for specific diagram types. The
/// engine picks the first registered renderer that accepts a request.
pub trait DiagramRenderer: Send + Sync {
    /// Human-readable name of this renderer
    fn name(&self) -> &'static str;

    /// Check if this renderer supports the given diagram type
    fn supports(&self, diagram_type: DiagramType) -> bool;

    /// Check if this renderer can produce `format` for `diagram_type`
    fn supports_format(&self, diagram_type: DiagramType, format: ImageFormat) -> bool {
        diagram_type.supports_format(format)
    }

    /// Check if the renderer is currently available
    fn is_available(&self) -> bool {
        true
    }

    /// Render a diagram to the specified format
    ///
    /// # Arguments
    /// * `source` - The diagram source code
    /// * `diagram_type` - The type of diagram
    /// * `format` - The desired image format
    ///
    /// # Returns
    /// The rendered image bytes
    fn render(
        &self,
        source: &str,
        diagram_type: DiagramType,
        format: ImageFormat,
    ) -> RenderResult<Vec<u8>>;
}

/// Rendered diagram with metadata
#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    /// The rendered image bytes
    pub data: Vec<u8>,
    /// The diagram type that was rendered
    pub diagram_type: DiagramType,
    /// The image format
    pub format: ImageFormat,
    /// Name of the renderer that produced this output
    pub renderer: String,
}

impl RenderedDiagram {
    /// Create a new rendered diagram
    pub fn new(
        data: Vec<u8>,
        diagram_type: DiagramType,
        format: ImageFormat,
        renderer: impl Into<String>,
    ) -> Self {
        Self {
            data,
            diagram_type,
            format,
            renderer: renderer.into(),
        }
    }

    /// Get the file extension for this diagram
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// Check if the data appears to be a valid PNG
    pub fn is_valid_png(&self) -> bool {
        self.data.len() >= 8 && &self.data[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Check if the data appears to be a valid JPEG
    pub fn is_valid_jpg(&self) -> bool {
        self.data.len() >= 3 && self.data[0..3] == [0xFF, 0xD8, 0xFF]
    }

    /// Check if the data appears to be valid SVG
    pub fn is_valid_svg(&self) -> bool {
        if let Ok(s) = std::str::from_utf8(&self.data) {
            s.contains("<svg") || s.contains("<?xml")
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_diagram_validation() {
        let png_data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        let diagram = RenderedDiagram::new(
            png_data,
            DiagramType::GraphViz,
            ImageFormat::Png,
            "test-renderer",
        );
        assert!(diagram.is_valid_png());
        assert!(!diagram.is_valid_svg());
        assert!(!diagram.is_valid_jpg());

        let svg_data = b"<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>".to_vec();
        let svg_diagram = RenderedDiagram::new(
            svg_data,
            DiagramType::PlantUml,
            ImageFormat::Svg,
            "test-renderer",
        );
        assert!(svg_diagram.is_valid_svg());
        assert!(!svg_diagram.is_valid_png());
        assert_eq!(svg_diagram.extension(), "svg");

        let jpg = RenderedDiagram::new(
            vec![0xFF, 0xD8, 0xFF, 0xE0],
            DiagramType::GraphViz,
            ImageFormat::Jpg,
            "test-renderer",
        );
        assert!(jpg.is_valid_jpg());
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = RenderError::UnsupportedFormat {
            diagram_type: DiagramType::PlantUml,
            format: ImageFormat::Jpg,
        };
        assert_eq!(
            err.to_string(),
            "Image format 'jpg' is not supported for plantuml diagrams"
        );
    }
}
