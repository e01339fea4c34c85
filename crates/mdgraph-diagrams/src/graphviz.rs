//! Graphviz renderer backed by the `dot` command-line tool

use std::fs;

use crate::command::ToolCommand;
use crate::renderer::{DiagramRenderer, RenderError, RenderResult};
use crate::types::{DiagramType, ImageFormat};

/// Default program name for the Graphviz CLI
pub fn default_dot_command() -> &'static str {
    if cfg!(windows) {
        "dot.exe"
    } else {
        "dot"
    }
}

/// Renders DOT sources by running `dot -T<fmt> <source> -o <image>`
///
/// # Example
///
/// ```no_run
/// use mdgraph_diagrams::{DiagramRenderer, DiagramType, GraphvizRenderer, ImageFormat};
///
/// let renderer = GraphvizRenderer::new();
/// let svg = renderer.render("digraph { a -> b }", DiagramType::GraphViz, ImageFormat::Svg)?;
/// # Ok::<(), mdgraph_diagrams::RenderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    command: ToolCommand,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphvizRenderer {
    /// Create a renderer that runs `dot` from PATH
    pub fn new() -> Self {
        Self::with_command(ToolCommand::new(default_dot_command()))
    }

    /// Create a renderer with a custom command line
    pub fn with_command(command: ToolCommand) -> Self {
        Self { command }
    }

    /// Arguments passed after the configured command line
    pub fn arguments(format: ImageFormat, source: &str, image: &str) -> Vec<String> {
        vec![
            format!("-T{}", format.extension()),
            source.to_string(),
            "-o".to_string(),
            image.to_string(),
        ]
    }
}

impl DiagramRenderer for GraphvizRenderer {
    fn name(&self) -> &'static str {
        "graphviz"
    }

    fn supports(&self, diagram_type: DiagramType) -> bool {
        diagram_type == DiagramType::GraphViz
    }

    fn render(
        &self,
        source: &str,
        diagram_type: DiagramType,
        format: ImageFormat,
    ) -> RenderResult<Vec<u8>> {
        if !self.supports(diagram_type) {
            return Err(RenderError::UnsupportedType(diagram_type));
        }
        if !self.supports_format(diagram_type, format) {
            return Err(RenderError::UnsupportedFormat {
                diagram_type,
                format,
            });
        }
        if source.trim().is_empty() {
            return Err(RenderError::InvalidSource("empty DOT source".to_string()));
        }

        let scratch = tempfile::Builder::new().prefix("mdgraph-dot-").tempdir()?;
        let source_path = scratch.path().join("diagram.dot");
        let image_path = scratch.path().join(format!("diagram.{}", format.extension()));
        fs::write(&source_path, source)?;

        self.command.run(Self::arguments(
            format,
            &source_path.to_string_lossy(),
            &image_path.to_string_lossy(),
        ))?;

        if !image_path.exists() {
            return Err(RenderError::MissingOutput(image_path));
        }
        Ok(fs::read(&image_path)?)
    }
}
