//! Diagram rendering engine
//!
//! This module provides the main entry point for diagram rendering. The
//! engine routes each request to the first registered renderer that
//! supports the diagram type and image format.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DiagramEngine                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Priority Order:                                             │
//! │  1. GraphvizRenderer  - `dot -T<fmt>`                        │
//! │  2. PlantUmlRenderer  - `puml generate`                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::command::ToolCommand;
use crate::graphviz::GraphvizRenderer;
use crate::plantuml::PlantUmlRenderer;
use crate::renderer::{DiagramRenderer, RenderError, RenderResult, RenderedDiagram};
use crate::types::{DiagramType, ImageFormat};

/// Diagram rendering engine
///
/// # Example
///
/// ```no_run
/// use mdgraph_diagrams::{DiagramEngine, DiagramType, ImageFormat};
///
/// let engine = DiagramEngine::new();
/// let svg = engine.render("digraph { a -> b }", DiagramType::GraphViz, ImageFormat::Svg)?;
/// # Ok::<(), mdgraph_diagrams::RenderError>(())
/// ```
pub struct DiagramEngine {
    /// Registered renderers in priority order
    renderers: Vec<Box<dyn DiagramRenderer>>,
}

impl Default for DiagramEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramEngine {
    /// Create an engine with the Graphviz and PlantUML CLI renderers
    pub fn new() -> Self {
        Self::with_commands(
            ToolCommand::new(crate::graphviz::default_dot_command()),
            ToolCommand::new(crate::plantuml::DEFAULT_PUML_COMMAND),
        )
    }

    /// Create an engine with custom tool command lines
    pub fn with_commands(dot: ToolCommand, puml: ToolCommand) -> Self {
        let mut engine = Self::empty();
        engine.add_renderer(Box::new(GraphvizRenderer::with_command(dot)));
        engine.add_renderer(Box::new(PlantUmlRenderer::with_command(puml)));
        engine
    }

    /// Create an engine with no renderers
    pub fn empty() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Add a renderer to the engine
    ///
    /// Renderers are tried in the order they were added.
    pub fn add_renderer(&mut self, renderer: Box<dyn DiagramRenderer>) {
        log::debug!("Added renderer: {}", renderer.name());
        self.renderers.push(renderer);
    }

    /// Insert a renderer at a specific priority position
    ///
    /// Lower indices = higher priority.
    pub fn insert_renderer(&mut self, index: usize, renderer: Box<dyn DiagramRenderer>) {
        log::debug!("Inserted renderer at position {}: {}", index, renderer.name());
        self.renderers.insert(index.min(self.renderers.len()), renderer);
    }

    /// Get the names of all registered renderers
    pub fn renderer_names(&self) -> Vec<&'static str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    /// Check if a specific diagram type is supported
    pub fn supports(&self, diagram_type: DiagramType) -> bool {
        self.renderers.iter().any(|r| r.supports(diagram_type))
    }

    /// Fail early when `format` cannot be produced for `diagram_type`
    pub fn check_format(&self, diagram_type: DiagramType, format: ImageFormat) -> RenderResult<()> {
        if !self.supports(diagram_type) {
            return Err(RenderError::UnsupportedType(diagram_type));
        }
        let ok = self
            .renderers
            .iter()
            .any(|r| r.supports(diagram_type) && r.supports_format(diagram_type, format));
        if ok {
            Ok(())
        } else {
            Err(RenderError::UnsupportedFormat {
                diagram_type,
                format,
            })
        }
    }

    /// Render a diagram using the first suitable renderer
    ///
    /// Tries renderers in priority order until one succeeds. Returns the
    /// last error if all of them fail.
    pub fn render(
        &self,
        source: &str,
        diagram_type: DiagramType,
        format: ImageFormat,
    ) -> RenderResult<Vec<u8>> {
        self.render_inner(source, diagram_type, format)
            .map(|(data, _)| data)
    }

    /// Render a diagram and return it with metadata
    pub fn render_with_metadata(
        &self,
        source: &str,
        diagram_type: DiagramType,
        format: ImageFormat,
    ) -> RenderResult<RenderedDiagram> {
        let (data, renderer) = self.render_inner(source, diagram_type, format)?;
        Ok(RenderedDiagram::new(data, diagram_type, format, renderer))
    }

    fn render_inner(
        &self,
        source: &str,
        diagram_type: DiagramType,
        format: ImageFormat,
    ) -> RenderResult<(Vec<u8>, &'static str)> {
        if self.renderers.is_empty() {
            return Err(RenderError::Unavailable(
                "No renderers registered".to_string(),
            ));
        }

        let mut last_error = None;

        for renderer in &self.renderers {
            if !renderer.supports(diagram_type) {
                continue;
            }

            if !renderer.supports_format(diagram_type, format) {
                last_error = Some(RenderError::UnsupportedFormat {
                    diagram_type,
                    format,
                });
                continue;
            }

            if !renderer.is_available() {
                log::debug!("Renderer {} is not available, skipping", renderer.name());
                continue;
            }

            match renderer.render(source, diagram_type, format) {
                Ok(data) => {
                    log::debug!(
                        "Rendered {} diagram with {} ({} bytes)",
                        diagram_type,
                        renderer.name(),
                        data.len()
                    );
                    return Ok((data, renderer.name()));
                }
                Err(e) => {
                    log::warn!("Renderer {} failed: {}", renderer.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(RenderError::UnsupportedType(diagram_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockRenderer {
        name: &'static str,
        diagram_type: DiagramType,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl MockRenderer {
        fn new(name: &'static str, diagram_type: DiagramType, fail: bool) -> Self {
            Self {
                name,
                diagram_type,
                fail,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl DiagramRenderer for MockRenderer {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports(&self, diagram_type: DiagramType) -> bool {
            diagram_type == self.diagram_type
        }

        fn render(
            &self,
            source: &str,
            _diagram_type: DiagramType,
            _format: ImageFormat,
        ) -> RenderResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(mock_failure(self.name))
            } else {
                Ok(format!("<svg>{source}</svg>").into_bytes())
            }
        }
    }

    fn mock_failure(name: &str) -> RenderError {
        RenderError::CommandFailed {
            program: name.to_string(),
            status: "exit status: 1".to_string(),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = DiagramEngine::new();
        assert_eq!(engine.renderer_names(), vec!["graphviz", "plantuml"]);
        assert!(engine.supports(DiagramType::GraphViz));
        assert!(engine.supports(DiagramType::PlantUml));
    }

    #[test]
    fn test_empty_engine() {
        let engine = DiagramEngine::empty();
        assert!(engine.renderer_names().is_empty());

        let result = engine.render("digraph {}", DiagramType::GraphViz, ImageFormat::Svg);
        assert!(matches!(result, Err(RenderError::Unavailable(_))));
    }

    #[test]
    fn test_check_format() {
        let engine = DiagramEngine::new();
        assert!(engine
            .check_format(DiagramType::GraphViz, ImageFormat::Jpg)
            .is_ok());
        assert!(matches!(
            engine.check_format(DiagramType::PlantUml, ImageFormat::Jpg),
            Err(RenderError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            DiagramEngine::empty().check_format(DiagramType::GraphViz, ImageFormat::Svg),
            Err(RenderError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_render_with_metadata_names_renderer() {
        let mut engine = DiagramEngine::empty();
        engine.add_renderer(Box::new(MockRenderer::new(
            "mock",
            DiagramType::GraphViz,
            false,
        )));

        let diagram = engine
            .render_with_metadata("a -> b", DiagramType::GraphViz, ImageFormat::Svg)
            .unwrap();
        assert_eq!(diagram.renderer, "mock");
        assert_eq!(diagram.format, ImageFormat::Svg);
        assert!(diagram.is_valid_svg());
    }

    #[test]
    fn test_falls_back_to_next_renderer() {
        let failing = MockRenderer::new("broken", DiagramType::GraphViz, true);
        let failing_calls = failing.calls.clone();

        let mut engine = DiagramEngine::empty();
        engine.add_renderer(Box::new(failing));
        engine.add_renderer(Box::new(MockRenderer::new(
            "backup",
            DiagramType::GraphViz,
            false,
        )));

        let diagram = engine
            .render_with_metadata("x", DiagramType::GraphViz, ImageFormat::Png)
            .unwrap();
        assert_eq!(diagram.renderer, "backup");
        assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_returns_last_error_when_all_fail() {
        let mut engine = DiagramEngine::empty();
        engine.add_renderer(Box::new(MockRenderer::new(
            "broken",
            DiagramType::GraphViz,
            true,
        )));

        let result = engine.render("x", DiagramType::GraphViz, ImageFormat::Svg);
        assert!(matches!(result, Err(RenderError::CommandFailed { .. })));
    }

    #[test]
    fn test_insert_renderer_takes_priority() {
        let mut engine = DiagramEngine::new();
        engine.insert_renderer(
            0,
            Box::new(MockRenderer::new("first", DiagramType::PlantUml, false)),
        );
        assert_eq!(engine.renderer_names()[0], "first");

        let diagram = engine
            .render_with_metadata("@startuml\n@enduml", DiagramType::PlantUml, ImageFormat::Svg)
            .unwrap();
        assert_eq!(diagram.renderer, "first");
    }

    #[test]
    fn test_unsupported_format_skips_render() {
        let mock = MockRenderer::new("mock", DiagramType::PlantUml, false);
        let calls = mock.calls.clone();
        let mut engine = DiagramEngine::empty();
        engine.add_renderer(Box::new(mock));

        let result = engine.render("x", DiagramType::PlantUml, ImageFormat::Jpg);
        assert!(matches!(result, Err(RenderError::UnsupportedFormat { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
