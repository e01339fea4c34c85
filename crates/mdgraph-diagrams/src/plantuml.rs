//! PlantUML renderer backed by the node-plantuml `puml` CLI
//!
//! See <https://www.npmjs.com/package/node-plantuml>. The tool is invoked as
//! `puml generate --png|--svg <source> -o <image>`.

use std::fs;

use crate::command::ToolCommand;
use crate::renderer::{DiagramRenderer, RenderError, RenderResult};
use crate::types::{DiagramType, ImageFormat};

/// Default program name for the PlantUML CLI
pub const DEFAULT_PUML_COMMAND: &str = "puml";

/// Renders PlantUML sources through `puml generate`
#[derive(Debug, Clone)]
pub struct PlantUmlRenderer {
    command: ToolCommand,
}

impl Default for PlantUmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlantUmlRenderer {
    /// Create a renderer that runs `puml` from PATH
    pub fn new() -> Self {
        Self::with_command(ToolCommand::new(DEFAULT_PUML_COMMAND))
    }

    /// Create a renderer with a custom command line
    pub fn with_command(command: ToolCommand) -> Self {
        Self { command }
    }

    /// Format flag understood by `puml generate`
    fn format_flag(format: ImageFormat) -> Option<&'static str> {
        match format {
            ImageFormat::Png => Some("--png"),
            ImageFormat::Svg => Some("--svg"),
            ImageFormat::Jpg => None,
        }
    }

    /// Arguments passed after the configured command line
    pub fn arguments(format: ImageFormat, source: &str, image: &str) -> RenderResult<Vec<String>> {
        let flag = Self::format_flag(format).ok_or(RenderError::UnsupportedFormat {
            diagram_type: DiagramType::PlantUml,
            format,
        })?;
        Ok(vec![
            "generate".to_string(),
            flag.to_string(),
            source.to_string(),
            "-o".to_string(),
            image.to_string(),
        ])
    }
}

impl DiagramRenderer for PlantUmlRenderer {
    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn supports(&self, diagram_type: DiagramType) -> bool {
        diagram_type == DiagramType::PlantUml
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
        if source.trim().is_empty() {
            return Err(RenderError::InvalidSource("empty PlantUML source".to_string()));
        }

        let scratch = tempfile::Builder::new().prefix("mdgraph-puml-").tempdir()?;
        let source_path = scratch.path().join("diagram.plantuml");
        let image_path = scratch.path().join(format!("diagram.{}", format.extension()));

        let args = Self::arguments(
            format,
            &source_path.to_string_lossy(),
            &image_path.to_string_lossy(),
        )?;
        fs::write(&source_path, source)?;
        self.command.run(args)?;

        if !image_path.exists() {
            return Err(RenderError::MissingOutput(image_path));
        }
        Ok(fs::read(&image_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments() {
        let args = PlantUmlRenderer::arguments(ImageFormat::Svg, "a.plantuml", "a.svg")
            .unwrap();
        assert_eq!(args, vec!["generate", "--svg", "a.plantuml", "-o", "a.svg"]);

        let args = PlantUmlRenderer::arguments(ImageFormat::Png, "a.plantuml", "a.png")
            .unwrap();
        assert_eq!(args[1], "--png");
    }

    #[test]
    fn test_jpg_is_rejected() {
        let renderer = PlantUmlRenderer::new();
        assert!(!renderer.supports_format(DiagramType::PlantUml, ImageFormat::Jpg));

        let result = renderer.render(
            "@startuml\nA -> B\n@enduml",
            DiagramType::PlantUml,
            ImageFormat::Jpg,
        );
        assert!(matches!(
            result,
            Err(RenderError::UnsupportedFormat {
                format: ImageFormat::Jpg,
                ..
            })
        ));
    }

    #[test]
    fn test_supports_plantuml_only() {
        let renderer = PlantUmlRenderer::new();
        assert!(renderer.supports(DiagramType::PlantUml));
        assert!(!renderer.supports(DiagramType::GraphViz));
    }

    #[cfg(unix)]
    #[test]
    fn test_render_reads_tool_output() {
        // Stand-in for puml: generate --svg <src> -o <image>
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-puml.sh");
        fs::write(&script, "cp \"$3\" \"$5\"\n").unwrap();
        let renderer = PlantUmlRenderer::with_command(
            ToolCommand::parse(&format!("sh {}", script.display())).unwrap(),
        );

        let source = "@startuml\nAlice -> Bob\n@enduml";
        let data = renderer
            .render(source, DiagramType::PlantUml, ImageFormat::Svg)
            .unwrap();
        assert_eq!(data, source.as_bytes());
    }
}
