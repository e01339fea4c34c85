//! Conversion pipeline
//!
//! Reads a markdown document, renders every diagram block to an image file
//! and writes a rewritten copy of the document that links to the images.
//!
//! # Output layout
//!
//! ```text
//! docs/
//! ├── guide.md
//! └── out/
//!     ├── guide_out.md
//!     └── images/
//!         ├── graphviz_image_0.dot
//!         ├── graphviz_image_0.svg
//!         ├── plantuml_image_0.plantuml
//!         └── plantuml_image_0.svg
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use mdgraph_diagrams::{DiagramEngine, DiagramError, DiagramType, RenderError, ToolCommand};

use crate::blocks::{blocks_of, extract_blocks, DiagramBlock};
use crate::rewrite::{image_link, replace_blocks};
use crate::settings::Settings;

/// Errors raised by the conversion pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A configured tool command line is invalid
    #[error(transparent)]
    Command(#[from] DiagramError),

    /// The input document could not be read
    #[error("Failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file or directory could not be written
    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested image format cannot be produced for a block type
    #[error(transparent)]
    Format(RenderError),

    /// Rendering a block failed
    #[error("Failed to render {diagram_type} block {}", .index + 1)]
    Render {
        diagram_type: DiagramType,
        index: usize,
        #[source]
        source: RenderError,
    },
}

/// Result of processing one document
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The document contains no diagram blocks; nothing was written
    NoBlocks,
    /// Images and the rewritten document were written
    Converted(Conversion),
}

/// Files written by a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Output directory
    pub out_dir: PathBuf,
    /// Rewritten markdown document
    pub output_markdown: PathBuf,
    /// Generated images in processing order
    pub images: Vec<GeneratedImage>,
}

impl Conversion {
    /// Number of images generated for one diagram type
    pub fn count(&self, diagram_type: DiagramType) -> usize {
        self.images
            .iter()
            .filter(|i| i.diagram_type == diagram_type)
            .count()
    }
}

/// One rendered diagram
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// Diagram language of the source block
    pub diagram_type: DiagramType,
    /// Position among blocks of the same type
    pub index: usize,
    /// Image file on disk
    pub image_path: PathBuf,
    /// Source file on disk, when sources are kept
    pub source_path: Option<PathBuf>,
    /// Markdown link that replaced the block
    pub link: String,
    /// Renderer that produced the image
    pub renderer: String,
}

/// Progress reported while a document is processed
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Blocks of one type are about to be rendered
    Found {
        diagram_type: DiagramType,
        count: usize,
    },
    /// A block is being rendered; `index` is 0-based
    Block {
        diagram_type: DiagramType,
        index: usize,
        total: usize,
    },
    /// A block's source was written
    SourceWritten(PathBuf),
    /// A block's image was written
    ImageWritten(PathBuf),
}

/// Directory containing `input`, `.` for bare file names
pub fn input_dir(input: &Path) -> &Path {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Markdown to image conversion pipeline
pub struct Pipeline {
    settings: Settings,
    engine: DiagramEngine,
}

impl Pipeline {
    /// Create a pipeline that renders with the configured tools
    pub fn new(settings: Settings) -> Result<Self, PipelineError> {
        let dot = ToolCommand::parse(&settings.tools.dot)?;
        let puml = ToolCommand::parse(&settings.tools.puml)?;
        let engine = DiagramEngine::with_commands(dot, puml);
        Ok(Self::with_engine(settings, engine))
    }

    /// Create a pipeline with a custom engine
    pub fn with_engine(settings: Settings, engine: DiagramEngine) -> Self {
        Self { settings, engine }
    }

    /// Active settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Output directory for `input`
    pub fn out_dir(&self, input: &Path) -> PathBuf {
        input_dir(input).join(&self.settings.output.dir)
    }

    /// Path of the rewritten markdown for `input`
    pub fn output_markdown_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.out_dir(input)
            .join(format!("{}{}.md", stem, self.settings.output.suffix))
    }

    /// Process one markdown file
    pub fn process(&self, input: &Path) -> Result<Outcome, PipelineError> {
        self.process_with(input, |_| {})
    }

    /// Process one markdown file, reporting progress as blocks are rendered
    pub fn process_with(
        &self,
        input: &Path,
        mut on_progress: impl FnMut(Progress),
    ) -> Result<Outcome, PipelineError> {
        let markdown = fs::read_to_string(input).map_err(|source| PipelineError::Read {
            path: input.to_path_buf(),
            source,
        })?;

        let blocks = extract_blocks(&markdown);
        if blocks.is_empty() {
            log::info!("No graphviz or plantuml blocks found in {}", input.display());
            return Ok(Outcome::NoBlocks);
        }

        let format = self.settings.render.image_format;
        for diagram_type in DiagramType::all() {
            if blocks.iter().any(|b| b.diagram_type == *diagram_type) {
                self.engine
                    .check_format(*diagram_type, format)
                    .map_err(PipelineError::Format)?;
            }
        }

        let out_dir = self.out_dir(input);
        let images_dir = out_dir.join(&self.settings.output.images_dir);
        fs::create_dir_all(&images_dir).map_err(|source| PipelineError::Write {
            path: images_dir.clone(),
            source,
        })?;

        let mut images = Vec::with_capacity(blocks.len());
        for diagram_type in DiagramType::all() {
            let typed = blocks_of(&blocks, *diagram_type);
            if typed.is_empty() {
                continue;
            }
            log::info!("Found {} {} blocks", typed.len(), diagram_type.fence_name());
            on_progress(Progress::Found {
                diagram_type: *diagram_type,
                count: typed.len(),
            });
            for block in &typed {
                log::info!(
                    "{} block {} of {}",
                    diagram_type.display_name(),
                    block.index + 1,
                    typed.len()
                );
                on_progress(Progress::Block {
                    diagram_type: *diagram_type,
                    index: block.index,
                    total: typed.len(),
                });
                images.push(self.render_block(block, &images_dir, &mut on_progress)?);
            }
        }

        let mut replacements: Vec<_> = blocks
            .iter()
            .zip(order_in_processing(&blocks))
            .map(|(block, position)| (block.span.clone(), images[position].link.clone()))
            .collect();
        replacements.sort_by_key(|(span, _)| span.start);
        let output = replace_blocks(&markdown, &replacements);

        let output_markdown = self.output_markdown_path(input);
        fs::write(&output_markdown, output).map_err(|source| PipelineError::Write {
            path: output_markdown.clone(),
            source,
        })?;
        log::info!("Wrote output file to {}", output_markdown.display());

        Ok(Outcome::Converted(Conversion {
            out_dir,
            output_markdown,
            images,
        }))
    }

    fn render_block(
        &self,
        block: &DiagramBlock,
        images_dir: &Path,
        on_progress: &mut impl FnMut(Progress),
    ) -> Result<GeneratedImage, PipelineError> {
        let format = self.settings.render.image_format;
        let stem = block.image_stem();

        let source_path = if self.settings.render.keep_sources {
            let path = images_dir.join(format!(
                "{}.{}",
                stem,
                block.diagram_type.source_extension()
            ));
            fs::write(&path, &block.content).map_err(|source| PipelineError::Write {
                path: path.clone(),
                source,
            })?;
            log::info!("Wrote text file to {}", path.display());
            on_progress(Progress::SourceWritten(path.clone()));
            Some(path)
        } else {
            None
        };

        let rendered = self
            .engine
            .render_with_metadata(&block.content, block.diagram_type, format)
            .map_err(|source| PipelineError::Render {
                diagram_type: block.diagram_type,
                index: block.index,
                source,
            })?;

        let image_path = images_dir.join(format!("{}.{}", stem, rendered.extension()));
        fs::write(&image_path, &rendered.data).map_err(|source| PipelineError::Write {
            path: image_path.clone(),
            source,
        })?;
        log::debug!(
            "Wrote {} ({} bytes) via {}",
            image_path.display(),
            rendered.data.len(),
            rendered.renderer
        );
        on_progress(Progress::ImageWritten(image_path.clone()));

        Ok(GeneratedImage {
            diagram_type: block.diagram_type,
            index: block.index,
            image_path,
            source_path,
            link: image_link(&self.settings.output.images_dir, &stem, format),
            renderer: rendered.renderer,
        })
    }
}

/// Position of each block (in document order) within processing order
///
/// Processing renders every block of the first diagram type before moving
/// to the next type.
fn order_in_processing(blocks: &[DiagramBlock]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(DiagramType::all().len());
    let mut total = 0;
    for diagram_type in DiagramType::all() {
        offsets.push((*diagram_type, total));
        total += blocks.iter().filter(|b| b.diagram_type == *diagram_type).count();
    }

    blocks
        .iter()
        .map(|block| {
            let base = offsets
                .iter()
                .find(|(t, _)| *t == block.diagram_type)
                .map_or(0, |(_, offset)| *offset);
            base + block.index
        })
        .collect()
}
