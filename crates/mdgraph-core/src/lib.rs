//! mdgraph-core - diagrams in markdown, rendered
//!
//! Core library for mdgraph: finds Graphviz and PlantUML blocks in a
//! markdown document, renders them to image files and rewrites the
//! document to link to the images. The result can then be published to
//! HTML or PDF with Pandoc.
//!
//! # Example
//!
//! ```
//! use mdgraph_core::{extract_blocks, image_link, replace_blocks};
//! use mdgraph_diagrams::ImageFormat;
//!
//! let markdown = "Intro\n\n```graphviz\ndigraph { a -> b }\n```\n";
//! let blocks = extract_blocks(markdown);
//! assert_eq!(blocks.len(), 1);
//!
//! let replacements: Vec<_> = blocks
//!     .iter()
//!     .map(|b| (b.span.clone(), image_link("images", &b.image_stem(), ImageFormat::Svg)))
//!     .collect();
//! let rewritten = replace_blocks(markdown, &replacements);
//! assert_eq!(rewritten, "Intro\n\n![](./images/graphviz_image_0.svg)\n");
//! ```

pub mod blocks;
pub mod pipeline;
pub mod publish;
pub mod rewrite;
pub mod settings;

// Re-export main types and functions
pub use blocks::{blocks_of, count_by_type, extract_blocks, DiagramBlock};
pub use pipeline::{
    input_dir, Conversion, GeneratedImage, Outcome, Pipeline, PipelineError, Progress,
};
pub use publish::{PublishError, PublishFormat, Publisher, CONTENT_TYPE_META, CSS_FILE_NAME};
pub use rewrite::{image_link, replace_blocks};
pub use settings::{Settings, SettingsError, SETTINGS_FILE_NAME};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
