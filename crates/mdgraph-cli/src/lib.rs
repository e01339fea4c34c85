//! mdgraph CLI - Command-line interface library
//!
//! Renders the Graphviz and PlantUML blocks of a markdown document to image
//! files, writes a rewritten copy of the document that links to them, and
//! optionally publishes it to PDF or HTML with Pandoc.
//!
//! # Library Usage
//!
//! ```ignore
//! use mdgraph_cli::{convert_command, ConvertOptions};
//!
//! let report = convert_command(Path::new("docs/guide.md"), &ConvertOptions::default())?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Render blocks to SVG (default) into docs/out/
//! mdgraph docs/guide.md
//!
//! # PNG images, then HTML without the bundled stylesheet
//! mdgraph docs/guide.md -T png --output-html --no-css
//!
//! # PDF via pandoc
//! mdgraph docs/guide.md --output-pdf
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{convert_command, resolve_settings, run_cli};
pub use app::{ConvertOptions, ConvertReport, ImageFormatArg};
