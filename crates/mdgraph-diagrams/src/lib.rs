//! # mdgraph-diagrams
//!
//! Diagram rendering for mdgraph. Each supported diagram language is
//! rendered by an external command-line tool:
//!
//! - GraphViz (DOT language) via `dot`
//! - PlantUML via the node-plantuml `puml` CLI
//!
//! ## Example
//!
//! ```no_run
//! use mdgraph_diagrams::{DiagramEngine, DiagramType, ImageFormat};
//!
//! let engine = DiagramEngine::new();
//! let png = engine.render("digraph { a -> b }", DiagramType::GraphViz, ImageFormat::Png)?;
//! # Ok::<(), mdgraph_diagrams::RenderError>(())
//! ```

pub mod command;
pub mod engine;
pub mod error;
pub mod graphviz;
pub mod plantuml;
pub mod renderer;
pub mod types;

pub use command::ToolCommand;
pub use engine::DiagramEngine;
pub use error::{DiagramError, Result};
pub use graphviz::{default_dot_command, GraphvizRenderer};
pub use plantuml::{PlantUmlRenderer, DEFAULT_PUML_COMMAND};
pub use renderer::{DiagramRenderer, RenderError, RenderResult, RenderedDiagram};
pub use types::{DiagramType, ImageFormat};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
