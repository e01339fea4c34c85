//! HTML and PDF publishing through Pandoc
//!
//! Pandoc runs inside the output directory so the relative image links in
//! the rewritten markdown and the `pandoc.css` reference both resolve.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use mdgraph_diagrams::{RenderError, ToolCommand};

/// Stylesheet file name inside the output directory
pub const CSS_FILE_NAME: &str = "pandoc.css";

/// Stylesheet used when no custom one is configured
pub const DEFAULT_CSS: &str = include_str!("../assets/pandoc.css");

/// Appended to generated HTML so browsers pick UTF-8
pub const CONTENT_TYPE_META: &str =
    r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8" />"#;

/// Errors raised while publishing
#[derive(Debug, Error)]
pub enum PublishError {
    /// Pandoc could not be run or failed
    #[error("Pandoc failed")]
    Pandoc(#[source] RenderError),

    /// A file could not be read or written
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Document format produced by Pandoc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishFormat {
    /// Standalone HTML page
    Html,
    /// PDF document
    Pdf,
}

impl PublishFormat {
    /// File extension of the published document
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

/// Converts rewritten markdown to HTML or PDF
#[derive(Debug, Clone)]
pub struct Publisher {
    pandoc: ToolCommand,
    css: Option<PathBuf>,
}

impl Publisher {
    /// Create a publisher using the bundled stylesheet
    pub fn new(pandoc: ToolCommand) -> Self {
        Self { pandoc, css: None }
    }

    /// Use a custom stylesheet instead of the bundled one
    pub fn with_css(mut self, css: Option<PathBuf>) -> Self {
        self.css = css;
        self
    }

    /// Pandoc arguments for a conversion
    pub fn arguments(
        format: PublishFormat,
        markdown_name: &str,
        output_name: &str,
        use_css: bool,
    ) -> Vec<String> {
        let mut args = Vec::new();
        match format {
            PublishFormat::Pdf => {
                args.extend(["--css".to_string(), CSS_FILE_NAME.to_string()]);
                args.push("--standalone".to_string());
            }
            PublishFormat::Html => {
                args.push("--standalone".to_string());
                if use_css {
                    args.extend(["--css".to_string(), CSS_FILE_NAME.to_string()]);
                }
            }
        }
        args.push(format!("--output={output_name}"));
        args.push(markdown_name.to_string());
        args
    }

    /// Write the stylesheet into `out_dir`
    pub fn write_css(&self, out_dir: &Path) -> Result<PathBuf, PublishError> {
        let target = out_dir.join(CSS_FILE_NAME);
        // Read before writing: the custom stylesheet may already be the target.
        let css = match &self.css {
            Some(custom) => fs::read(custom).map_err(|source| PublishError::Io {
                path: custom.clone(),
                source,
            })?,
            None => DEFAULT_CSS.as_bytes().to_vec(),
        };
        fs::write(&target, css).map_err(|source| PublishError::Io {
            path: target.clone(),
            source,
        })?;
        log::info!("Copying over pandoc.css to {}", target.display());
        Ok(target)
    }

    /// Convert `markdown` to PDF next to it
    pub fn create_pdf(&self, markdown: &Path) -> Result<PathBuf, PublishError> {
        self.publish(markdown, PublishFormat::Pdf, true)
    }

    /// Convert `markdown` to standalone HTML next to it
    ///
    /// The UTF-8 content type meta tag is appended to the generated page.
    pub fn create_html(&self, markdown: &Path, use_css: bool) -> Result<PathBuf, PublishError> {
        let output = self.publish(markdown, PublishFormat::Html, use_css)?;
        append_content_type_meta(&output)?;
        Ok(output)
    }

    fn publish(
        &self,
        markdown: &Path,
        format: PublishFormat,
        use_css: bool,
    ) -> Result<PathBuf, PublishError> {
        let dir = crate::pipeline::input_dir(markdown);
        let markdown_name = file_name(markdown);
        let output = markdown.with_extension(format.extension());
        let output_name = file_name(&output);

        if use_css {
            self.write_css(dir)?;
        }

        self.pandoc
            .run_in(
                dir,
                Self::arguments(format, &markdown_name, &output_name, use_css),
            )
            .map_err(PublishError::Pandoc)?;

        log::info!("Wrote {} to {}", format.extension(), output.display());
        Ok(output)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Append the UTF-8 content type meta tag to an HTML file
pub fn append_content_type_meta(html: &Path) -> Result<(), PublishError> {
    let io_err = |source| PublishError::Io {
        path: html.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new().append(true).open(html).map_err(io_err)?;
    file.write_all(CONTENT_TYPE_META.as_bytes()).map_err(io_err)
}
