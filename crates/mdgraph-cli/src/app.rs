//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use mdgraph_core::{input_dir, Conversion, Outcome, Pipeline, Progress, Publisher, Settings};
use mdgraph_diagrams::{ImageFormat, ToolCommand};

/// Image format for rendered diagrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormatArg {
    /// PNG raster image
    Png,
    /// JPEG raster image (Graphviz only)
    Jpg,
    /// SVG vector image
    Svg,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Png => ImageFormat::Png,
            ImageFormatArg::Jpg => ImageFormat::Jpg,
            ImageFormatArg::Svg => ImageFormat::Svg,
        }
    }
}

#[derive(Parser)]
#[command(name = "mdgraph")]
#[command(
    author,
    version,
    about = "Generate a markdown document with rendered images from a markdown document with inlined graphviz and plantuml blocks",
    long_about = None
)]
struct Cli {
    /// Markdown file containing graphviz or plantuml blocks
    markdown_filepath: PathBuf,

    /// Image format for rendered diagrams [default: svg]
    #[arg(short = 'T', long, value_enum)]
    image_format: Option<ImageFormatArg>,

    /// Also generate a PDF from the output markdown using pandoc
    #[arg(long)]
    output_pdf: bool,

    /// Also generate HTML from the output markdown using pandoc
    #[arg(long)]
    output_html: bool,

    /// Do not link or copy pandoc.css for HTML output
    #[arg(long)]
    no_css: bool,

    /// Configuration file path (defaults to mdgraph.toml next to the input)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (defaults to `out` next to the input)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Options for a conversion run, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Overrides `render.image_format`
    pub image_format: Option<ImageFormat>,
    /// Produce `<stem>_out.pdf`
    pub output_pdf: bool,
    /// Produce `<stem>_out.html`
    pub output_html: bool,
    /// Link and copy pandoc.css for HTML output
    pub html_css: Option<bool>,
    /// Explicit settings file
    pub config: Option<PathBuf>,
    /// Overrides `output.dir`
    pub out_dir: Option<PathBuf>,
}

/// Files produced by [`convert_command`]
#[derive(Debug, Clone, Default)]
pub struct ConvertReport {
    /// Images and rewritten markdown; `None` when the input had no blocks
    pub conversion: Option<Conversion>,
    /// Generated PDF
    pub pdf: Option<PathBuf>,
    /// Generated HTML
    pub html: Option<PathBuf>,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and runs the conversion.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ConvertOptions {
        image_format: cli.image_format.map(Into::into),
        output_pdf: cli.output_pdf,
        output_html: cli.output_html,
        html_css: cli.no_css.then_some(false),
        config: cli.config,
        out_dir: cli.out_dir,
    };

    convert_command(&cli.markdown_filepath, &options)?;
    Ok(())
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be set when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load settings for `input` and apply command-line overrides
pub fn resolve_settings(input: &Path, options: &ConvertOptions) -> Result<Settings> {
    let mut settings = Settings::resolve(input, options.config.as_deref())
        .context("Failed to load settings")?;

    if let Some(format) = options.image_format {
        settings.render.image_format = format;
    }
    if let Some(html_css) = options.html_css {
        settings.publish.html_css = html_css;
    }
    if let Some(dir) = &options.out_dir {
        settings.output.dir = if dir.is_absolute() {
            dir.clone()
        } else {
            std::env::current_dir()
                .context("Failed to determine current directory")?
                .join(dir)
        };
    }

    if let Some(css) = settings.publish.css.take() {
        settings.publish.css = Some(if css.is_relative() {
            input_dir(input).join(css)
        } else {
            css
        });
    }

    log::debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

/// Execute a conversion
pub fn convert_command(input: &Path, options: &ConvertOptions) -> Result<ConvertReport> {
    println!("mdgraph v{}", mdgraph_core::VERSION);
    println!("Processing: {}", input.display());

    // Check input file exists
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let settings = resolve_settings(input, options)?;
    let pipeline = Pipeline::new(settings.clone())
        .context("Invalid tool configuration")?;

    let outcome = pipeline
        .process_with(input, print_progress)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    let conversion = match outcome {
        Outcome::NoBlocks => {
            println!("No graphviz or plantuml blocks found!");
            return Ok(ConvertReport::default());
        }
        Outcome::Converted(conversion) => conversion,
    };

    println!();
    println!("Wrote output file to {}", conversion.output_markdown.display());

    let markdown = conversion.output_markdown.clone();
    let mut report = ConvertReport {
        conversion: Some(conversion),
        ..ConvertReport::default()
    };

    if options.output_pdf || options.output_html {
        let pandoc = ToolCommand::parse(&settings.tools.pandoc)
            .context("Invalid pandoc command")?;
        let publisher = Publisher::new(pandoc)
            .with_css(settings.publish.css.clone());

        if options.output_pdf {
            let pdf = publisher
                .create_pdf(&markdown)
                .context("Failed to generate PDF")?;
            println!("Wrote PDF to {}", pdf.display());
            report.pdf = Some(pdf);
        }

        if options.output_html {
            let html = publisher
                .create_html(&markdown, settings.publish.html_css)
                .context("Failed to generate HTML")?;
            println!("Wrote HTML to {}", html.display());
            report.html = Some(html);
        }
    }

    Ok(report)
}

/// Print one progress line as the pipeline runs
fn print_progress(progress: Progress) {
    match progress {
        Progress::Found {
            diagram_type,
            count,
        } => {
            println!();
            println!("Found {} {} blocks", count, diagram_type.fence_name());
        }
        Progress::Block {
            diagram_type,
            index,
            total,
        } => println!(
            "    * {} block {} of {}",
            diagram_type.display_name(),
            index + 1,
            total
        ),
        Progress::SourceWritten(path) => println!("        Wrote text file to {}", path.display()),
        Progress::ImageWritten(path) => println!("        Wrote image to {}", path.display()),
    }
}
