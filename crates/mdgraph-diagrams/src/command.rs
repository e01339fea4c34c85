//! External tool invocation
//!
//! Renderers shell out to command-line tools. A [`ToolCommand`] is parsed
//! from a configured command line such as `dot` or `java -jar plantuml.jar`:
//! the first word is the program and any remaining words are passed before
//! the renderer's own arguments.

use std::ffi::OsStr;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};
use std::str::FromStr;

use crate::error::DiagramError;
use crate::renderer::{RenderError, RenderResult};

/// A configured external command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a command for a bare program name
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parse a whitespace separated command line
    pub fn parse(line: &str) -> Result<Self, DiagramError> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| DiagramError::InvalidCommand("empty command line".to_string()))?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    /// Program to execute
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Leading arguments configured with the program
    pub fn leading_args(&self) -> &[String] {
        &self.args
    }

    /// Build a [`Command`] with the leading arguments followed by `extra`
    pub fn to_command<I, S>(&self, extra: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(&self.args).args(extra);
        command
    }

    /// Run the command to completion
    ///
    /// Stdout is discarded and stderr is captured for error reporting.
    pub fn run<I, S>(&self, extra: I) -> RenderResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.execute(self.to_command(extra))
    }

    /// Run the command with `dir` as its working directory
    pub fn run_in<I, S>(&self, dir: &Path, extra: I) -> RenderResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = self.to_command(extra);
        command.current_dir(dir);
        self.execute(command)
    }

    fn execute(&self, mut command: Command) -> RenderResult<()> {
        log::info!("Running command {}", describe(&command));

        let output = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RenderError::Unavailable(format!(
                    "`{}` was not found on PATH. {}",
                    self.program,
                    install_hint(&self.program)
                )),
                _ => RenderError::Io(e),
            })?;

        if !output.status.success() {
            return Err(RenderError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl FromStr for ToolCommand {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Render a command as a single line for logs
pub fn describe(command: &Command) -> String {
    let mut line = command.get_program().to_string_lossy().into_owned();
    for arg in command.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

fn install_hint(program: &str) -> &'static str {
    let name = Path::new(program)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(program);
    match name {
        "dot" => "Install Graphviz (https://graphviz.org/download/).",
        "puml" => "Install node-plantuml: npm install -g node-plantuml",
        "pandoc" => "Install Pandoc (https://pandoc.org/installing.html).",
        _ => "Check the tool configuration.",
    }
}
