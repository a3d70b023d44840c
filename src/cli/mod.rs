//! CLI implementation using clap.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::InputConfig;
use crate::core::{Error, Result, SubmissionInput};
use crate::input;
use crate::output::Format;

/// fixeval - Score a candidate bug fix against a reference fix.
#[derive(Parser)]
#[command(name = "fixeval")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (default: from config, else text)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare a candidate fix with a reference fix
    #[command(alias = "eval")]
    Evaluate(EvaluateArgs),

    /// Analyze a single fix
    Analyze(AnalyzeArgs),

    /// Write a default configuration file
    Init(InitArgs),
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Reference fix: directory before the fix
    #[arg(long, requires = "reference_after", conflicts_with = "reference")]
    pub reference_before: Option<PathBuf>,

    /// Reference fix: directory after the fix
    #[arg(long, requires = "reference_before")]
    pub reference_after: Option<PathBuf>,

    /// Candidate fix: directory before the fix
    #[arg(long, requires = "candidate_after", conflicts_with = "candidate")]
    pub candidate_before: Option<PathBuf>,

    /// Candidate fix: directory after the fix
    #[arg(long, requires = "candidate_before")]
    pub candidate_after: Option<PathBuf>,

    /// Reference fix as a JSON manifest
    #[arg(long, conflicts_with = "reference_after")]
    pub reference: Option<PathBuf>,

    /// Candidate fix as a JSON manifest
    #[arg(long, conflicts_with = "candidate_after")]
    pub candidate: Option<PathBuf>,

    /// Fail when the overall score (0-100) is below this value
    #[arg(long)]
    pub fail_under: Option<f64>,
}

impl EvaluateArgs {
    pub fn reference_source(&self) -> Result<SubmissionSource> {
        SubmissionSource::resolve(
            "reference",
            self.reference.as_deref(),
            self.reference_before.as_deref(),
            self.reference_after.as_deref(),
        )
    }

    pub fn candidate_source(&self) -> Result<SubmissionSource> {
        SubmissionSource::resolve(
            "candidate",
            self.candidate.as_deref(),
            self.candidate_before.as_deref(),
            self.candidate_after.as_deref(),
        )
    }
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Directory before the fix
    #[arg(long, requires = "after", conflicts_with = "manifest")]
    pub before: Option<PathBuf>,

    /// Directory after the fix
    #[arg(long, requires = "before")]
    pub after: Option<PathBuf>,

    /// Fix as a JSON manifest
    #[arg(long, conflicts_with = "after")]
    pub manifest: Option<PathBuf>,
}

impl AnalyzeArgs {
    pub fn source(&self) -> Result<SubmissionSource> {
        SubmissionSource::resolve(
            "fix",
            self.manifest.as_deref(),
            self.before.as_deref(),
            self.after.as_deref(),
        )
    }
}

#[derive(Args)]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(short, long, default_value = "fixeval.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Write the effective configuration (files and environment applied)
    /// instead of the commented template
    #[arg(long)]
    pub resolved: bool,
}

/// Output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[value(alias = "md")]
    Markdown,
    Text,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Text => Format::Text,
        }
    }
}

/// Where one submission's files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionSource {
    Directories { before: PathBuf, after: PathBuf },
    Manifest(PathBuf),
}

impl SubmissionSource {
    fn resolve(
        side: &str,
        manifest: Option<&Path>,
        before: Option<&Path>,
        after: Option<&Path>,
    ) -> Result<Self> {
        match (manifest, before, after) {
            (Some(path), None, None) => Ok(Self::Manifest(path.to_path_buf())),
            (None, Some(before), Some(after)) => Ok(Self::Directories {
                before: before.to_path_buf(),
                after: after.to_path_buf(),
            }),
            _ => Err(Error::invalid_input(format!(
                "{side}: provide either a manifest or both a before and an after directory"
            ))),
        }
    }

    pub fn load(&self, config: &InputConfig) -> Result<SubmissionInput> {
        match self {
            Self::Directories { before, after } => input::from_directories(before, after, config),
            Self::Manifest(path) => input::load_manifest(path),
        }
    }
}
