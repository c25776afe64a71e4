//! Command-line argument parsing

use crate::cli::operation_mode::{RunContext, RunMode};
use crate::error::{MirrorError, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ecr-image-mirror")]
#[command(about = "Copies images from Docker Hub into Amazon ECR repositories")]
#[command(version, author)]
pub struct Args {
    /// Mirror plan file
    #[arg(
        long = "config",
        short = 'c',
        help = "Path to the YAML mirror plan"
    )]
    pub config: Option<String>,

    #[arg(
        long = "aws-region",
        short = 'r',
        help = "AWS region of the destination registry"
    )]
    pub aws_region: Option<String>,

    #[arg(
        long = "aws-account-id",
        short = 'a',
        help = "AWS account id owning the destination registry"
    )]
    pub aws_account_id: Option<String>,

    /// Dry run mode (log without pulling, pushing or calling AWS)
    #[arg(
        long = "dry-run",
        short = 'd',
        help = "Log the intended actions without performing them"
    )]
    pub dry_run: bool,

    #[arg(
        long = "verbose",
        short = 'v',
        conflicts_with = "quiet",
        help = "Enable verbose output"
    )]
    pub verbose: bool,

    #[arg(
        long = "quiet",
        short = 'q',
        help = "Only print warnings and errors"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Check every required input and build the immutable run context.
    ///
    /// All missing inputs are reported together; nothing external is touched.
    pub fn validate(&self) -> Result<RunContext> {
        let required = [
            ("--config", &self.config),
            ("--aws-region", &self.aws_region),
            ("--aws-account-id", &self.aws_account_id),
        ];

        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(flag, _)| flag.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(MirrorError::MissingInput(missing));
        }

        let value = |field: &Option<String>| field.as_deref().unwrap_or_default().trim().to_string();

        Ok(RunContext {
            config_path: PathBuf::from(value(&self.config)),
            region: value(&self.aws_region),
            account_id: value(&self.aws_account_id),
            mode: if self.dry_run { RunMode::Dry } else { RunMode::Live },
        })
    }
}
