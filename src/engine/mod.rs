//! Local container engine
//!
//! The mirror drives a local engine for every image transfer. [`ContainerEngine`]
//! is the capability the executor needs; [`DockerEngine`] implements it by
//! running the `docker` CLI with the parent's stdout and stderr attached.

use crate::error::{MirrorError, Result};
use crate::image::{DestinationAddress, ImageReference};
use crate::logging::Logger;
use crate::registry::EngineCredentials;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

pub const DOCKER_BINARY: &str = "docker";

#[async_trait]
pub trait ContainerEngine: Send + Sync {
    async fn login(&self, credentials: &EngineCredentials, endpoint: &str) -> Result<()>;

    async fn pull(&self, image: &ImageReference) -> Result<()>;

    async fn tag(&self, image: &ImageReference, destination: &DestinationAddress) -> Result<()>;

    async fn push(&self, destination: &DestinationAddress) -> Result<()>;
}

/// Engine backed by the `docker` CLI on `PATH`
#[derive(Debug, Clone)]
pub struct DockerEngine {
    binary: String,
    output: Logger,
}

impl DockerEngine {
    pub fn new(output: Logger) -> Self {
        Self::with_binary(DOCKER_BINARY, output)
    }

    pub fn with_binary(binary: impl Into<String>, output: Logger) -> Self {
        Self {
            binary: binary.into(),
            output,
        }
    }

    /// Run one engine subcommand, streaming its output, and fail on non-zero exit.
    ///
    /// `display_args` is what gets logged; it differs from `args` only when
    /// an argument is secret.
    async fn run(&self, command: &'static str, args: &[&str], display_args: &[&str]) -> Result<()> {
        self.output.detail(&format!(
            "Running: {} {} {}",
            self.binary,
            command,
            display_args.join(" ")
        ));

        let status = Command::new(&self.binary)
            .arg(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| MirrorError::Engine {
                command,
                reason: format!("unable to start {}: {}", self.binary, e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(MirrorError::Engine {
                command,
                reason: format!("exited with {}", status),
            })
        }
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn login(&self, credentials: &EngineCredentials, endpoint: &str) -> Result<()> {
        self.run(
            "login",
            &["-u", credentials.username.as_str(), "-p", credentials.password.as_str(), endpoint],
            &["-u", credentials.username.as_str(), "-p", "********", endpoint],
        )
        .await
    }

    async fn pull(&self, image: &ImageReference) -> Result<()> {
        let image = image.to_string();
        let args = [image.as_str()];
        self.run("pull", &args, &args).await
    }

    async fn tag(&self, image: &ImageReference, destination: &DestinationAddress) -> Result<()> {
        let image = image.to_string();
        let args = [image.as_str(), destination.as_str()];
        self.run("tag", &args, &args).await
    }

    async fn push(&self, destination: &DestinationAddress) -> Result<()> {
        let args = [destination.as_str()];
        self.run("push", &args, &args).await
    }
}
