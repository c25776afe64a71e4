//! Mirror execution
//!
//! The executor walks the plan strictly in order: one repository at a time,
//! ensuring it exists before any of its images, then pull, tag and push for
//! each image. The first failure aborts the run.

pub mod login;
pub mod step;

pub use login::login_engine;
pub use step::{MirrorStep, RunReport};

use crate::cli::RunContext;
use crate::config::{MirrorPlan, RepositoryPlan};
use crate::engine::ContainerEngine;
use crate::error::Result;
use crate::image::{DestinationAddress, ImageReference};
use crate::logging::Logger;
use crate::registry::{ContainerRegistry, RepositoryStatus};

/// External systems a run may touch
#[derive(Clone, Copy)]
pub enum Session<'a> {
    Live {
        registry: &'a dyn ContainerRegistry,
        engine: &'a dyn ContainerEngine,
    },
    /// Log every step, perform none
    Dry,
}

pub struct MirrorExecutor<'a> {
    context: &'a RunContext,
    session: Session<'a>,
    output: &'a Logger,
}

impl<'a> MirrorExecutor<'a> {
    pub fn new(context: &'a RunContext, session: Session<'a>, output: &'a Logger) -> Self {
        Self {
            context,
            session,
            output,
        }
    }

    pub async fn execute(&self, plan: &MirrorPlan) -> Result<RunReport> {
        let mut report = RunReport {
            dry_run: matches!(self.session, Session::Dry),
            ..RunReport::default()
        };

        for repository in plan.repositories() {
            self.mirror_repository(repository, &mut report).await?;
            report.repositories += 1;
        }

        Ok(report)
    }

    async fn mirror_repository(&self, repository: &RepositoryPlan, report: &mut RunReport) -> Result<()> {
        self.output.section(&format!("Repository {}", repository.name));

        // A bad reference must stop the run before this repository is touched.
        let images = repository
            .images
            .iter()
            .map(|image| ImageReference::parse(image))
            .collect::<Result<Vec<_>>>()?;

        self.run_step(MirrorStep::EnsureRepository(repository.name.clone()), report)
            .await?;

        if images.is_empty() {
            self.output.info(&format!("No images listed for {}", repository.name));
        }

        for image in images {
            let destination =
                DestinationAddress::new(&self.context.account_id, &self.context.region, &image);

            self.run_step(MirrorStep::Pull(image.clone()), report).await?;
            self.run_step(
                MirrorStep::Tag {
                    source: image,
                    destination: destination.clone(),
                },
                report,
            )
            .await?;
            self.run_step(MirrorStep::Push(destination), report).await?;
            report.images += 1;
        }

        Ok(())
    }

    async fn run_step(&self, step: MirrorStep, report: &mut RunReport) -> Result<()> {
        match self.session {
            Session::Dry => {
                self.output.step(&format!("[dry-run] {}", step));
            }
            Session::Live { registry, engine } => {
                self.output.step(&capitalize(&step.to_string()));
                match &step {
                    MirrorStep::EnsureRepository(name) => {
                        if self.ensure_repository(registry, name).await? == RepositoryStatus::Created {
                            report.created_repositories += 1;
                        }
                    }
                    MirrorStep::Pull(image) => engine.pull(image).await?,
                    MirrorStep::Tag {
                        source,
                        destination,
                    } => engine.tag(source, destination).await?,
                    MirrorStep::Push(destination) => {
                        engine.push(destination).await?;
                        self.output.success(&format!("Pushed {}", destination));
                    }
                }
            }
        }

        report.steps.push(step);
        Ok(())
    }

    async fn ensure_repository(
        &self,
        registry: &dyn ContainerRegistry,
        name: &str,
    ) -> Result<RepositoryStatus> {
        let status = match registry.create_repository(name).await {
            Ok(status) => status,
            Err(err) if err.is_repository_already_exists() => RepositoryStatus::AlreadyExists,
            Err(err) => return Err(err),
        };

        match status {
            RepositoryStatus::Created => self.output.success(&format!("Created repository {}", name)),
            RepositoryStatus::AlreadyExists => {
                self.output.info(&format!("Repository {} already exists", name))
            }
        }
        Ok(status)
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
