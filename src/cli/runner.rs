//! Runner wiring a mirror run together: load plan, connect, log in, mirror

use crate::cli::operation_mode::{RunContext, RunMode};
use crate::config::MirrorPlan;
use crate::engine::{ContainerEngine, DockerEngine};
use crate::error::Result;
use crate::logging::Logger;
use crate::mirror::{MirrorExecutor, RunReport, Session, login_engine};
use crate::registry::{ContainerRegistry, EcrRegistry};

pub struct Runner {
    context: RunContext,
    output: Logger,
}

impl Runner {
    pub fn new(context: RunContext, output: Logger) -> Self {
        Self { context, output }
    }

    /// Run against the real ECR control plane and `docker` CLI.
    pub async fn run(&self) -> Result<RunReport> {
        self.output.section("ECR Image Mirror");
        let plan = self.load_plan()?;

        let report = match self.context.mode {
            RunMode::Dry => self.mirror(&plan, Session::Dry).await?,
            RunMode::Live => {
                let registry = EcrRegistry::connect(&self.context.region, &self.output).await?;
                let engine = DockerEngine::new(self.output.clone());
                self.run_live(&plan, &registry, &engine).await?
            }
        };

        self.print_summary(&report);
        Ok(report)
    }

    /// Log the engine in, then mirror `plan` through the given backends.
    pub async fn run_live(
        &self,
        plan: &MirrorPlan,
        registry: &dyn ContainerRegistry,
        engine: &dyn ContainerEngine,
    ) -> Result<RunReport> {
        login_engine(registry, engine, &self.output).await?;
        self.mirror(plan, Session::Live { registry, engine }).await
    }

    pub fn load_plan(&self) -> Result<MirrorPlan> {
        self.output.step(&format!(
            "Reading config {}",
            self.context.config_path.display()
        ));
        let plan = MirrorPlan::load(&self.context.config_path)?;

        if plan.is_empty() {
            self.output.warning("Mirror plan lists no repositories");
        }
        for repository in plan.repositories() {
            self.output.info(&format!(
                "{} <- [{}]",
                repository.name,
                repository.images.join(", ")
            ));
        }

        Ok(plan)
    }

    async fn mirror(&self, plan: &MirrorPlan, session: Session<'_>) -> Result<RunReport> {
        self.output.info(&format!(
            "Mirroring {} image(s) into {} repositories on {} ({})",
            plan.image_count(),
            plan.repositories().len(),
            self.context.registry_host(),
            self.context.mode
        ));
        MirrorExecutor::new(&self.context, session, &self.output)
            .execute(plan)
            .await
    }

    fn print_summary(&self, report: &RunReport) {
        self.output.summary("Mirror summary", &self.summary_items(report));
        if report.dry_run {
            self.output.success("Dry run completed, nothing was changed");
        } else {
            self.output.success("Mirror completed successfully");
        }
    }

    fn summary_items(&self, report: &RunReport) -> Vec<(&'static str, String)> {
        let mode = if report.dry_run { RunMode::Dry } else { RunMode::Live };
        vec![
            ("Mode", mode.to_string()),
            ("Repositories", report.repositories.to_string()),
            ("Repositories created", report.created_repositories.to_string()),
            ("Images", report.images.to_string()),
            ("Steps", report.steps.len().to_string()),
            ("Elapsed", self.output.format_duration(self.output.elapsed())),
        ]
    }
}
