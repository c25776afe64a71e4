use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ecr_image_mirror::cli::{Args, RunContext, RunMode, Runner};
use ecr_image_mirror::config::{MirrorPlan, RepositoryPlan};
use ecr_image_mirror::engine::ContainerEngine;
use ecr_image_mirror::image::{DestinationAddress, ImageReference};
use ecr_image_mirror::mirror::{MirrorExecutor, MirrorStep, Session};
use ecr_image_mirror::registry::{AuthGrant, ContainerRegistry, EngineCredentials, RepositoryStatus};
use ecr_image_mirror::{Logger, MirrorError, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const ACCOUNT: &str = "111122223333";
const REGION: &str = "us-east-1";
const ENDPOINT: &str = "https://111122223333.dkr.ecr.us-east-1.amazonaws.com";

type CallLog = Arc<Mutex<Vec<String>>>;

enum CreateBehavior {
    Create,
    AlreadyExistsText,
    Fail,
}

struct FakeRegistry {
    calls: CallLog,
    behavior: CreateBehavior,
    grant: AuthGrant,
}

impl FakeRegistry {
    fn new(calls: CallLog, behavior: CreateBehavior) -> Self {
        Self {
            calls,
            behavior,
            grant: AuthGrant::new(STANDARD.encode("AWS:secret-password"), ENDPOINT),
        }
    }
}

#[async_trait]
impl ContainerRegistry for FakeRegistry {
    async fn authorization_grant(&self) -> Result<AuthGrant> {
        self.calls.lock().unwrap().push("GetAuthorizationToken".to_string());
        Ok(self.grant.clone())
    }

    async fn create_repository(&self, name: &str) -> Result<RepositoryStatus> {
        self.calls.lock().unwrap().push(format!("CreateRepository {}", name));
        match self.behavior {
            CreateBehavior::Create => Ok(RepositoryStatus::Created),
            CreateBehavior::AlreadyExistsText => Err(MirrorError::control_plane(
                "CreateRepository",
                format!(
                    "RepositoryAlreadyExistsException: The repository with name '{}' already exists",
                    name
                ),
            )),
            CreateBehavior::Fail => Err(MirrorError::control_plane(
                "CreateRepository",
                "AccessDeniedException: not authorized",
            )),
        }
    }
}

struct RecordingEngine {
    calls: CallLog,
    fail_on: Option<&'static str>,
}

impl RecordingEngine {
    fn new(calls: CallLog) -> Self {
        Self { calls, fail_on: None }
    }

    fn record(&self, command: &'static str, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(command) {
            return Err(MirrorError::Engine {
                command,
                reason: "exited with exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerEngine for RecordingEngine {
    async fn login(&self, credentials: &EngineCredentials, endpoint: &str) -> Result<()> {
        self.record(
            "login",
            format!("login -u {} -p {} {}", credentials.username, credentials.password, endpoint),
        )
    }

    async fn pull(&self, image: &ImageReference) -> Result<()> {
        self.record("pull", format!("pull {}", image))
    }

    async fn tag(&self, image: &ImageReference, destination: &DestinationAddress) -> Result<()> {
        self.record("tag", format!("tag {} {}", image, destination))
    }

    async fn push(&self, destination: &DestinationAddress) -> Result<()> {
        self.record("push", format!("push {}", destination))
    }
}

fn context(mode: RunMode) -> RunContext {
    RunContext {
        config_path: PathBuf::from("plan.yaml"),
        region: REGION.to_string(),
        account_id: ACCOUNT.to_string(),
        mode,
    }
}

fn plan(entries: &[(&str, &[&str])]) -> MirrorPlan {
    MirrorPlan::new(
        entries
            .iter()
            .map(|(name, images)| RepositoryPlan {
                name: name.to_string(),
                images: images.iter().map(|i| i.to_string()).collect(),
            })
            .collect(),
    )
}

fn destination(reference: &str) -> String {
    format!("{}.dkr.ecr.{}.amazonaws.com/{}", ACCOUNT, REGION, reference)
}

fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn test_happy_path_single_image() {
    let log = CallLog::default();
    let registry = FakeRegistry::new(log.clone(), CreateBehavior::Create);
    let engine = RecordingEngine::new(log.clone());
    let runner = Runner::new(context(RunMode::Live), Logger::new_quiet());

    let report = runner
        .run_live(&plan(&[("nginx", &["nginx:1.25"])]), &registry, &engine)
        .await
        .unwrap();

    assert_eq!(
        calls(&log),
        [
            "GetAuthorizationToken".to_string(),
            format!("login -u AWS -p secret-password {}", ENDPOINT),
            "CreateRepository nginx".to_string(),
            "pull nginx:1.25".to_string(),
            format!("tag nginx:1.25 {}", destination("nginx:1.25")),
            format!("push {}", destination("nginx:1.25")),
        ]
    );
    assert_eq!(report.repositories, 1);
    assert_eq!(report.created_repositories, 1);
    assert_eq!(report.images, 1);
}

#[tokio::test]
async fn test_multiple_images_back_to_back() {
    let log = CallLog::default();
    let registry = FakeRegistry::new(log.clone(), CreateBehavior::Create);
    let engine = RecordingEngine::new(log.clone());
    let ctx = context(RunMode::Live);
    let output = Logger::new_quiet();

    MirrorExecutor::new(&ctx, Session::Live { registry: &registry, engine: &engine }, &output)
        .execute(&plan(&[("alpine", &["alpine:3.19", "alpine:3.18"])]))
        .await
        .unwrap();

    assert_eq!(
        calls(&log),
        [
            "CreateRepository alpine".to_string(),
            "pull alpine:3.19".to_string(),
            format!("tag alpine:3.19 {}", destination("alpine:3.19")),
            format!("push {}", destination("alpine:3.19")),
            "pull alpine:3.18".to_string(),
            format!("tag alpine:3.18 {}", destination("alpine:3.18")),
            format!("push {}", destination("alpine:3.18")),
        ]
    );
}

#[tokio::test]
async fn test_repository_already_exists_continues() {
    let log = CallLog::default();
    let registry = FakeRegistry::new(log.clone(), CreateBehavior::AlreadyExistsText);
    let engine = RecordingEngine::new(log.clone());
    let ctx = context(RunMode::Live);
    let output = Logger::new_quiet();

    let report = MirrorExecutor::new(&ctx, Session::Live { registry: &registry, engine: &engine }, &output)
        .execute(&plan(&[("nginx", &["nginx:1.25", "nginx:1.24"])]))
        .await
        .unwrap();

    assert_eq!(report.images, 2);
    assert_eq!(report.created_repositories, 0);
    let pushes = calls(&log).iter().filter(|c| c.starts_with("push ")).count();
    assert_eq!(pushes, 2);
}

#[tokio::test]
async fn test_other_create_error_aborts() {
    let log = CallLog::default();
    let registry = FakeRegistry::new(log.clone(), CreateBehavior::Fail);
    let engine = RecordingEngine::new(log.clone());
    let ctx = context(RunMode::Live);
    let output = Logger::new_quiet();

    let err = MirrorExecutor::new(&ctx, Session::Live { registry: &registry, engine: &engine }, &output)
        .execute(&plan(&[("nginx", &["nginx:1.25"])]))
        .await
        .unwrap_err();

    assert!(matches!(err, MirrorError::ControlPlane { operation: "CreateRepository", .. }));
    assert_eq!(calls(&log), ["CreateRepository nginx"]);
}

#[tokio::test]
async fn test_dry_run_matches_live_steps() {
    let mirror_plan = plan(&[("nginx", &["nginx:1.25"]), ("alpine", &[])]);
    let output = Logger::new_quiet();

    let dry_ctx = context(RunMode::Dry);
    let dry = MirrorExecutor::new(&dry_ctx, Session::Dry, &output)
        .execute(&mirror_plan)
        .await
        .unwrap();

    let log = CallLog::default();
    let registry = FakeRegistry::new(log.clone(), CreateBehavior::Create);
    let engine = RecordingEngine::new(log.clone());
    let live_ctx = context(RunMode::Live);
    let live = MirrorExecutor::new(&live_ctx, Session::Live { registry: &registry, engine: &engine }, &output)
        .execute(&mirror_plan)
        .await
        .unwrap();

    assert!(dry.dry_run);
    assert!(!live.dry_run);
    assert_eq!(dry.steps, live.steps);
    assert_eq!(dry.steps.len(), calls(&log).len());
    assert_eq!(dry.steps[0], MirrorStep::EnsureRepository("nginx".to_string()));
    assert_eq!(dry.steps[4], MirrorStep::EnsureRepository("alpine".to_string()));
}

#[tokio::test]
async fn test_dry_run_from_plan_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "registryMap:\n  nginx:\n    - nginx:1.25").unwrap();

    let mut ctx = context(RunMode::Dry);
    ctx.config_path = file.path().to_path_buf();

    let report = Runner::new(ctx, Logger::new_quiet()).run().await.unwrap();

    assert!(report.dry_run);
    assert_eq!(report.images, 1);
    assert_eq!(
        report.steps.last().map(|s| s.to_string()),
        Some(format!("push image {} to ecr", destination("nginx:1.25")))
    );
}

#[tokio::test]
async fn test_bad_reference_stops_before_repository() {
    let log = CallLog::default();
    let registry = FakeRegistry::new(log.clone(), CreateBehavior::Create);
    let engine = RecordingEngine::new(log.clone());
    let ctx = context(RunMode::Live);
    let output = Logger::new_quiet();

    let err = MirrorExecutor::new(&ctx, Session::Live { registry: &registry, engine: &engine }, &output)
        .execute(&plan(&[("redis", &["redis:7.2"]), ("nginx", &["nginx:1.25", "nginx"])]))
        .await
        .unwrap_err();

    assert!(matches!(&err, MirrorError::InvalidReference { reference, .. } if reference == "nginx"));
    // Earlier repositories stay fully mirrored; nothing touches the failing one.
    let recorded = calls(&log);
    assert_eq!(recorded.len(), 4);
    assert!(recorded.iter().all(|c| !c.contains("nginx")));
}

#[tokio::test]
async fn test_engine_failure_is_fail_fast() {
    let log = CallLog::default();
    let registry = FakeRegistry::new(log.clone(), CreateBehavior::Create);
    let engine = RecordingEngine {
        calls: log.clone(),
        fail_on: Some("pull"),
    };
    let ctx = context(RunMode::Live);
    let output = Logger::new_quiet();

    let err = MirrorExecutor::new(&ctx, Session::Live { registry: &registry, engine: &engine }, &output)
        .execute(&plan(&[("nginx", &["nginx:1.25"]), ("alpine", &["alpine:3.19"])]))
        .await
        .unwrap_err();

    assert!(matches!(err, MirrorError::Engine { command: "pull", .. }));
    assert_eq!(calls(&log), ["CreateRepository nginx", "pull nginx:1.25"]);
}

#[tokio::test]
async fn test_login_failure_stops_run() {
    let log = CallLog::default();
    let registry = FakeRegistry::new(log.clone(), CreateBehavior::Create);
    let engine = RecordingEngine {
        calls: log.clone(),
        fail_on: Some("login"),
    };
    let runner = Runner::new(context(RunMode::Live), Logger::new_quiet());

    let err = runner
        .run_live(&plan(&[("nginx", &["nginx:1.25"])]), &registry, &engine)
        .await
        .unwrap_err();

    assert!(matches!(err, MirrorError::Engine { command: "login", .. }));
    assert_eq!(calls(&log).len(), 2);
}

#[tokio::test]
async fn test_malformed_grant_stops_before_login() {
    let log = CallLog::default();
    let mut registry = FakeRegistry::new(log.clone(), CreateBehavior::Create);
    registry.grant = AuthGrant::new(STANDARD.encode("no-separator"), ENDPOINT);
    let engine = RecordingEngine::new(log.clone());
    let runner = Runner::new(context(RunMode::Live), Logger::new_quiet());

    let err = runner
        .run_live(&plan(&[("nginx", &["nginx:1.25"])]), &registry, &engine)
        .await
        .unwrap_err();

    assert!(matches!(err, MirrorError::Credentials(_)));
    assert_eq!(calls(&log), ["GetAuthorizationToken"]);
}

#[test]
fn test_missing_account_id_reads_nothing() {
    let args = Args::try_parse_from([
        "ecr-image-mirror",
        "-c",
        "/nonexistent/plan.yaml",
        "-r",
        REGION,
    ])
    .unwrap();

    let err = args.validate().unwrap_err();
    assert!(err.to_string().contains("--aws-account-id"), "{}", err);
}
