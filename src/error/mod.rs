//! Error types for mirror runs
//!
//! Every failure is fatal to the run. Messages name the failed step and the
//! upstream reason.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MirrorError>;

/// Error code reported by ECR when `CreateRepository` targets an existing repository.
pub const REPOSITORY_ALREADY_EXISTS: &str = "RepositoryAlreadyExistsException";

#[derive(Error, Debug)]
pub enum MirrorError {
    /// One or more required operator inputs were absent or empty
    #[error("Missing required input: {}", .0.join(", "))]
    MissingInput(Vec<String>),

    /// Mirror plan could not be read or decoded
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid image reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// Ambient credentials or the authorization grant were unusable
    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("{operation} failed: {message}")]
    ControlPlane {
        operation: &'static str,
        message: String,
    },

    /// The container engine could not be started or exited non-zero
    #[error("docker {command} failed: {reason}")]
    Engine {
        command: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MirrorError {
    pub fn invalid_reference(reference: &str, reason: impl Into<String>) -> Self {
        MirrorError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }

    pub fn control_plane(operation: &'static str, message: impl Into<String>) -> Self {
        MirrorError::ControlPlane {
            operation,
            message: message.into(),
        }
    }

    /// Textual fallback for registries that only surface an error message.
    pub fn is_repository_already_exists(&self) -> bool {
        matches!(
            self,
            MirrorError::ControlPlane { message, .. } if message.contains(REPOSITORY_ALREADY_EXISTS)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_names_every_flag() {
        let err = MirrorError::MissingInput(vec![
            "--aws-region".to_string(),
            "--aws-account-id".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required input: --aws-region, --aws-account-id"
        );
    }

    #[test]
    fn test_already_exists_detection() {
        let exists = MirrorError::control_plane(
            "CreateRepository",
            "RepositoryAlreadyExistsException: The repository with name 'nginx' already exists",
        );
        assert!(exists.is_repository_already_exists());

        let denied = MirrorError::control_plane("CreateRepository", "AccessDeniedException");
        assert!(!denied.is_repository_already_exists());

        let engine = MirrorError::Engine {
            command: "push",
            reason: REPOSITORY_ALREADY_EXISTS.to_string(),
        };
        assert!(!engine.is_repository_already_exists());
    }
}
