//! Destination registry control plane
//!
//! This module defines the [`ContainerRegistry`] capability the mirror needs from
//! the destination (authorization and repository creation), the ECR-backed
//! implementation, and decoding of the authorization grant into engine
//! credentials.

pub mod auth;
pub mod client;

use crate::error::Result;
use async_trait::async_trait;

pub use auth::{AuthGrant, EngineCredentials};
pub use client::EcrRegistry;

/// Outcome of ensuring a destination repository exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryStatus {
    Created,
    AlreadyExists,
}

#[async_trait]
pub trait ContainerRegistry: Send + Sync {
    /// Request a short-lived grant the container engine can log in with.
    async fn authorization_grant(&self) -> Result<AuthGrant>;

    /// Create `name` on the destination, reporting whether it already existed.
    async fn create_repository(&self, name: &str) -> Result<RepositoryStatus>;
}
