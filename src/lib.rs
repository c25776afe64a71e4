//! ECR Image Mirror Library
//!
//! This file serves as the library root for the ecr-image-mirror crate,
//! organizing and exposing the modules that mirror Docker Hub images into
//! Amazon ECR.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod image;
pub mod logging;
pub mod mirror;
pub mod registry;

pub use config::MirrorPlan;
pub use error::{MirrorError, Result};
pub use logging::Logger;
