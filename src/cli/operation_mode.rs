//! Run mode and the immutable context a run is executed with

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Call AWS and drive the container engine
    Live,
    /// Validate and log only
    Dry,
}

impl RunMode {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, RunMode::Dry)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Live => write!(f, "live"),
            RunMode::Dry => write!(f, "dry run"),
        }
    }
}

/// Validated operator inputs, fixed for the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub config_path: PathBuf,
    pub region: String,
    pub account_id: String,
    pub mode: RunMode,
}

impl RunContext {
    pub fn registry_host(&self) -> String {
        crate::image::registry_host(&self.account_id, &self.region)
    }
}
