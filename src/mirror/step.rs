//! Steps a mirror run is made of, and the report of a finished run

use crate::image::{DestinationAddress, ImageReference};
use std::fmt;

/// One externally visible action of a mirror run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorStep {
    EnsureRepository(String),
    Pull(ImageReference),
    Tag {
        source: ImageReference,
        destination: DestinationAddress,
    },
    Push(DestinationAddress),
}

impl fmt::Display for MirrorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorStep::EnsureRepository(name) => write!(f, "ensure repository {}", name),
            MirrorStep::Pull(image) => write!(f, "pull image {} from docker hub", image),
            MirrorStep::Tag {
                source,
                destination,
            } => write!(f, "tag image {} as {}", source, destination),
            MirrorStep::Push(destination) => write!(f, "push image {} to ecr", destination),
        }
    }
}

/// What a completed run did (or, in dry mode, would have done)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub dry_run: bool,
    pub repositories: usize,
    pub images: usize,
    pub created_repositories: usize,
    pub steps: Vec<MirrorStep>,
}
