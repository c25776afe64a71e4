//! `name:tag` references and their ECR destination addresses

use crate::error::{MirrorError, Result};
use std::fmt;

/// A source image reference of the form `name:tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    name: String,
    tag: String,
}

impl ImageReference {
    /// Parse a reference, requiring exactly one `:` with non-empty parts on both sides.
    pub fn parse(reference: &str) -> Result<Self> {
        if reference.contains('@') {
            return Err(MirrorError::invalid_reference(
                reference,
                "digest references are not supported, use name:tag",
            ));
        }

        let parts: Vec<&str> = reference.split(':').collect();
        match parts.as_slice() {
            [name, tag] if !name.is_empty() && !tag.is_empty() => Ok(Self {
                name: name.to_string(),
                tag: tag.to_string(),
            }),
            [_] => Err(MirrorError::invalid_reference(
                reference,
                "missing tag, expected name:tag",
            )),
            [_, _] => Err(MirrorError::invalid_reference(
                reference,
                "name and tag must both be non-empty",
            )),
            _ => Err(MirrorError::invalid_reference(
                reference,
                "expected exactly one ':' separating name and tag",
            )),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name(), self.tag())
    }
}

/// ECR registry host for an account and region
pub fn registry_host(account_id: &str, region: &str) -> String {
    format!("{}.dkr.ecr.{}.amazonaws.com", account_id, region)
}

/// Fully qualified ECR address an image is retagged and pushed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationAddress(String);

impl DestinationAddress {
    pub fn new(account_id: &str, region: &str, image: &ImageReference) -> Self {
        Self(format!("{}/{}", registry_host(account_id, region), image))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
