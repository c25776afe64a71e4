//! Mirror plan loading
//!
//! The plan is a YAML document whose `registryMap` maps destination repository
//! names to lists of `name:tag` source images. Repositories keep the order in
//! which they appear in the file, so operators control the run order.

use crate::error::{MirrorError, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Images to mirror into one destination repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPlan {
    pub name: String,
    pub images: Vec<String>,
}

/// Ordered mapping of destination repository to source images
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MirrorPlan {
    repositories: Vec<RepositoryPlan>,
}

#[derive(Deserialize)]
struct PlanDocument {
    #[serde(rename = "registryMap", deserialize_with = "ordered_registry_map")]
    registry_map: Vec<RepositoryPlan>,
}

impl MirrorPlan {
    pub fn new(repositories: Vec<RepositoryPlan>) -> Self {
        Self { repositories }
    }

    /// Read and decode the plan file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MirrorError::Config {
            path: path.to_path_buf(),
            message: format!("unable to read file: {}", e),
        })?;

        Self::from_yaml(&content).map_err(|message| MirrorError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        let document: PlanDocument = serde_yaml::from_str(content)
            .map_err(|e| format!("unable to decode YAML: {}", e))?;
        Ok(Self::new(document.registry_map))
    }

    pub fn repositories(&self) -> &[RepositoryPlan] {
        &self.repositories
    }

    pub fn image_count(&self) -> usize {
        self.repositories.iter().map(|r| r.images.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

fn ordered_registry_map<'de, D>(deserializer: D) -> std::result::Result<Vec<RepositoryPlan>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RegistryMapVisitor;

    impl<'de> Visitor<'de> for RegistryMapVisitor {
        type Value = Vec<RepositoryPlan>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a mapping of repository names to lists of images")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut seen = HashSet::new();
            let mut repositories = Vec::new();

            while let Some((name, images)) = map.next_entry::<String, Option<Vec<String>>>()? {
                if !seen.insert(name.clone()) {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate repository '{}' in registryMap",
                        name
                    )));
                }
                repositories.push(RepositoryPlan {
                    name,
                    images: images.unwrap_or_default(),
                });
            }

            Ok(repositories)
        }
    }

    deserializer.deserialize_map(RegistryMapVisitor)
}
