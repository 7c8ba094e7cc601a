//! Config-data volumes and their ConfigMap backing
//!
//! A `ConfigVolume` is declared once, realized into exactly one ConfigMap
//! per synthesis pass (at deployment-composition time), and referenced by
//! name from any number of container mount points.

use std::collections::BTreeMap;
use std::path::Path;

use k8s_openapi::api::core::v1::{ConfigMap, ConfigMapVolumeSource, Volume};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::error::{CoreError, Result};

/// A named config-data volume. Only ConfigMap-backed volumes are supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigVolume {
    /// Volume name; containers refer to the volume by this name
    pub name: String,
    /// Filename -> content mapping for the backing ConfigMap
    pub data: BTreeMap<String, String>,
}

impl ConfigVolume {
    pub fn new(name: impl Into<String>, data: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Build a volume from a single source file, mounted as `target`.
    ///
    /// The file is read here, at construction time; an unreadable source
    /// fails immediately with [`CoreError::VolumeSource`].
    pub fn from_file(name: impl Into<String>, source: &Path, target: &str) -> Result<Self> {
        let content = std::fs::read_to_string(source).map_err(|e| CoreError::VolumeSource {
            path: source.display().to_string(),
            source: e,
        })?;
        Ok(Self {
            name: name.into(),
            data: BTreeMap::from([(target.to_string(), content)]),
        })
    }

    /// Name of the backing ConfigMap.
    pub fn config_map_name(&self) -> String {
        format!("{}-config", self.name)
    }

    /// Realize the backing ConfigMap.
    ///
    /// Callers must invoke this exactly once per distinct volume per
    /// synthesis pass; repeated realization duplicates the resource in the
    /// output graph.
    pub fn config_map(&self) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(self.config_map_name()),
                ..Default::default()
            },
            data: Some(self.data.clone()),
            ..Default::default()
        }
    }

    /// Pod-level volume referencing the backing ConfigMap by name.
    ///
    /// Independent of [`ConfigVolume::config_map`]: producing the reference
    /// does not realize the resource.
    pub fn pod_volume(&self) -> Volume {
        Volume {
            name: self.name.clone(),
            config_map: Some(ConfigMapVolumeSource {
                name: self.config_map_name(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
