//! Resource object graph
//!
//! The synthesis output: a flat, explicitly-built set of manifest objects
//! with no shared mutable state. Components return resource objects and the
//! top-level composer collects them here; nothing registers itself into an
//! ambient scope.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Service};
use serde::Serialize;

use crate::error::Result;

/// One manifest object in the synthesis output.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ManifestObject {
    ConfigMap(ConfigMap),
    Deployment(Deployment),
    Service(Service),
}

impl ManifestObject {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigMap(_) => "ConfigMap",
            Self::Deployment(_) => "Deployment",
            Self::Service(_) => "Service",
        }
    }

    pub fn name(&self) -> &str {
        let name = match self {
            Self::ConfigMap(cm) => cm.metadata.name.as_deref(),
            Self::Deployment(d) => d.metadata.name.as_deref(),
            Self::Service(s) => s.metadata.name.as_deref(),
        };
        name.unwrap_or("")
    }
}

impl From<ConfigMap> for ManifestObject {
    fn from(cm: ConfigMap) -> Self {
        Self::ConfigMap(cm)
    }
}

impl From<Deployment> for ManifestObject {
    fn from(d: Deployment) -> Self {
        Self::Deployment(d)
    }
}

impl From<Service> for ManifestObject {
    fn from(s: Service) -> Self {
        Self::Service(s)
    }
}

/// The complete set of manifest objects produced by one synthesis pass.
///
/// Objects are immutable once pushed. Name collisions within a kind are
/// detected and flagged, never resolved: two volumes declared with the same
/// name legitimately produce two ConfigMaps with the same derived name, and
/// it is the caller's ambiguity to fix.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    objects: Vec<ManifestObject>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the graph, warning on kind+name collisions.
    pub fn push(&mut self, object: impl Into<ManifestObject>) {
        let object = object.into();
        if self
            .objects
            .iter()
            .any(|o| o.kind() == object.kind() && o.name() == object.name())
        {
            tracing::warn!(
                kind = object.kind(),
                name = object.name(),
                "duplicate object name in output graph"
            );
        }
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[ManifestObject] {
        &self.objects
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// (kind, name) pairs that occur more than once in the graph.
    pub fn duplicate_names(&self) -> Vec<(&'static str, &str)> {
        let mut duplicates = Vec::new();
        for (i, object) in self.objects.iter().enumerate() {
            let first = self
                .objects
                .iter()
                .position(|o| o.kind() == object.kind() && o.name() == object.name());
            if first != Some(i) && !duplicates.contains(&(object.kind(), object.name())) {
                duplicates.push((object.kind(), object.name()));
            }
        }
        duplicates
    }

    /// Render the graph as a multi-document YAML manifest stream.
    pub fn to_yaml(&self) -> Result<String> {
        let mut out = String::new();
        for object in &self.objects {
            out.push_str("---\n");
            out.push_str(&serde_yaml::to_string(object)?);
        }
        Ok(out)
    }
}
