//! Declarative app descriptor and top-level synthesis
//!
//! The descriptor (App.yaml) is the outer boundary of the compiler: literal
//! identity fields, image reference, ports, volumes and replica count. One
//! descriptor is synthesized into one resource graph.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::container::WebContainer;
use crate::deployment::compose;
use crate::error::{CoreError, Result};
use crate::graph::ResourceGraph;
use crate::identity::{AppIdentity, DEFAULT_MAX_LEN, DEFAULT_SLOT};
use crate::service::fan_out;
use crate::volume::ConfigVolume;

/// Declarative application descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppSpec {
    /// Application (chart) name
    pub name: String,

    /// Application version
    pub version: String,

    /// Container image reference
    pub image: String,

    /// Replica count
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Main application port
    pub port: i32,

    /// Node port for the plain service (absent: no external exposure)
    #[serde(default)]
    pub public_port: Option<i32>,

    /// TLS termination port (zero: no TLS service)
    #[serde(default)]
    pub tls_port: i32,

    /// Debug ports (never node-routable)
    #[serde(default)]
    pub debug_ports: Vec<i32>,

    /// Readiness health-check path
    #[serde(default = "default_check_path")]
    pub check_path: String,

    /// CLI arguments for the main container
    #[serde(default)]
    pub args: Vec<String>,

    /// Config volumes mounted into the main container
    #[serde(default)]
    pub volumes: Vec<VolumeSpec>,
}

/// A config volume declaration: either inline data or a single source file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolumeSpec {
    pub name: String,

    /// In-container mount path (must be unique per container)
    pub mount_path: String,

    /// Inline filename -> content data
    #[serde(default)]
    pub data: BTreeMap<String, String>,

    /// Read content from a file instead of inline data
    #[serde(default)]
    pub file: Option<FileSource>,
}

/// File-sourced volume content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileSource {
    /// Path to read at synthesis time
    pub source: PathBuf,
    /// In-container filename for the content
    pub target: String,
}

fn default_replicas() -> i32 {
    1
}

fn default_check_path() -> String {
    "/".to_string()
}

impl AppSpec {
    /// Load and validate a descriptor from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CoreError::AppNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let spec: AppSpec = serde_yaml::from_str(&content)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Parse and validate a descriptor from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let spec: AppSpec = serde_yaml::from_str(content)?;
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("version", &self.version),
            ("image", &self.image),
        ] {
            if value.is_empty() {
                return Err(CoreError::InvalidApp {
                    message: format!("{} must not be empty", field),
                });
            }
        }
        for volume in &self.volumes {
            if volume.file.is_some() && !volume.data.is_empty() {
                return Err(CoreError::InvalidApp {
                    message: format!(
                        "volume {} declares both inline data and a file source",
                        volume.name
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Synthesis parameters that are not part of the descriptor itself.
#[derive(Debug, Clone)]
pub struct SynthOptions {
    /// Deployment slot
    pub slot: String,
    /// Maximum derived-name length
    pub max_len: usize,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            slot: DEFAULT_SLOT.to_string(),
            max_len: DEFAULT_MAX_LEN,
        }
    }
}

/// Synthesize a descriptor into a resource graph.
///
/// The identity is built once; deployment composition and service fan-out
/// each consume it independently and their objects are collected into the
/// same graph: ConfigMaps first, then the Deployment, then the services.
pub fn synth(spec: &AppSpec, options: &SynthOptions) -> Result<ResourceGraph> {
    let identity = AppIdentity::new(&spec.name, &spec.version)
        .with_slot(&options.slot)
        .with_max_len(options.max_len);

    tracing::debug!(app = %spec.name, slot = %options.slot, "synthesizing application");

    let mut container = WebContainer::new(identity.name(), &spec.image, spec.port)
        .with_args(spec.args.clone())
        .with_check_path(&spec.check_path);

    let mut volumes = Vec::with_capacity(spec.volumes.len());
    for declared in &spec.volumes {
        let volume = match &declared.file {
            Some(file) => ConfigVolume::from_file(&declared.name, &file.source, &file.target)?,
            None => ConfigVolume::new(&declared.name, declared.data.clone()),
        };
        container = container.mount(&declared.mount_path, &volume);
        volumes.push(volume);
    }

    let workload = compose(
        &identity,
        spec.replicas,
        vec![container.build()],
        &volumes,
        None,
        None,
    );

    let mut graph = ResourceGraph::new();
    for config_map in workload.config_maps {
        graph.push(config_map);
    }
    graph.push(workload.deployment);
    for service in fan_out(
        &identity,
        spec.port,
        spec.tls_port,
        spec.public_port,
        &spec.debug_ports,
    ) {
        graph.push(service);
    }

    Ok(graph)
}
