//! Container assembly for web application pods

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
    Container, ContainerPort, HTTPGetAction, Probe, TCPSocketAction, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::volume::ConfigVolume;

/// Builder for a web application container.
///
/// Produces a container with a fixed `IfNotPresent` pull policy, a TCP
/// liveness probe on the declared port and an HTTP readiness probe on the
/// health-check path. Mount paths are caller-supplied and must be unique
/// per container.
#[derive(Debug, Clone)]
pub struct WebContainer {
    name: String,
    image: String,
    port: i32,
    args: Vec<String>,
    /// mount path -> volume name
    mounts: BTreeMap<String, String>,
    check_path: String,
}

impl WebContainer {
    pub fn new(name: impl Into<String>, image: impl Into<String>, port: i32) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            port,
            args: Vec::new(),
            mounts: BTreeMap::new(),
            check_path: "/".to_string(),
        }
    }

    /// Set CLI arguments passed to the container.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Set the readiness health-check path.
    pub fn with_check_path(mut self, check_path: impl Into<String>) -> Self {
        self.check_path = check_path.into();
        self
    }

    /// Mount `volume` at `path`. One mount entry per referenced volume name.
    pub fn mount(mut self, path: impl Into<String>, volume: &ConfigVolume) -> Self {
        self.mounts.insert(path.into(), volume.name.clone());
        self
    }

    /// Assemble the container descriptor.
    pub fn build(&self) -> Container {
        let volume_mounts: Vec<VolumeMount> = self
            .mounts
            .iter()
            .map(|(path, volume_name)| VolumeMount {
                mount_path: path.clone(),
                name: volume_name.clone(),
                ..Default::default()
            })
            .collect();

        let (liveness, readiness) = probes(self.port, &self.check_path);

        Container {
            name: self.name.clone(),
            image: Some(self.image.clone()),
            image_pull_policy: Some("IfNotPresent".to_string()),
            args: if self.args.is_empty() {
                None
            } else {
                Some(self.args.clone())
            },
            ports: Some(vec![ContainerPort {
                container_port: self.port,
                ..Default::default()
            }]),
            liveness_probe: Some(liveness),
            readiness_probe: Some(readiness),
            volume_mounts: if volume_mounts.is_empty() {
                None
            } else {
                Some(volume_mounts)
            },
            ..Default::default()
        }
    }
}

/// Liveness and readiness probes for an HTTP service on `port`.
///
/// Liveness is a bare TCP connect (reachability); readiness is an HTTP GET
/// on `path` (functional check).
fn probes(port: i32, path: &str) -> (Probe, Probe) {
    let liveness = Probe {
        tcp_socket: Some(TCPSocketAction {
            port: IntOrString::Int(port),
            ..Default::default()
        }),
        ..Default::default()
    };
    let readiness = Probe {
        http_get: Some(HTTPGetAction {
            path: Some(path.to_string()),
            port: IntOrString::Int(port),
            ..Default::default()
        }),
        ..Default::default()
    };
    (liveness, readiness)
}
