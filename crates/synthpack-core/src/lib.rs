//! Synthpack Core - compiles declarative app descriptors into Kubernetes objects
//!
//! This crate turns a handful of high-level inputs (name, version, image,
//! ports, volumes, replica count) into a mutually-consistent set of
//! Kubernetes resources:
//! - `AppIdentity`: canonical, length-bounded names and labels
//! - `ConfigVolume`: config-data volumes and their ConfigMap backing
//! - `WebContainer`: container descriptors with probes and mounts
//! - `compose`: Deployment composition
//! - `fan_out`: Service variants (plain, debug, TLS) from one port config
//! - `ResourceGraph`: the collected, immutable synthesis output
//!
//! Synthesis is a pure, synchronous, in-memory transform. Nothing here talks
//! to a cluster; the produced graph is handed to an external renderer.

pub mod app;
pub mod container;
pub mod deployment;
pub mod error;
pub mod graph;
pub mod identity;
pub mod service;
pub mod volume;

pub use app::{AppSpec, FileSource, SynthOptions, VolumeSpec, synth};
pub use container::WebContainer;
pub use deployment::{WorkloadResources, compose};
pub use error::{CoreError, Result};
pub use graph::{ManifestObject, ResourceGraph};
pub use identity::AppIdentity;
pub use service::{PortMapping, ServiceVariant, fan_out, variant_service};
pub use volume::ConfigVolume;
