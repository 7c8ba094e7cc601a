//! Deployment composition
//!
//! Assembles the workload resource: metadata, replica count, pod template,
//! realized volumes and containers. The pod template labels and the selector
//! are derived from the same identity, so the Deployment's selector always
//! matches the pods it creates.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Affinity, ConfigMap, Container, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

use crate::identity::AppIdentity;
use crate::volume::ConfigVolume;

/// Resources produced by one deployment composition: the workload itself and
/// the ConfigMaps backing its volumes, realized exactly once each.
#[derive(Debug, Clone)]
pub struct WorkloadResources {
    pub deployment: Deployment,
    pub config_maps: Vec<ConfigMap>,
}

/// Compose a Deployment from the given identity, containers and volumes.
///
/// Volumes are realized here, in input order; order only affects the
/// determinism of the generated output, not its semantics. `annotations` and
/// `affinity` are extension points and default to absent. Zero volumes yield
/// a pod spec without a volume list, not an error.
pub fn compose(
    identity: &AppIdentity,
    replicas: i32,
    containers: Vec<Container>,
    volumes: &[ConfigVolume],
    annotations: Option<BTreeMap<String, String>>,
    affinity: Option<Affinity>,
) -> WorkloadResources {
    let labels = identity.labels();
    let config_maps = volumes.iter().map(ConfigVolume::config_map).collect();

    let pod_volumes = if volumes.is_empty() {
        None
    } else {
        Some(volumes.iter().map(ConfigVolume::pod_volume).collect())
    };

    let deployment = Deployment {
        metadata: ObjectMeta {
            name: Some(identity.name()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    annotations,
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers,
                    volumes: pod_volumes,
                    affinity,
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    };

    WorkloadResources {
        deployment,
        config_maps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::WebContainer;

    fn identity() -> AppIdentity {
        AppIdentity::new("webshop", "0.1")
    }

    fn containers() -> Vec<Container> {
        vec![WebContainer::new("webshop-local", "img:1.0", 9090).build()]
    }

    #[test]
    fn test_selector_matches_template_labels() {
        let workload = compose(&identity(), 2, containers(), &[], None, None);
        let spec = workload.deployment.spec.unwrap();

        let selector = spec.selector.match_labels.unwrap();
        let template_labels = spec.template.metadata.unwrap().labels.unwrap();
        assert_eq!(selector, template_labels);
        assert_eq!(selector, identity().labels());
        assert_eq!(spec.replicas, Some(2));
    }

    #[test]
    fn test_metadata_from_identity() {
        let workload = compose(&identity(), 1, containers(), &[], None, None);
        assert_eq!(
            workload.deployment.metadata.name.as_deref(),
            Some("webshop-local")
        );
        assert_eq!(
            workload.deployment.metadata.labels,
            Some(identity().labels())
        );
    }

    #[test]
    fn test_zero_volumes() {
        let workload = compose(&identity(), 1, containers(), &[], None, None);
        let pod_spec = workload.deployment.spec.unwrap().template.spec.unwrap();
        assert!(pod_spec.volumes.is_none());
        assert!(workload.config_maps.is_empty());
    }

    #[test]
    fn test_volumes_realized_once_in_order() {
        let volumes = vec![
            ConfigVolume::new("first", BTreeMap::new()),
            ConfigVolume::new("second", BTreeMap::new()),
        ];
        let workload = compose(&identity(), 1, containers(), &volumes, None, None);

        let names: Vec<_> = workload
            .config_maps
            .iter()
            .map(|cm| cm.metadata.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["first-config", "second-config"]);

        let pod_volumes = workload
            .deployment
            .spec
            .unwrap()
            .template
            .spec
            .unwrap()
            .volumes
            .unwrap();
        assert_eq!(pod_volumes.len(), 2);
        assert_eq!(pod_volumes[0].name, "first");
        assert_eq!(pod_volumes[1].name, "second");
    }

    #[test]
    fn test_extension_points_default_absent() {
        let workload = compose(&identity(), 1, containers(), &[], None, None);
        let spec = workload.deployment.spec.unwrap();
        assert!(spec.template.metadata.unwrap().annotations.is_none());
        assert!(spec.template.spec.unwrap().affinity.is_none());
    }

    #[test]
    fn test_annotations_pass_through() {
        let annotations = BTreeMap::from([("checksum/config".to_string(), "abc".to_string())]);
        let workload = compose(&identity(), 1, containers(), &[], Some(annotations.clone()), None);
        let template_meta = workload.deployment.spec.unwrap().template.metadata.unwrap();
        assert_eq!(template_meta.annotations, Some(annotations));
    }
}
