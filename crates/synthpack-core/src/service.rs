//! Service fan-out
//!
//! Derives up to three NodePort services (plain, debug, TLS) from a single
//! port configuration. Each variant derives its own suffixed identity for
//! names and labels, but every variant selects pods by the *base* identity's
//! release name, so all variants route to the same pod set.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::identity::AppIdentity;

/// One service port mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    pub service_port: i32,
    /// Absent means pass-through (no explicit target)
    pub target_port: Option<i32>,
    pub node_port: Option<i32>,
}

impl PortMapping {
    fn definition(&self, name: &str) -> ServicePort {
        ServicePort {
            name: Some(name.to_string()),
            port: self.service_port,
            target_port: self.target_port.map(IntOrString::Int),
            node_port: self.node_port,
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }
    }
}

/// Service variant: selects the name suffix and the port-transform policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceVariant {
    Plain,
    Debug,
    Tls,
}

impl ServiceVariant {
    /// Name suffix appended to the base identity for this variant.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Debug => "-debug",
            Self::Tls => "-tls-service",
        }
    }

    /// Per-variant port policy. Debug endpoints must never be externally
    /// node-routable, so their node ports are dropped regardless of input.
    fn apply_policy(&self, mapping: PortMapping) -> PortMapping {
        match self {
            Self::Debug => PortMapping {
                node_port: None,
                ..mapping
            },
            Self::Plain | Self::Tls => mapping,
        }
    }
}

/// Build one service of the given variant.
///
/// The variant derives its own identity via the suffix (the base is left
/// untouched), so sibling variants never alias each other's names or labels.
/// The selector is always the base identity's release name.
pub fn variant_service(
    base: &AppIdentity,
    variant: ServiceVariant,
    mappings: &[PortMapping],
) -> Service {
    let identity = base.with_suffix(variant.suffix());
    let name = identity.name();

    let ports: Vec<ServicePort> = mappings
        .iter()
        .map(|m| variant.apply_policy(*m).definition(&name))
        .collect();

    Service {
        metadata: ObjectMeta {
            name: Some(name),
            labels: Some(identity.labels()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some("NodePort".to_string()),
            selector: Some(BTreeMap::from([(
                "release".to_string(),
                base.release(),
            )])),
            ports: Some(ports),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Fan a single port configuration out into service resources.
///
/// - `tls_port` nonzero: TLS service with pass-through target and
///   `node_port == tls_port`.
/// - `app_port` nonzero: plain service; `app_public_port` (possibly absent)
///   becomes the node port.
/// - `debug_ports` non-empty: debug service with one mapping per port and no
///   node ports.
///
/// All three absent yields an empty set, not an error.
pub fn fan_out(
    identity: &AppIdentity,
    app_port: i32,
    tls_port: i32,
    app_public_port: Option<i32>,
    debug_ports: &[i32],
) -> Vec<Service> {
    let mut services = Vec::new();

    if tls_port != 0 {
        let tls = PortMapping {
            service_port: tls_port,
            target_port: None,
            node_port: Some(tls_port),
        };
        services.push(variant_service(identity, ServiceVariant::Tls, &[tls]));
    }
    if app_port != 0 {
        let app = PortMapping {
            service_port: app_port,
            target_port: Some(app_port),
            node_port: app_public_port,
        };
        services.push(variant_service(identity, ServiceVariant::Plain, &[app]));
    }
    if !debug_ports.is_empty() {
        let debug: Vec<PortMapping> = debug_ports
            .iter()
            .map(|&port| PortMapping {
                service_port: port,
                target_port: Some(port),
                node_port: None,
            })
            .collect();
        services.push(variant_service(identity, ServiceVariant::Debug, &debug));
    }

    services
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> AppIdentity {
        AppIdentity::new("webshop", "0.1")
    }

    fn ports(service: &Service) -> Vec<ServicePort> {
        service.spec.clone().unwrap().ports.unwrap()
    }

    #[test]
    fn test_plain_service_mapping() {
        let services = fan_out(&identity(), 9090, 0, Some(30090), &[]);
        assert_eq!(services.len(), 1);

        let ports = ports(&services[0]);
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, 9090);
        assert_eq!(ports[0].target_port, Some(IntOrString::Int(9090)));
        assert_eq!(ports[0].node_port, Some(30090));
        assert_eq!(services[0].metadata.name.as_deref(), Some("webshop-local"));
    }

    #[test]
    fn test_tls_service_mapping() {
        let services = fan_out(&identity(), 0, 443, None, &[]);
        assert_eq!(services.len(), 1);
        assert_eq!(
            services[0].metadata.name.as_deref(),
            Some("webshop-local-tls-service")
        );

        let ports = ports(&services[0]);
        assert_eq!(ports[0].port, 443);
        assert!(ports[0].target_port.is_none());
        assert_eq!(ports[0].node_port, Some(443));
    }

    #[test]
    fn test_debug_service_drops_node_ports() {
        // Node ports are forced off even when the caller supplies them.
        let mappings = [
            PortMapping {
                service_port: 8001,
                target_port: Some(8001),
                node_port: Some(30001),
            },
            PortMapping {
                service_port: 8002,
                target_port: Some(8002),
                node_port: Some(30002),
            },
        ];
        let service = variant_service(&identity(), ServiceVariant::Debug, &mappings);

        let ports = ports(&service);
        assert_eq!(ports.len(), 2);
        assert!(ports.iter().all(|p| p.node_port.is_none()));
        assert_eq!(
            service.metadata.name.as_deref(),
            Some("webshop-local-debug")
        );
    }

    #[test]
    fn test_debug_fan_out() {
        let services = fan_out(&identity(), 0, 0, None, &[8001, 8002]);
        assert_eq!(services.len(), 1);

        let ports = ports(&services[0]);
        assert_eq!(ports.len(), 2);
        assert!(ports.iter().all(|p| p.node_port.is_none()));
        assert_eq!(ports[0].port, 8001);
        assert_eq!(ports[1].port, 8002);
    }

    #[test]
    fn test_all_variants_select_base_release() {
        let services = fan_out(&identity(), 9090, 443, Some(30090), &[8001]);
        assert_eq!(services.len(), 3);

        for service in &services {
            let selector = service.spec.clone().unwrap().selector.unwrap();
            assert_eq!(selector["release"], "webshop-local");
            // Labels still carry the base release, not the suffixed name.
            assert_eq!(service.metadata.labels.as_ref().unwrap()["release"], "webshop-local");
        }

        // Fan-out order: TLS, plain, debug. Names never alias.
        let names: Vec<_> = services
            .iter()
            .map(|s| s.metadata.name.clone().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "webshop-local-tls-service",
                "webshop-local",
                "webshop-local-debug",
            ]
        );
    }

    #[test]
    fn test_empty_fan_out() {
        let services = fan_out(&identity(), 0, 0, None, &[]);
        assert!(services.is_empty());
    }

    #[test]
    fn test_service_type_is_node_port() {
        let services = fan_out(&identity(), 9090, 0, None, &[]);
        assert_eq!(
            services[0].spec.clone().unwrap().type_.as_deref(),
            Some("NodePort")
        );
    }
}
