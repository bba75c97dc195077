// Copyright 2025 Cowboy AI, LLC.

//! Topology Configuration Records
//!
//! Explicit configuration structs with named fields for every entity in the
//! topology. Records are validated locally before synthesis; anything the
//! declarative model cannot check here (naming collisions, quotas,
//! permissions) is surfaced by the provisioning backend at apply time.

use crate::error::{Result, TopologyError};
use crate::value_objects::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Operator Inputs
// ============================================================================

/// The four identifiers the operator supplies
///
/// Everything else in the topology is fixed naming built around these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyInputs {
    /// Pre-existing network to attach to
    pub vpc_id: VpcId,
    /// Pre-existing compute resource running the proxy
    pub instance_id: InstanceId,
    /// Port the proxy listens on
    pub target_port: Port,
    /// Pre-existing security group of the proxy instance
    pub target_security_group_id: SecurityGroupId,
}

impl TopologyInputs {
    /// Inputs of the reference deployment
    pub fn reference() -> Result<Self> {
        Ok(Self {
            vpc_id: VpcId::new("vpc-0ce8ea63163195679")?,
            instance_id: InstanceId::new("i-04541f167f6131df2")?,
            target_port: Port::new(8082)?,
            target_security_group_id: SecurityGroupId::new("sg-08f04b435a3fc5375")?,
        })
    }
}

// ============================================================================
// Load Balancer Configuration
// ============================================================================

/// Configuration for the security group created for the load balancer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupConfig {
    pub name: String,
    pub description: String,
    /// Mirror of the source configuration; the scoped egress rule to the
    /// target group is emitted regardless.
    pub allow_all_outbound: bool,
}

impl SecurityGroupConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TopologyError::Validation(
                "Security group name cannot be empty".into(),
            ));
        }
        if self.description.is_empty() {
            return Err(TopologyError::Validation(
                "Security group description cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the application load balancer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerConfig {
    pub security_group: SecurityGroupConfig,
    /// Must be false: the balancer fronts a private API
    pub internet_facing: bool,
    pub listener_port: Port,
}

impl LoadBalancerConfig {
    pub fn validate(&self) -> Result<()> {
        self.security_group.validate()?;
        if self.internet_facing {
            return Err(TopologyError::Validation(
                "Load balancer must not be internet-facing".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the target group the balancer forwards to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroupConfig {
    pub name: String,
    pub protocol: ApplicationProtocol,
    pub target_type: TargetType,
}

impl TargetGroupConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TopologyError::Validation(
                "Target group name cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Identity Configuration
// ============================================================================

/// A custom scope declared on the resource server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub name: ScopeName,
    pub description: String,
}

/// Configuration for the resource server exposing the API's scopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServerConfig {
    pub identifier: ResourceServerIdentifier,
    pub name: String,
    pub scopes: Vec<ScopeConfig>,
}

impl ResourceServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TopologyError::Validation(
                "Resource server name cannot be empty".into(),
            ));
        }
        if self.scopes.is_empty() {
            return Err(TopologyError::Validation(
                "Resource server must declare at least one scope".into(),
            ));
        }
        let mut seen = HashSet::new();
        for scope in &self.scopes {
            if !seen.insert(scope.name.as_str()) {
                return Err(TopologyError::Validation(format!(
                    "Duplicate scope name: {}",
                    scope.name
                )));
            }
        }
        Ok(())
    }

    /// Full scope identifiers the identity provider publishes for this server
    pub fn full_scope_identifiers(&self) -> Vec<ScopeIdentifier> {
        self.scopes
            .iter()
            .map(|scope| ScopeIdentifier::derived(&self.identifier, &scope.name))
            .collect()
    }
}

/// Configuration for the machine-to-machine identity client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub generate_secret: bool,
    pub flow: OAuthFlow,
    /// Scope strings requested by the client, verbatim
    pub scopes: Vec<ScopeIdentifier>,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scopes.is_empty() {
            return Err(TopologyError::Validation(
                "Client must request at least one scope".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the identity pool and everything bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub pool_name: String,
    pub resource_server: ResourceServerConfig,
    pub client: ClientConfig,
    pub domain_prefix: DomainPrefix,
}

impl IdentityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.pool_name.is_empty() {
            return Err(TopologyError::Validation(
                "Identity pool name cannot be empty".into(),
            ));
        }
        self.resource_server.validate()?;
        self.client.validate()?;

        // Every scope the client requests must match a scope the resource
        // server declares, byte-for-byte. No slash normalization.
        let declared: HashSet<ScopeIdentifier> = self
            .resource_server
            .full_scope_identifiers()
            .into_iter()
            .collect();
        for requested in &self.client.scopes {
            if !declared.contains(requested) {
                return Err(TopologyError::ScopeMismatch {
                    owner: "client".into(),
                    detail: format!(
                        "requested scope {} is not declared by resource server {}",
                        requested, self.resource_server.identifier
                    ),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Gateway Configuration
// ============================================================================

/// Configuration for the single gateway route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: RoutePath,
    pub method: HttpMethod,
    /// Scopes a credential must carry to pass the route's authorizer
    pub authorization_scopes: Vec<ScopeIdentifier>,
}

impl RouteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.authorization_scopes.is_empty() {
            return Err(TopologyError::Validation(
                "Route must require at least one authorization scope".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the HTTP gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub name: String,
    pub description: String,
    pub route: RouteConfig,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TopologyError::Validation(
                "Gateway name cannot be empty".into(),
            ));
        }
        self.route.validate()
    }
}

// ============================================================================
// Topology Configuration
// ============================================================================

/// Complete desired-state configuration of the edge topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub inputs: TopologyInputs,
    pub load_balancer: LoadBalancerConfig,
    pub target_group: TargetGroupConfig,
    pub identity: IdentityConfig,
    pub gateway: GatewayConfig,
}

impl TopologyConfig {
    /// The reference deployment's fixed naming, built around the given inputs
    pub fn for_inputs(inputs: TopologyInputs) -> Result<Self> {
        let scope = ScopeIdentifier::new("https://resource-server//post-kafka")?;

        Ok(Self {
            inputs,
            load_balancer: LoadBalancerConfig {
                security_group: SecurityGroupConfig {
                    name: "Kafka ALB SG".into(),
                    description: "Security group for Kafka ALB".into(),
                    allow_all_outbound: true,
                },
                internet_facing: false,
                listener_port: Port::new(80)?,
            },
            target_group: TargetGroupConfig {
                name: "tgForKafkaProxy".into(),
                protocol: ApplicationProtocol::Http,
                target_type: TargetType::Instance,
            },
            identity: IdentityConfig {
                pool_name: "kafka-api-userpool".into(),
                resource_server: ResourceServerConfig {
                    identifier: ResourceServerIdentifier::new("https://resource-server/")?,
                    name: "dev-userpool-resource-server".into(),
                    scopes: vec![ScopeConfig {
                        name: ScopeName::new("post-kafka")?,
                        description: "Post message to kafka".into(),
                    }],
                },
                client: ClientConfig {
                    generate_secret: true,
                    flow: OAuthFlow::ClientCredentials,
                    scopes: vec![scope.clone()],
                },
                domain_prefix: DomainPrefix::new("kafkarestapiproxy")?,
            },
            gateway: GatewayConfig {
                name: "kafkaRestProxy".into(),
                description: "API for Kafka REST Proxy".into(),
                route: RouteConfig {
                    path: RoutePath::new("/topics/TestTopic")?,
                    method: HttpMethod::Post,
                    authorization_scopes: vec![scope],
                },
            },
        })
    }

    /// The reference deployment exactly as shipped
    pub fn reference_deployment() -> Result<Self> {
        Self::for_inputs(TopologyInputs::reference()?)
    }

    /// Validate every record and all cross-record consistency that can be
    /// checked without the synthesized graph.
    pub fn validate(&self) -> Result<()> {
        self.load_balancer.validate()?;
        self.target_group.validate()?;
        self.identity.validate()?;
        self.gateway.validate()?;

        // The route's required scopes must be a subset of what the client is
        // granted, otherwise no credential could ever pass the authorizer.
        let granted: HashSet<&ScopeIdentifier> = self.identity.client.scopes.iter().collect();
        for required in &self.gateway.route.authorization_scopes {
            if !granted.contains(required) {
                return Err(TopologyError::ScopeMismatch {
                    owner: "route".into(),
                    detail: format!("required scope {} is not granted to the client", required),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_reference_deployment_validates() {
        let config = TopologyConfig::reference_deployment().unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_inputs() {
        let inputs = TopologyInputs::reference().unwrap();
        assert_eq!(inputs.instance_id.as_str(), "i-04541f167f6131df2");
        assert_eq!(inputs.target_port.value(), 8082);
    }

    #[test]
    fn test_client_scope_matches_derived_identifier() {
        let config = TopologyConfig::reference_deployment().unwrap();
        let derived = config.identity.resource_server.full_scope_identifiers();

        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].as_str(), "https://resource-server//post-kafka");
        assert_eq!(config.identity.client.scopes, derived);
    }

    #[test]
    fn test_internet_facing_rejected() {
        let mut config = TopologyConfig::reference_deployment().unwrap();
        config.load_balancer.internet_facing = true;

        assert!(matches!(
            config.validate(),
            Err(TopologyError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_client_scope_rejected() {
        let mut config = TopologyConfig::reference_deployment().unwrap();
        config.identity.client.scopes =
            vec![ScopeIdentifier::new("https://resource-server/post-kafka").unwrap()];

        // Single slash where the derived identifier has two: not a match.
        assert!(matches!(
            config.validate(),
            Err(TopologyError::ScopeMismatch { .. })
        ));
    }

    #[test]
    fn test_route_scope_must_be_granted() {
        let mut config = TopologyConfig::reference_deployment().unwrap();
        config.gateway.route.authorization_scopes =
            vec![ScopeIdentifier::new("https://resource-server//read-kafka").unwrap()];

        assert!(matches!(
            config.validate(),
            Err(TopologyError::ScopeMismatch { .. })
        ));
    }

    #[test_case("" ; "empty pool name")]
    fn test_empty_pool_name_rejected(name: &str) {
        let mut config = TopologyConfig::reference_deployment().unwrap();
        config.identity.pool_name = name.into();
        assert!(config.validate().is_err());
    }

    #[test_case(|c: &mut TopologyConfig| c.load_balancer.security_group.name.clear() ; "sg name")]
    #[test_case(|c: &mut TopologyConfig| c.target_group.name.clear() ; "target group name")]
    #[test_case(|c: &mut TopologyConfig| c.gateway.name.clear() ; "gateway name")]
    #[test_case(|c: &mut TopologyConfig| c.identity.resource_server.scopes.clear() ; "server scopes")]
    #[test_case(|c: &mut TopologyConfig| c.identity.client.scopes.clear() ; "client scopes")]
    #[test_case(|c: &mut TopologyConfig| c.gateway.route.authorization_scopes.clear() ; "route scopes")]
    fn test_emptied_field_rejected(mutate: fn(&mut TopologyConfig)) {
        let mut config = TopologyConfig::reference_deployment().unwrap();
        mutate(&mut config);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_scope_name_rejected() {
        let mut config = TopologyConfig::reference_deployment().unwrap();
        let duplicate = config.identity.resource_server.scopes[0].clone();
        config.identity.resource_server.scopes.push(duplicate);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = TopologyConfig::reference_deployment().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: TopologyConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, back);
    }
}
