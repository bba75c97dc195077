// Copyright 2025 Cowboy AI, LLC.

//! Synthesized Topology Resources
//!
//! The entities that make up the synthesized resource graph. These are the
//! desired-state records a provisioning backend applies; they carry no
//! runtime behavior and never change after synthesis.

use crate::value_objects::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a security group, in-graph or pre-existing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupRef {
    /// A group declared in this topology, by logical ID
    Local(LogicalId),
    /// A pre-existing group, by provider ID
    External(SecurityGroupId),
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Local(id) => write!(f, "local:{}", id),
            GroupRef::External(id) => write!(f, "external:{}", id),
        }
    }
}

/// A single security rule attached to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRule {
    pub direction: RuleDirection,
    /// The peer group traffic is allowed from (ingress) or to (egress)
    pub peer: GroupRef,
    pub port_range: PortRange,
    pub description: String,
}

// ============================================================================
// Network Resources
// ============================================================================

/// Lookup of the pre-existing network everything attaches to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLookup {
    pub vpc_id: VpcId,
}

/// Import of a pre-existing security group so rules can reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupImport {
    pub group_id: SecurityGroupId,
}

/// A security group declared by this topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub group_name: String,
    pub description: String,
    pub allow_all_outbound: bool,
    pub vpc: LogicalId,
    pub rules: Vec<SecurityRule>,
}

/// A rule added to a group declared elsewhere (here: the imported target group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRuleExtension {
    pub group: GroupRef,
    pub rule: SecurityRule,
}

// ============================================================================
// Load Balancing Resources
// ============================================================================

/// The application load balancer fronting the proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub vpc: LogicalId,
    pub internet_facing: bool,
    pub security_group: LogicalId,
}

/// A single instance/port pair registered in a target group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceTarget {
    pub instance_id: InstanceId,
    pub port: Port,
}

/// The target group the balancer forwards to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub name: String,
    pub vpc: LogicalId,
    pub protocol: ApplicationProtocol,
    pub target_type: TargetType,
    pub targets: Vec<InstanceTarget>,
}

/// The balancer's listener and its default forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub load_balancer: LogicalId,
    pub port: Port,
    pub protocol: ApplicationProtocol,
    pub default_target_groups: Vec<LogicalId>,
}

// ============================================================================
// Identity Resources
// ============================================================================

/// The identity pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPool {
    pub name: String,
}

/// A scope published by a resource server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceScope {
    pub name: ScopeName,
    pub description: String,
}

/// The resource server binding scope strings to an audience
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServer {
    pub user_pool: LogicalId,
    pub identifier: ResourceServerIdentifier,
    pub name: String,
    pub scopes: Vec<ResourceScope>,
}

/// The machine-to-machine client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoolClient {
    pub user_pool: LogicalId,
    pub generate_secret: bool,
    pub flow: OAuthFlow,
    pub scopes: Vec<ScopeIdentifier>,
}

/// The hosted domain prefix bound to the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoolDomain {
    pub user_pool: LogicalId,
    pub domain_prefix: DomainPrefix,
}

/// The gateway-side authorizer checking credentials against the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorizer {
    pub user_pool: LogicalId,
    pub client: LogicalId,
}

// ============================================================================
// Gateway Resources
// ============================================================================

/// The HTTP gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpGateway {
    pub name: String,
    pub description: String,
    pub default_authorization_scopes: Vec<ScopeIdentifier>,
}

/// Integration binding a route to the balancer's listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbIntegration {
    pub listener: LogicalId,
    pub method: HttpMethod,
}

/// The single route exposed by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRoute {
    pub gateway: LogicalId,
    pub path: RoutePath,
    pub method: HttpMethod,
    pub integration: AlbIntegration,
    pub authorizer: LogicalId,
    pub authorization_scopes: Vec<ScopeIdentifier>,
}

// ============================================================================
// Resource Enumeration
// ============================================================================

/// Any resource the descriptor can emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Resource {
    NetworkLookup(NetworkLookup),
    SecurityGroupImport(SecurityGroupImport),
    SecurityGroup(SecurityGroup),
    SecurityRuleExtension(SecurityRuleExtension),
    LoadBalancer(LoadBalancer),
    TargetGroup(TargetGroup),
    Listener(Listener),
    UserPool(UserPool),
    ResourceServer(ResourceServer),
    UserPoolClient(UserPoolClient),
    UserPoolDomain(UserPoolDomain),
    Authorizer(Authorizer),
    HttpGateway(HttpGateway),
    GatewayRoute(GatewayRoute),
}

impl Resource {
    /// Get resource kind as string
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::NetworkLookup(_) => "NetworkLookup",
            Resource::SecurityGroupImport(_) => "SecurityGroupImport",
            Resource::SecurityGroup(_) => "SecurityGroup",
            Resource::SecurityRuleExtension(_) => "SecurityRuleExtension",
            Resource::LoadBalancer(_) => "LoadBalancer",
            Resource::TargetGroup(_) => "TargetGroup",
            Resource::Listener(_) => "Listener",
            Resource::UserPool(_) => "UserPool",
            Resource::ResourceServer(_) => "ResourceServer",
            Resource::UserPoolClient(_) => "UserPoolClient",
            Resource::UserPoolDomain(_) => "UserPoolDomain",
            Resource::Authorizer(_) => "Authorizer",
            Resource::HttpGateway(_) => "HttpGateway",
            Resource::GatewayRoute(_) => "GatewayRoute",
        }
    }

    /// Logical IDs this resource references
    ///
    /// Every ID returned here must resolve inside the graph; external
    /// provider IDs (`GroupRef::External`) are checked separately against
    /// the declared imports.
    pub fn references(&self) -> Vec<LogicalId> {
        fn rule_refs(rule: &SecurityRule) -> Vec<LogicalId> {
            match &rule.peer {
                GroupRef::Local(id) => vec![id.clone()],
                GroupRef::External(_) => vec![],
            }
        }

        match self {
            Resource::NetworkLookup(_)
            | Resource::SecurityGroupImport(_)
            | Resource::UserPool(_)
            | Resource::HttpGateway(_) => vec![],

            Resource::SecurityGroup(sg) => {
                let mut refs = vec![sg.vpc.clone()];
                for rule in &sg.rules {
                    refs.extend(rule_refs(rule));
                }
                refs
            }

            Resource::SecurityRuleExtension(ext) => {
                let mut refs = match &ext.group {
                    GroupRef::Local(id) => vec![id.clone()],
                    GroupRef::External(_) => vec![],
                };
                refs.extend(rule_refs(&ext.rule));
                refs
            }

            Resource::LoadBalancer(lb) => vec![lb.vpc.clone(), lb.security_group.clone()],

            Resource::TargetGroup(tg) => vec![tg.vpc.clone()],

            Resource::Listener(listener) => {
                let mut refs = vec![listener.load_balancer.clone()];
                refs.extend(listener.default_target_groups.iter().cloned());
                refs
            }

            Resource::ResourceServer(server) => vec![server.user_pool.clone()],
            Resource::UserPoolClient(client) => vec![client.user_pool.clone()],
            Resource::UserPoolDomain(domain) => vec![domain.user_pool.clone()],

            Resource::Authorizer(authorizer) => {
                vec![authorizer.user_pool.clone(), authorizer.client.clone()]
            }

            Resource::GatewayRoute(route) => vec![
                route.gateway.clone(),
                route.integration.listener.clone(),
                route.authorizer.clone(),
            ],
        }
    }

    /// Provider IDs of pre-existing groups this resource's rules point at
    pub fn external_group_refs(&self) -> Vec<SecurityGroupId> {
        fn rule_external(rule: &SecurityRule) -> Option<SecurityGroupId> {
            match &rule.peer {
                GroupRef::External(id) => Some(id.clone()),
                GroupRef::Local(_) => None,
            }
        }

        match self {
            Resource::SecurityGroup(sg) => sg.rules.iter().filter_map(rule_external).collect(),
            Resource::SecurityRuleExtension(ext) => {
                let mut refs: Vec<SecurityGroupId> = match &ext.group {
                    GroupRef::External(id) => vec![id.clone()],
                    GroupRef::Local(_) => vec![],
                };
                refs.extend(rule_external(&ext.rule));
                refs
            }
            _ => vec![],
        }
    }
}
