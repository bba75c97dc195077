// Copyright 2025 Cowboy AI, LLC.

//! Topology Descriptor
//!
//! The single entry point of the crate: takes a validated configuration and
//! synthesizes the desired-state resource graph in dependency order.
//! Synthesis is a single pass with no clock and no random identity, so the
//! same configuration always produces the same graph.

use crate::config::TopologyConfig;
use crate::error::{Result, TopologyError};
use crate::graph::ResourceGraph;
use crate::resources::*;
use crate::value_objects::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Logical IDs of the nodes the descriptor emits
pub mod ids {
    pub const VPC: &str = "vpc";
    pub const TARGET_SG: &str = "target-sg";
    pub const ALB_SG: &str = "alb-sg";
    pub const ALB_SG_SELF_INGRESS: &str = "alb-sg-self-ingress";
    pub const TARGET_SG_INGRESS: &str = "target-sg-ingress";
    pub const ALB: &str = "alb";
    pub const TARGET_GROUP: &str = "target-group";
    pub const LISTENER: &str = "listener";
    pub const USER_POOL: &str = "user-pool";
    pub const RESOURCE_SERVER: &str = "resource-server";
    pub const USER_POOL_CLIENT: &str = "user-pool-client";
    pub const USER_POOL_DOMAIN: &str = "user-pool-domain";
    pub const AUTHORIZER: &str = "authorizer";
    pub const HTTP_API: &str = "http-api";
    pub const ROUTE: &str = "post-topic-route";
}

/// Synthesizes the edge topology graph from its configuration
#[derive(Debug, Clone)]
pub struct TopologyDescriptor {
    config: TopologyConfig,
}

impl TopologyDescriptor {
    /// Create a descriptor, rejecting invalid configuration up front
    pub fn new(config: TopologyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Descriptor for the reference deployment
    pub fn reference_deployment() -> Result<Self> {
        Self::new(TopologyConfig::reference_deployment()?)
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    /// Build the resource graph, verify it, and hand it over.
    ///
    /// Emission order is apply order; every invariant the declarative model
    /// can check locally is checked before the graph is returned.
    pub fn synthesize(&self) -> Result<ResourceGraph> {
        let mut graph = ResourceGraph::new();
        let config = &self.config;

        // Network lookup and the pre-existing proxy security group.
        let vpc = emit(
            &mut graph,
            ids::VPC,
            Resource::NetworkLookup(NetworkLookup {
                vpc_id: config.inputs.vpc_id.clone(),
            }),
            &[],
        )?;
        let target_sg = emit(
            &mut graph,
            ids::TARGET_SG,
            Resource::SecurityGroupImport(SecurityGroupImport {
                group_id: config.inputs.target_security_group_id.clone(),
            }),
            &[],
        )?;

        // Balancer security group. The scoped egress rule names the external
        // group directly; the self ingress cannot live inline on the group
        // it references, so it is a separate rule resource.
        let alb_sg = emit(
            &mut graph,
            ids::ALB_SG,
            Resource::SecurityGroup(SecurityGroup {
                group_name: config.load_balancer.security_group.name.clone(),
                description: config.load_balancer.security_group.description.clone(),
                allow_all_outbound: config.load_balancer.security_group.allow_all_outbound,
                vpc: vpc.clone(),
                rules: vec![SecurityRule {
                    direction: RuleDirection::Egress,
                    peer: GroupRef::External(config.inputs.target_security_group_id.clone()),
                    port_range: PortRange::Tcp(config.inputs.target_port),
                    description: "Allow traffic to Kafka proxy".into(),
                }],
            }),
            &[],
        )?;
        emit(
            &mut graph,
            ids::ALB_SG_SELF_INGRESS,
            Resource::SecurityRuleExtension(SecurityRuleExtension {
                group: GroupRef::Local(alb_sg.clone()),
                rule: SecurityRule {
                    direction: RuleDirection::Ingress,
                    peer: GroupRef::Local(alb_sg.clone()),
                    port_range: PortRange::AllTcp,
                    description: "Allow traffic from self".into(),
                },
            }),
            &[],
        )?;
        emit(
            &mut graph,
            ids::TARGET_SG_INGRESS,
            Resource::SecurityRuleExtension(SecurityRuleExtension {
                group: GroupRef::Local(target_sg.clone()),
                rule: SecurityRule {
                    direction: RuleDirection::Ingress,
                    peer: GroupRef::Local(alb_sg.clone()),
                    port_range: PortRange::Tcp(config.inputs.target_port),
                    description: "Allow traffic from Kafka ALB".into(),
                },
            }),
            &[],
        )?;

        // Balancer, target group, listener.
        let alb = emit(
            &mut graph,
            ids::ALB,
            Resource::LoadBalancer(LoadBalancer {
                vpc: vpc.clone(),
                internet_facing: config.load_balancer.internet_facing,
                security_group: alb_sg.clone(),
            }),
            &[],
        )?;
        let target_group = emit(
            &mut graph,
            ids::TARGET_GROUP,
            Resource::TargetGroup(TargetGroup {
                name: config.target_group.name.clone(),
                vpc: vpc.clone(),
                protocol: config.target_group.protocol,
                target_type: config.target_group.target_type,
                targets: vec![InstanceTarget {
                    instance_id: config.inputs.instance_id.clone(),
                    port: config.inputs.target_port,
                }],
            }),
            &[],
        )?;
        let listener = emit(
            &mut graph,
            ids::LISTENER,
            Resource::Listener(Listener {
                load_balancer: alb.clone(),
                port: config.load_balancer.listener_port,
                protocol: config.target_group.protocol,
                default_target_groups: vec![target_group.clone()],
            }),
            &[],
        )?;

        // Identity pool, resource server, client, domain, authorizer. The
        // client orders after the resource server so its scopes exist when
        // the client is created.
        let user_pool = emit(
            &mut graph,
            ids::USER_POOL,
            Resource::UserPool(UserPool {
                name: config.identity.pool_name.clone(),
            }),
            &[],
        )?;
        let resource_server = emit(
            &mut graph,
            ids::RESOURCE_SERVER,
            Resource::ResourceServer(ResourceServer {
                user_pool: user_pool.clone(),
                identifier: config.identity.resource_server.identifier.clone(),
                name: config.identity.resource_server.name.clone(),
                scopes: config
                    .identity
                    .resource_server
                    .scopes
                    .iter()
                    .map(|scope| ResourceScope {
                        name: scope.name.clone(),
                        description: scope.description.clone(),
                    })
                    .collect(),
            }),
            &[],
        )?;
        let client = emit(
            &mut graph,
            ids::USER_POOL_CLIENT,
            Resource::UserPoolClient(UserPoolClient {
                user_pool: user_pool.clone(),
                generate_secret: config.identity.client.generate_secret,
                flow: config.identity.client.flow,
                scopes: config.identity.client.scopes.clone(),
            }),
            &[resource_server.clone()],
        )?;
        emit(
            &mut graph,
            ids::USER_POOL_DOMAIN,
            Resource::UserPoolDomain(UserPoolDomain {
                user_pool: user_pool.clone(),
                domain_prefix: config.identity.domain_prefix.clone(),
            }),
            &[],
        )?;
        let authorizer = emit(
            &mut graph,
            ids::AUTHORIZER,
            Resource::Authorizer(Authorizer {
                user_pool: user_pool.clone(),
                client: client.clone(),
            }),
            &[],
        )?;

        // Gateway and its single route.
        let http_api = emit(
            &mut graph,
            ids::HTTP_API,
            Resource::HttpGateway(HttpGateway {
                name: config.gateway.name.clone(),
                description: config.gateway.description.clone(),
                default_authorization_scopes: config.gateway.route.authorization_scopes.clone(),
            }),
            &[],
        )?;
        emit(
            &mut graph,
            ids::ROUTE,
            Resource::GatewayRoute(GatewayRoute {
                gateway: http_api,
                path: config.gateway.route.path.clone(),
                method: config.gateway.route.method,
                integration: AlbIntegration {
                    listener,
                    method: config.gateway.route.method,
                },
                authorizer,
                authorization_scopes: config.gateway.route.authorization_scopes.clone(),
            }),
            &[],
        )?;

        graph.verify()?;
        self.check_invariants(&graph)?;

        info!(
            "Synthesized edge topology graph with {} resources",
            graph.len()
        );
        Ok(graph)
    }

    /// Cross-entity invariants of the synthesized graph.
    ///
    /// These restate what the configuration already guaranteed, but against
    /// the artifact a backend would actually consume.
    fn check_invariants(&self, graph: &ResourceGraph) -> Result<()> {
        let balancers = graph.load_balancers();
        if balancers.len() != 1 {
            return Err(TopologyError::Validation(format!(
                "Topology must contain exactly one load balancer, found {}",
                balancers.len()
            )));
        }
        let (lb_id, lb) = balancers[0];
        if lb.internet_facing {
            return Err(TopologyError::Validation(format!(
                "Load balancer {} must not be internet-facing",
                lb_id
            )));
        }

        for (tg_id, tg) in graph.target_groups() {
            if tg.targets.len() != 1 {
                return Err(TopologyError::Validation(format!(
                    "Target group {} must contain exactly one target, found {}",
                    tg_id,
                    tg.targets.len()
                )));
            }
            let target = &tg.targets[0];
            if target.instance_id != self.config.inputs.instance_id
                || target.port != self.config.inputs.target_port
            {
                return Err(TopologyError::Validation(format!(
                    "Target group {} does not match the configured instance/port pair",
                    tg_id
                )));
            }
        }

        // Scope strings a client may request: every scope derived from a
        // resource server attached to the same pool, byte-for-byte.
        for (client_id, client) in graph.user_pool_clients() {
            let declared: HashSet<ScopeIdentifier> = graph
                .resource_servers()
                .into_iter()
                .filter(|(_, server)| server.user_pool == client.user_pool)
                .flat_map(|(_, server)| {
                    server
                        .scopes
                        .iter()
                        .map(|scope| ScopeIdentifier::derived(&server.identifier, &scope.name))
                })
                .collect();

            for scope in &client.scopes {
                if !declared.contains(scope) {
                    return Err(TopologyError::ScopeMismatch {
                        owner: client_id.to_string(),
                        detail: format!("granted scope {} is not declared by any resource server", scope),
                    });
                }
            }
        }

        // Routes: a non-empty required scope set, covered by the granted
        // scopes of the client behind the route's authorizer.
        for (route_id, route) in graph.gateway_routes() {
            if route.authorization_scopes.is_empty() {
                return Err(TopologyError::Validation(format!(
                    "Route {} must require at least one scope",
                    route_id
                )));
            }

            let authorizer = graph
                .get(&route.authorizer)
                .and_then(|node| match &node.resource {
                    Resource::Authorizer(authorizer) => Some(authorizer),
                    _ => None,
                })
                .ok_or_else(|| TopologyError::UnresolvedReference {
                    from: route_id.to_string(),
                    to: route.authorizer.to_string(),
                })?;

            let granted: HashSet<&ScopeIdentifier> = graph
                .user_pool_clients()
                .into_iter()
                .filter(|(client_id, _)| **client_id == authorizer.client)
                .flat_map(|(_, client)| client.scopes.iter())
                .collect();

            for required in &route.authorization_scopes {
                if !granted.contains(required) {
                    return Err(TopologyError::ScopeMismatch {
                        owner: route_id.to_string(),
                        detail: format!(
                            "required scope {} is not granted to client {}",
                            required, authorizer.client
                        ),
                    });
                }
            }
        }

        debug!("Topology invariants hold for {} resources", graph.len());
        Ok(())
    }
}

fn emit(
    graph: &mut ResourceGraph,
    logical_id: &str,
    resource: Resource,
    extra_deps: &[LogicalId],
) -> Result<LogicalId> {
    let id = LogicalId::new(logical_id)?;
    debug!("Emitting {} ({})", id, resource.kind());
    graph.insert(id.clone(), resource, extra_deps)?;
    Ok(id)
}
