// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for the synthesized edge topology
//!
//! These verify the structural contract of the produced graph end to end:
//! the private balancer, the single-target group, the security rule pair,
//! and the scope chain from resource server through client to route.

use kafka_proxy_topology::{
    ids, GroupRef, LogicalId, PortRange, Resource, ResourceGraph, RuleDirection,
    TopologyDescriptor,
};
use pretty_assertions::assert_eq;

fn synthesized() -> ResourceGraph {
    TopologyDescriptor::reference_deployment()
        .unwrap()
        .synthesize()
        .unwrap()
}

fn logical(id: &str) -> LogicalId {
    LogicalId::new(id).unwrap()
}

#[test]
fn test_exactly_one_load_balancer_and_it_is_private() {
    let graph = synthesized();

    let balancers = graph.load_balancers();
    assert_eq!(balancers.len(), 1);

    let (_, lb) = balancers[0];
    assert!(!lb.internet_facing);
    assert_eq!(lb.security_group, logical(ids::ALB_SG));
}

#[test]
fn test_target_group_contains_exactly_the_configured_target() {
    let graph = synthesized();

    let groups = graph.target_groups();
    assert_eq!(groups.len(), 1);

    let (_, tg) = groups[0];
    assert_eq!(tg.name, "tgForKafkaProxy");
    assert_eq!(tg.targets.len(), 1);
    assert_eq!(tg.targets[0].instance_id.as_str(), "i-04541f167f6131df2");
    assert_eq!(tg.targets[0].port.value(), 8082);
}

#[test]
fn test_listener_forwards_to_the_target_group() {
    let graph = synthesized();

    let listeners = graph.listeners();
    assert_eq!(listeners.len(), 1);

    let (_, listener) = listeners[0];
    assert_eq!(listener.port.value(), 80);
    assert_eq!(listener.load_balancer, logical(ids::ALB));
    assert_eq!(listener.default_target_groups, vec![logical(ids::TARGET_GROUP)]);
}

#[test]
fn test_balancer_group_permits_self_and_scoped_egress_only() {
    let graph = synthesized();

    let (alb_sg_id, alb_sg) = graph.security_groups()[0];
    assert_eq!(alb_sg.group_name, "Kafka ALB SG");

    // The group itself carries exactly the scoped egress rule.
    assert_eq!(alb_sg.rules.len(), 1);
    let egress = &alb_sg.rules[0];
    assert_eq!(egress.direction, RuleDirection::Egress);
    assert_eq!(
        egress.peer,
        GroupRef::External("sg-08f04b435a3fc5375".parse().unwrap())
    );
    assert!(matches!(egress.port_range, PortRange::Tcp(port) if port.value() == 8082));

    // Self-to-self all-TCP ingress lives as a rule extension on the group.
    let extensions = graph.security_rule_extensions();
    let self_ingress = extensions
        .iter()
        .find(|(id, _)| **id == logical(ids::ALB_SG_SELF_INGRESS))
        .map(|(_, ext)| ext)
        .unwrap();
    assert_eq!(self_ingress.group, GroupRef::Local(alb_sg_id.clone()));
    assert_eq!(self_ingress.rule.direction, RuleDirection::Ingress);
    assert_eq!(self_ingress.rule.peer, GroupRef::Local(alb_sg_id.clone()));
    assert_eq!(self_ingress.rule.port_range, PortRange::AllTcp);
}

#[test]
fn test_imported_group_gains_ingress_from_balancer_group() {
    let graph = synthesized();

    let extensions = graph.security_rule_extensions();
    let (_, target_ingress) = extensions
        .iter()
        .find(|(id, _)| **id == logical(ids::TARGET_SG_INGRESS))
        .unwrap();

    assert_eq!(target_ingress.group, GroupRef::Local(logical(ids::TARGET_SG)));
    assert_eq!(target_ingress.rule.direction, RuleDirection::Ingress);
    assert_eq!(target_ingress.rule.peer, GroupRef::Local(logical(ids::ALB_SG)));
    assert!(matches!(
        target_ingress.rule.port_range,
        PortRange::Tcp(port) if port.value() == 8082
    ));
}

#[test]
fn test_client_grants_exactly_the_resource_server_scope() {
    let graph = synthesized();

    let (_, server) = graph.resource_servers()[0];
    let (_, client) = graph.user_pool_clients()[0];

    assert_eq!(server.scopes.len(), 1);
    assert_eq!(server.scopes[0].name.as_str(), "post-kafka");

    // Byte-for-byte, double slash included.
    assert_eq!(client.scopes.len(), 1);
    assert_eq!(client.scopes[0].as_str(), "https://resource-server//post-kafka");
    assert!(client.generate_secret);
}

#[test]
fn test_route_scopes_are_nonempty_and_granted_to_client() {
    let graph = synthesized();

    let (_, route) = graph.gateway_routes()[0];
    let (_, client) = graph.user_pool_clients()[0];

    assert!(!route.authorization_scopes.is_empty());
    for scope in &route.authorization_scopes {
        assert!(client.scopes.contains(scope));
    }
}

#[test]
fn test_route_binds_listener_and_authorizer() {
    let graph = synthesized();

    let (_, route) = graph.gateway_routes()[0];
    assert_eq!(route.path.as_str(), "/topics/TestTopic");
    assert_eq!(route.method.to_string(), "POST");
    assert_eq!(route.integration.listener, logical(ids::LISTENER));
    assert_eq!(route.authorizer, logical(ids::AUTHORIZER));
    assert_eq!(route.gateway, logical(ids::HTTP_API));
}

#[test]
fn test_authorizer_binds_pool_and_client() {
    let graph = synthesized();

    let pools = graph.user_pools();
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].1.name, "kafka-api-userpool");

    let (_, authorizer) = graph.authorizers()[0];
    assert_eq!(authorizer.user_pool, logical(ids::USER_POOL));
    assert_eq!(authorizer.client, logical(ids::USER_POOL_CLIENT));
}

#[test]
fn test_domain_prefix_bound_to_pool() {
    let graph = synthesized();

    let domains = graph.user_pool_domains();
    assert_eq!(domains.len(), 1);

    let (_, domain) = domains[0];
    assert_eq!(domain.domain_prefix.as_str(), "kafkarestapiproxy");
    assert_eq!(domain.user_pool, logical(ids::USER_POOL));
}

#[test]
fn test_every_dependency_precedes_its_dependent() {
    let graph = synthesized();

    let positions: Vec<&LogicalId> = graph.iter().map(|node| &node.logical_id).collect();
    for (idx, node) in graph.iter().enumerate() {
        for dep in &node.depends_on {
            let dep_idx = positions.iter().position(|id| *id == dep).unwrap();
            assert!(
                dep_idx < idx,
                "{} depends on {} but is emitted first",
                node.logical_id,
                dep
            );
        }
    }
}

#[test]
fn test_synthesis_is_idempotent() {
    let descriptor = TopologyDescriptor::reference_deployment().unwrap();

    let first = descriptor.synthesize().unwrap();
    let second = descriptor.synthesize().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
}

#[test]
fn test_graph_survives_serialization_and_reverifies() {
    let graph = synthesized();

    let json = graph.to_json_pretty().unwrap();
    let restored: ResourceGraph = serde_json::from_str(&json).unwrap();

    assert_eq!(graph, restored);
    assert!(restored.verify().is_ok());
}

#[test]
fn test_gateway_carries_default_authorization_scopes() {
    let graph = synthesized();

    let (_, gateway) = graph.http_gateways()[0];
    assert_eq!(gateway.name, "kafkaRestProxy");
    assert_eq!(gateway.description, "API for Kafka REST Proxy");
    assert_eq!(gateway.default_authorization_scopes.len(), 1);
    assert_eq!(
        gateway.default_authorization_scopes[0].as_str(),
        "https://resource-server//post-kafka"
    );
}

#[test]
fn test_network_lookup_uses_configured_vpc() {
    let graph = synthesized();

    let lookups = graph.network_lookups();
    assert_eq!(lookups.len(), 1);
    assert_eq!(lookups[0].1.vpc_id.as_str(), "vpc-0ce8ea63163195679");

    // Everything that attaches to the network names the lookup node.
    for node in graph.iter() {
        if let Resource::LoadBalancer(lb) = &node.resource {
            assert_eq!(lb.vpc, logical(ids::VPC));
        }
    }
}
