// Copyright 2025 Cowboy AI, LLC.

//! Resource Graph
//!
//! The ordered, dependency-checked container the descriptor synthesizes
//! into. Nodes are kept in emission order; a node can only be inserted after
//! every node it references, so iteration order is always a valid apply
//! order for a provisioning backend.

use crate::error::{Result, TopologyError};
use crate::resources::*;
use crate::value_objects::{LogicalId, SecurityGroupId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A synthesized resource together with its graph position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub logical_id: LogicalId,
    pub resource: Resource,
    /// Logical IDs this node must be applied after
    pub depends_on: Vec<LogicalId>,
}

/// The synthesized desired-state graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource after everything it depends on.
    ///
    /// Dependencies are the resource's own references plus any extra
    /// ordering edges the caller supplies. All of them must already be in
    /// the graph; a logical ID can only be emitted once.
    pub fn insert(
        &mut self,
        logical_id: LogicalId,
        resource: Resource,
        extra_deps: &[LogicalId],
    ) -> Result<()> {
        if self.contains(&logical_id) {
            return Err(TopologyError::DuplicateLogicalId(logical_id.to_string()));
        }

        let mut depends_on = resource.references();
        for dep in extra_deps {
            if !depends_on.contains(dep) {
                depends_on.push(dep.clone());
            }
        }

        for dep in &depends_on {
            if !self.contains(dep) {
                return Err(TopologyError::UnresolvedReference {
                    from: logical_id.to_string(),
                    to: dep.to_string(),
                });
            }
        }

        self.nodes.push(ResourceNode {
            logical_id,
            resource,
            depends_on,
        });
        Ok(())
    }

    pub fn contains(&self, id: &LogicalId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &LogicalId) -> Option<&ResourceNode> {
        self.nodes.iter().find(|node| &node.logical_id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in emission (apply) order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    // ========================================================================
    // Typed Views
    // ========================================================================

    pub fn network_lookups(&self) -> Vec<(&LogicalId, &NetworkLookup)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::NetworkLookup(lookup) => Some((&node.logical_id, lookup)),
                _ => None,
            })
            .collect()
    }

    pub fn security_group_imports(&self) -> Vec<(&LogicalId, &SecurityGroupImport)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::SecurityGroupImport(import) => Some((&node.logical_id, import)),
                _ => None,
            })
            .collect()
    }

    pub fn security_groups(&self) -> Vec<(&LogicalId, &SecurityGroup)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::SecurityGroup(group) => Some((&node.logical_id, group)),
                _ => None,
            })
            .collect()
    }

    pub fn security_rule_extensions(&self) -> Vec<(&LogicalId, &SecurityRuleExtension)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::SecurityRuleExtension(ext) => Some((&node.logical_id, ext)),
                _ => None,
            })
            .collect()
    }

    pub fn load_balancers(&self) -> Vec<(&LogicalId, &LoadBalancer)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::LoadBalancer(lb) => Some((&node.logical_id, lb)),
                _ => None,
            })
            .collect()
    }

    pub fn target_groups(&self) -> Vec<(&LogicalId, &TargetGroup)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::TargetGroup(tg) => Some((&node.logical_id, tg)),
                _ => None,
            })
            .collect()
    }

    pub fn listeners(&self) -> Vec<(&LogicalId, &Listener)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::Listener(listener) => Some((&node.logical_id, listener)),
                _ => None,
            })
            .collect()
    }

    pub fn user_pools(&self) -> Vec<(&LogicalId, &UserPool)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::UserPool(pool) => Some((&node.logical_id, pool)),
                _ => None,
            })
            .collect()
    }

    pub fn resource_servers(&self) -> Vec<(&LogicalId, &ResourceServer)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::ResourceServer(server) => Some((&node.logical_id, server)),
                _ => None,
            })
            .collect()
    }

    pub fn user_pool_clients(&self) -> Vec<(&LogicalId, &UserPoolClient)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::UserPoolClient(client) => Some((&node.logical_id, client)),
                _ => None,
            })
            .collect()
    }

    pub fn user_pool_domains(&self) -> Vec<(&LogicalId, &UserPoolDomain)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::UserPoolDomain(domain) => Some((&node.logical_id, domain)),
                _ => None,
            })
            .collect()
    }

    pub fn authorizers(&self) -> Vec<(&LogicalId, &Authorizer)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::Authorizer(authorizer) => Some((&node.logical_id, authorizer)),
                _ => None,
            })
            .collect()
    }

    pub fn http_gateways(&self) -> Vec<(&LogicalId, &HttpGateway)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::HttpGateway(gateway) => Some((&node.logical_id, gateway)),
                _ => None,
            })
            .collect()
    }

    pub fn gateway_routes(&self) -> Vec<(&LogicalId, &GatewayRoute)> {
        self.nodes
            .iter()
            .filter_map(|node| match &node.resource {
                Resource::GatewayRoute(route) => Some((&node.logical_id, route)),
                _ => None,
            })
            .collect()
    }

    /// Provider IDs of every imported security group
    pub fn imported_group_ids(&self) -> HashSet<&SecurityGroupId> {
        self.security_group_imports()
            .into_iter()
            .map(|(_, import)| &import.group_id)
            .collect()
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Re-check the structural invariants insert() enforces, plus external
    /// group references. Deserialized graphs bypass insert(), so callers
    /// handed a graph from outside this process verify before trusting it.
    pub fn verify(&self) -> Result<()> {
        let mut seen: HashSet<&LogicalId> = HashSet::new();

        for node in &self.nodes {
            if !seen.insert(&node.logical_id) {
                return Err(TopologyError::DuplicateLogicalId(
                    node.logical_id.to_string(),
                ));
            }

            for dep in node.resource.references().iter().chain(&node.depends_on) {
                if !seen.contains(dep) {
                    return Err(TopologyError::UnresolvedReference {
                        from: node.logical_id.to_string(),
                        to: dep.to_string(),
                    });
                }
            }
        }

        let imports = self.imported_group_ids();
        for node in &self.nodes {
            for group_id in node.resource.external_group_refs() {
                if !imports.contains(&group_id) {
                    return Err(TopologyError::UnresolvedReference {
                        from: node.logical_id.to_string(),
                        to: group_id.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// JSON document keyed for a provisioning backend
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Generate a Mermaid diagram of the graph
    pub fn to_mermaid(&self) -> String {
        let mut output = String::new();
        output.push_str("graph TD\n");

        for (idx, node) in self.nodes.iter().enumerate() {
            output.push_str(&format!(
                "    n{}[\"{}<br/>{}\"]\n",
                idx,
                node.logical_id,
                node.resource.kind()
            ));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            for dep in &node.depends_on {
                if let Some(dep_idx) = self.nodes.iter().position(|n| &n.logical_id == dep) {
                    output.push_str(&format!("    n{} --> n{}\n", idx, dep_idx));
                }
            }
        }

        output
    }

    /// Generate a plain-text topology report
    pub fn topology_report(&self) -> String {
        let mut report = String::new();
        report.push_str("# Edge Topology Report\n\n");

        report.push_str("## Summary\n\n");
        report.push_str(&format!("- Resources: {}\n", self.len()));
        report.push_str(&format!("- Load Balancers: {}\n", self.load_balancers().len()));
        report.push_str(&format!(
            "- Security Groups: {} declared, {} imported\n",
            self.security_groups().len(),
            self.security_group_imports().len()
        ));
        report.push_str(&format!("- Gateway Routes: {}\n\n", self.gateway_routes().len()));

        report.push_str("## Load Balancers\n\n");
        for (id, lb) in self.load_balancers() {
            let facing = if lb.internet_facing { "internet-facing" } else { "internal" };
            report.push_str(&format!("- {} ({})\n", id, facing));
        }

        report.push_str("\n## Target Groups\n\n");
        for (id, tg) in self.target_groups() {
            report.push_str(&format!("- {} ({})\n", id, tg.name));
            for target in &tg.targets {
                report.push_str(&format!("  - {}:{}\n", target.instance_id, target.port));
            }
        }

        report.push_str("\n## Routes\n\n");
        for (id, route) in self.gateway_routes() {
            report.push_str(&format!("- {}: {} {}\n", id, route.method, route.path));
            for scope in &route.authorization_scopes {
                report.push_str(&format!("  - requires {}\n", scope));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{Port, PortRange, RuleDirection, VpcId};

    fn logical(id: &str) -> LogicalId {
        LogicalId::new(id).unwrap()
    }

    fn vpc_lookup() -> Resource {
        Resource::NetworkLookup(NetworkLookup {
            vpc_id: VpcId::new("vpc-0ce8ea63163195679").unwrap(),
        })
    }

    #[test]
    fn test_insert_and_get() {
        let mut graph = ResourceGraph::new();
        graph.insert(logical("vpc"), vpc_lookup(), &[]).unwrap();

        assert_eq!(graph.len(), 1);
        assert!(graph.get(&logical("vpc")).is_some());
        assert!(graph.get(&logical("alb")).is_none());
    }

    #[test]
    fn test_duplicate_logical_id_rejected() {
        let mut graph = ResourceGraph::new();
        graph.insert(logical("vpc"), vpc_lookup(), &[]).unwrap();

        let err = graph.insert(logical("vpc"), vpc_lookup(), &[]).unwrap_err();
        assert_eq!(err, TopologyError::DuplicateLogicalId("vpc".into()));
    }

    #[test]
    fn test_forward_reference_rejected() {
        let mut graph = ResourceGraph::new();
        graph.insert(logical("vpc"), vpc_lookup(), &[]).unwrap();

        let result = graph.insert(
            logical("user-pool"),
            Resource::UserPool(UserPool {
                name: "kafka-api-userpool".into(),
            }),
            &[logical("resource-server")],
        );

        assert_eq!(
            result.unwrap_err(),
            TopologyError::UnresolvedReference {
                from: "user-pool".into(),
                to: "resource-server".into(),
            }
        );
    }

    #[test]
    fn test_verify_catches_unknown_external_group() {
        let mut graph = ResourceGraph::new();
        graph.insert(logical("vpc"), vpc_lookup(), &[]).unwrap();
        graph
            .insert(
                logical("alb-sg"),
                Resource::SecurityGroup(SecurityGroup {
                    group_name: "Kafka ALB SG".into(),
                    description: "Security group for Kafka ALB".into(),
                    allow_all_outbound: true,
                    vpc: logical("vpc"),
                    rules: vec![SecurityRule {
                        direction: RuleDirection::Egress,
                        peer: GroupRef::External(
                            SecurityGroupId::new("sg-08f04b435a3fc5375").unwrap(),
                        ),
                        port_range: PortRange::Tcp(Port::new(8082).unwrap()),
                        description: "Allow traffic to Kafka proxy".into(),
                    }],
                }),
                &[],
            )
            .unwrap();

        // The rule points at sg-08f... but nothing imports it.
        assert!(matches!(
            graph.verify(),
            Err(TopologyError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_mermaid_output() {
        let mut graph = ResourceGraph::new();
        graph.insert(logical("vpc"), vpc_lookup(), &[]).unwrap();

        let mermaid = graph.to_mermaid();
        assert!(mermaid.contains("graph TD"));
        assert!(mermaid.contains("NetworkLookup"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut graph = ResourceGraph::new();
        graph.insert(logical("vpc"), vpc_lookup(), &[]).unwrap();

        let json = graph.to_json_pretty().unwrap();
        let back: ResourceGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(graph, back);
        assert!(back.verify().is_ok());
    }
}
