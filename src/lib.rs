// Copyright 2025 Cowboy AI, LLC.

//! Edge Topology Descriptor for the Kafka REST Proxy API
//!
//! This crate declares the fixed edge topology that fronts a Kafka REST
//! proxy instance: a private application load balancer behind an HTTP
//! gateway whose single route is guarded by an OAuth client-credentials
//! authorizer. There is no traffic handling and no runtime behavior here;
//! the crate produces a desired-state resource graph for an external
//! provisioning backend to apply.
//!
//! ## Architecture
//!
//! 1. **Value Objects**: immutable, validated identifiers and enums
//! 2. **Configuration Records**: explicit structs with named fields per
//!    entity, validated before synthesis
//! 3. **Resources**: the synthesized desired-state records
//! 4. **Resource Graph**: ordered, dependency-checked container; iteration
//!    order is apply order
//! 5. **Descriptor**: single-pass, deterministic synthesis with local
//!    invariant verification
//!
//! ## Usage
//!
//! ```rust
//! use kafka_proxy_topology::TopologyDescriptor;
//!
//! let descriptor = TopologyDescriptor::reference_deployment().unwrap();
//! let graph = descriptor.synthesize().unwrap();
//!
//! assert_eq!(graph.load_balancers().len(), 1);
//! assert!(!graph.load_balancers()[0].1.internet_facing);
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod resources;
pub mod value_objects;

// Re-export commonly used types
pub use config::{
    ClientConfig, GatewayConfig, IdentityConfig, LoadBalancerConfig, ResourceServerConfig,
    RouteConfig, ScopeConfig, SecurityGroupConfig, TargetGroupConfig, TopologyConfig,
    TopologyInputs,
};
pub use descriptor::{ids, TopologyDescriptor};
pub use error::{Result, TopologyError};
pub use graph::{ResourceGraph, ResourceNode};
pub use resources::{
    AlbIntegration, Authorizer, GatewayRoute, GroupRef, HttpGateway, InstanceTarget, Listener,
    LoadBalancer, NetworkLookup, Resource, ResourceScope, ResourceServer, SecurityGroup,
    SecurityGroupImport, SecurityRule, SecurityRuleExtension, TargetGroup, UserPool,
    UserPoolClient, UserPoolDomain,
};
pub use value_objects::{
    ApplicationProtocol, DomainPrefix, HttpMethod, InstanceId, LogicalId, OAuthFlow, Port,
    PortRange, ResourceServerIdentifier, RoutePath, RuleDirection, ScopeIdentifier, ScopeName,
    SecurityGroupId, TargetType, VpcId,
};
