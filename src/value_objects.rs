// Copyright 2025 Cowboy AI, LLC.

//! Topology Value Objects
//!
//! These are the building blocks of the edge topology model.
//! All value objects are immutable and validated on construction.

use crate::error::{Result, TopologyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn is_provider_id(id: &str, prefix: &str) -> bool {
    match id.strip_prefix(prefix) {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}

// ============================================================================
// External Identifiers
// ============================================================================

/// Identifier of a pre-existing network, resolved at synthesis time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VpcId(String);

impl VpcId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if !is_provider_id(&id, "vpc-") {
            return Err(TopologyError::InvalidNetworkId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VpcId {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Identifier of a pre-existing compute instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if !is_provider_id(&id, "i-") {
            return Err(TopologyError::InvalidInstanceId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceId {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Identifier of a security group, either declared here or pre-existing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityGroupId(String);

impl SecurityGroupId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if !is_provider_id(&id, "sg-") {
            return Err(TopologyError::InvalidSecurityGroupId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecurityGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SecurityGroupId {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Graph Identifiers
// ============================================================================

/// Stable identifier of a node in the synthesized resource graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(TopologyError::InvalidLogicalId(
                "Logical ID cannot be empty".into(),
            ));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(TopologyError::InvalidLogicalId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogicalId {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Network Value Objects
// ============================================================================

/// TCP/UDP port number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    pub fn new(port: u16) -> Result<Self> {
        if port == 0 {
            return Err(TopologyError::InvalidPort("Port cannot be zero".into()));
        }
        Ok(Self(port))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Port range matched by a security rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortRange {
    /// All TCP ports
    AllTcp,
    /// A single TCP port
    Tcp(Port),
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRange::AllTcp => write!(f, "tcp/0-65535"),
            PortRange::Tcp(port) => write!(f, "tcp/{}", port),
        }
    }
}

/// Direction of a security rule, relative to the group it is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleDirection {
    Ingress,
    Egress,
}

impl fmt::Display for RuleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleDirection::Ingress => write!(f, "ingress"),
            RuleDirection::Egress => write!(f, "egress"),
        }
    }
}

/// Application-layer protocol spoken by the load balancer and target group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationProtocol {
    Http,
    Https,
}

impl fmt::Display for ApplicationProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationProtocol::Http => write!(f, "HTTP"),
            ApplicationProtocol::Https => write!(f, "HTTPS"),
        }
    }
}

/// How targets are addressed by a target group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    Instance,
    Ip,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Instance => write!(f, "instance"),
            TargetType::Ip => write!(f, "ip"),
        }
    }
}

// ============================================================================
// Gateway Value Objects
// ============================================================================

/// HTTP method matched by a gateway route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        };
        write!(f, "{}", s)
    }
}

/// Path matched by a gateway route
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePath(String);

impl RoutePath {
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(TopologyError::InvalidRoutePath(format!(
                "Route path must start with '/': {}",
                path
            )));
        }
        if path.chars().any(|c| c.is_whitespace()) {
            return Err(TopologyError::InvalidRoutePath(format!(
                "Route path cannot contain whitespace: {}",
                path
            )));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoutePath {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Identity Value Objects
// ============================================================================

/// Name of a custom scope declared on a resource server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeName(String);

impl ScopeName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(TopologyError::InvalidScope(
                "Scope name cannot be empty".into(),
            ));
        }
        if name.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(TopologyError::InvalidScope(format!(
                "Scope name cannot contain whitespace or '/': {}",
                name
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Audience identifier of a resource server
///
/// A trailing slash is legal and preserved verbatim. Derived full scope
/// identifiers join with a plain '/', so a trailing slash here produces a
/// double slash in every scope string derived from this server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceServerIdentifier(String);

impl ResourceServerIdentifier {
    pub fn new(identifier: impl Into<String>) -> Result<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(TopologyError::InvalidScope(
                "Resource server identifier cannot be empty".into(),
            ));
        }
        if identifier.chars().any(|c| c.is_whitespace()) {
            return Err(TopologyError::InvalidScope(format!(
                "Resource server identifier cannot contain whitespace: {}",
                identifier
            )));
        }
        Ok(Self(identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceServerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full scope string as granted to clients and required by routes
///
/// Compared byte-for-byte everywhere. No slash normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeIdentifier(String);

impl ScopeIdentifier {
    pub fn new(scope: impl Into<String>) -> Result<Self> {
        let scope = scope.into();
        if scope.is_empty() {
            return Err(TopologyError::InvalidScope(
                "Scope identifier cannot be empty".into(),
            ));
        }
        if scope.chars().any(|c| c.is_whitespace()) {
            return Err(TopologyError::InvalidScope(format!(
                "Scope identifier cannot contain whitespace: {}",
                scope
            )));
        }
        Ok(Self(scope))
    }

    /// Join a resource server identifier and a scope name into the full
    /// scope string the identity provider publishes for that pair.
    pub fn derived(server: &ResourceServerIdentifier, scope: &ScopeName) -> Self {
        Self(format!("{}/{}", server.as_str(), scope.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScopeIdentifier {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// OAuth grant flow enabled on an identity client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OAuthFlow {
    /// Machine-to-machine flow
    ClientCredentials,
    AuthorizationCode,
    Implicit,
}

impl fmt::Display for OAuthFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OAuthFlow::ClientCredentials => write!(f, "client_credentials"),
            OAuthFlow::AuthorizationCode => write!(f, "authorization_code"),
            OAuthFlow::Implicit => write!(f, "implicit"),
        }
    }
}

/// Domain prefix bound to an identity pool
///
/// Globally unique at the provider. A collision is reported by the external
/// system at apply time, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainPrefix(String);

impl DomainPrefix {
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.len() > 63 {
            return Err(TopologyError::InvalidDomainPrefix(
                "Domain prefix must be 1-63 characters".into(),
            ));
        }
        if !prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(TopologyError::InvalidDomainPrefix(prefix));
        }
        if prefix.starts_with('-') || prefix.ends_with('-') {
            return Err(TopologyError::InvalidDomainPrefix(prefix));
        }
        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DomainPrefix {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vpc_id_creation() {
        let id = VpcId::new("vpc-0ce8ea63163195679").unwrap();
        assert_eq!(id.as_str(), "vpc-0ce8ea63163195679");
    }

    #[test]
    fn test_vpc_id_rejects_wrong_prefix() {
        assert!(VpcId::new("sg-0ce8ea63163195679").is_err());
        assert!(VpcId::new("vpc-").is_err());
        assert!(VpcId::new("").is_err());
    }

    #[test]
    fn test_instance_id_creation() {
        let id = InstanceId::new("i-04541f167f6131df2").unwrap();
        assert_eq!(id.to_string(), "i-04541f167f6131df2");
        assert!(InstanceId::new("instance01").is_err());
    }

    #[test]
    fn test_security_group_id_parsing() {
        let id: SecurityGroupId = "sg-08f04b435a3fc5375".parse().unwrap();
        assert_eq!(id.as_str(), "sg-08f04b435a3fc5375");
        assert!("sg-!bad".parse::<SecurityGroupId>().is_err());
    }

    #[test]
    fn test_logical_id_validation() {
        assert!(LogicalId::new("alb-sg").is_ok());
        assert!(LogicalId::new("").is_err());
        assert!(LogicalId::new("Alb SG").is_err());
    }

    #[test]
    fn test_port_rejects_zero() {
        assert!(Port::new(0).is_err());
        assert_eq!(Port::new(8082).unwrap().value(), 8082);
    }

    #[test]
    fn test_port_range_display() {
        assert_eq!(PortRange::AllTcp.to_string(), "tcp/0-65535");
        assert_eq!(PortRange::Tcp(Port::new(8082).unwrap()).to_string(), "tcp/8082");
    }

    #[test]
    fn test_route_path_validation() {
        assert!(RoutePath::new("/topics/TestTopic").is_ok());
        assert!(RoutePath::new("topics/TestTopic").is_err());
        assert!(RoutePath::new("/topics/Test Topic").is_err());
    }

    #[test]
    fn test_scope_name_rejects_separator() {
        assert!(ScopeName::new("post-kafka").is_ok());
        assert!(ScopeName::new("post/kafka").is_err());
        assert!(ScopeName::new("").is_err());
    }

    #[test]
    fn test_derived_scope_preserves_double_slash() {
        let server = ResourceServerIdentifier::new("https://resource-server/").unwrap();
        let scope = ScopeName::new("post-kafka").unwrap();

        let full = ScopeIdentifier::derived(&server, &scope);
        assert_eq!(full.as_str(), "https://resource-server//post-kafka");
    }

    #[test]
    fn test_domain_prefix_validation() {
        assert!(DomainPrefix::new("kafkarestapiproxy").is_ok());
        assert!(DomainPrefix::new("Kafka").is_err());
        assert!(DomainPrefix::new("-kafka").is_err());
        assert!(DomainPrefix::new("").is_err());
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Get.to_string(), "GET");
    }

    #[test]
    fn test_oauth_flow_display() {
        assert_eq!(OAuthFlow::ClientCredentials.to_string(), "client_credentials");
    }
}
