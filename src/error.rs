// Copyright 2025 Cowboy AI, LLC.

//! Error types for topology synthesis and validation

use thiserror::Error;

/// Errors that can occur while building or validating a topology
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Invalid network (VPC) identifier
    #[error("Invalid network ID: {0}")]
    InvalidNetworkId(String),

    /// Invalid compute instance identifier
    #[error("Invalid instance ID: {0}")]
    InvalidInstanceId(String),

    /// Invalid security group identifier
    #[error("Invalid security group ID: {0}")]
    InvalidSecurityGroupId(String),

    /// Invalid port number
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    /// Invalid logical resource identifier
    #[error("Invalid logical ID: {0}")]
    InvalidLogicalId(String),

    /// Invalid OAuth scope name or identifier
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Invalid identity pool domain prefix
    #[error("Invalid domain prefix: {0}")]
    InvalidDomainPrefix(String),

    /// Invalid gateway route path
    #[error("Invalid route path: {0}")]
    InvalidRoutePath(String),

    /// A logical ID was emitted twice
    #[error("Duplicate logical ID: {0}")]
    DuplicateLogicalId(String),

    /// A resource references a logical ID that is not (yet) in the graph
    #[error("Unresolved reference from {from}: {to}")]
    UnresolvedReference {
        /// Logical ID of the referencing resource
        from: String,
        /// The reference that failed to resolve
        to: String,
    },

    /// A client or route requests a scope no resource server declares
    #[error("Scope mismatch for {owner}: {detail}")]
    ScopeMismatch {
        /// Logical ID of the client or route carrying the scope
        owner: String,
        /// What failed to match
        detail: String,
    },

    /// Generic configuration validation failure
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for topology operations
pub type Result<T> = std::result::Result<T, TopologyError>;

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        TopologyError::Validation(err.to_string())
    }
}
