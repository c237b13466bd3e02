//! Deployment roles, transports and generation targets

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where in the distributed topology a step's generated artifact runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentRole {
    PluginServer,
    PluginClient,
    PipelineServer,
    RestServer,
    OrchestratorClient,
}

impl DeploymentRole {
    pub const ALL: [DeploymentRole; 5] = [
        DeploymentRole::PluginServer,
        DeploymentRole::PluginClient,
        DeploymentRole::PipelineServer,
        DeploymentRole::RestServer,
        DeploymentRole::OrchestratorClient,
    ];

    /// Whether artifacts for this role serve requests
    pub fn is_server(self) -> bool {
        matches!(
            self,
            DeploymentRole::PluginServer | DeploymentRole::PipelineServer | DeploymentRole::RestServer
        )
    }

    /// Directory name used for artifacts of this role
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentRole::PluginServer => "plugin-server",
            DeploymentRole::PluginClient => "plugin-client",
            DeploymentRole::PipelineServer => "pipeline-server",
            DeploymentRole::RestServer => "rest-server",
            DeploymentRole::OrchestratorClient => "orchestrator-client",
        }
    }
}

impl fmt::Display for DeploymentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active transport of the compiling unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Grpc,
    Rest,
    /// In-process calls; no network protocol surface at all
    Local,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [TransportMode::Grpc, TransportMode::Rest, TransportMode::Local];
}

impl Default for TransportMode {
    fn default() -> Self {
        TransportMode::Grpc
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportMode::Grpc => "grpc",
            TransportMode::Rest => "rest",
            TransportMode::Local => "local",
        };
        f.write_str(s)
    }
}

impl FromStr for TransportMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grpc" => Ok(TransportMode::Grpc),
            "rest" => Ok(TransportMode::Rest),
            "local" => Ok(TransportMode::Local),
            _ => Err(CoreError::InvalidValue {
                field: "transport".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Hosting platform of the generated services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMode {
    Standard,
    /// Function-as-a-service hosting, HTTP entry points only
    Function,
}

impl Default for PlatformMode {
    fn default() -> Self {
        PlatformMode::Standard
    }
}

impl fmt::Display for PlatformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformMode::Standard => f.write_str("standard"),
            PlatformMode::Function => f.write_str("function"),
        }
    }
}

impl FromStr for PlatformMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(PlatformMode::Standard),
            "function" => Ok(PlatformMode::Function),
            _ => Err(CoreError::InvalidValue {
                field: "platform".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// A kind of artifact the generator can emit for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationTarget {
    RemoteService,
    RemoteClient,
    HttpResource,
    HttpClient,
    InProcessClient,
    DelegatedAdapter,
}

impl GenerationTarget {
    /// Suffix used in binding keys (`<serviceName>_<suffix>`)
    pub fn key_suffix(self) -> &'static str {
        match self {
            GenerationTarget::RemoteService => "remote_service",
            GenerationTarget::RemoteClient => "remote_client",
            GenerationTarget::HttpResource => "http_resource",
            GenerationTarget::HttpClient => "http_client",
            GenerationTarget::InProcessClient => "local_client",
            GenerationTarget::DelegatedAdapter => "external_adapter",
        }
    }

    /// Targets that open a network protocol surface
    pub fn is_network(self) -> bool {
        matches!(
            self,
            GenerationTarget::RemoteService
                | GenerationTarget::RemoteClient
                | GenerationTarget::HttpResource
                | GenerationTarget::HttpClient
        )
    }

    /// Targets that produce a caller-side stub
    pub fn is_client(self) -> bool {
        matches!(
            self,
            GenerationTarget::RemoteClient
                | GenerationTarget::HttpClient
                | GenerationTarget::InProcessClient
        )
    }

    /// Targets whose binding needs a schema lookup
    pub fn requires_schema(self) -> bool {
        matches!(self, GenerationTarget::RemoteService | GenerationTarget::RemoteClient)
    }
}

impl fmt::Display for GenerationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_suffix())
    }
}
