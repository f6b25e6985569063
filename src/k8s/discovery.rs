use async_trait::async_trait;
use kube::core::GroupVersionKind;
use kube::discovery::{ApiResource, Scope};
use kube::Client;
use tracing::debug;

use super::error::K8sError;

/// Addressing information of a kind served by the api-server.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredResource {
    pub api_resource: ApiResource,
    pub scope: Scope,
}

/// Translates a triple into the REST path and scope of the resource.
#[async_trait]
pub trait ResourceDiscovery: Send + Sync {
    /// Returns `None` when the cluster doesn't serve the triple.
    async fn discover(&self, gvk: &GroupVersionKind)
        -> Result<Option<DiscoveredResource>, K8sError>;
}

/// Discovery backed by the api-server discovery endpoints of the given group version.
pub struct KubeDiscovery {
    client: Client,
}

impl KubeDiscovery {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceDiscovery for KubeDiscovery {
    async fn discover(
        &self,
        gvk: &GroupVersionKind,
    ) -> Result<Option<DiscoveredResource>, K8sError> {
        match kube::discovery::pinned_kind(&self.client, gvk).await {
            Ok((api_resource, capabilities)) => Ok(Some(DiscoveredResource {
                api_resource,
                scope: capabilities.scope,
            })),
            // The group version is served but doesn't include the kind.
            Err(kube::Error::Discovery(e)) => {
                debug!("kind {:?} not found: {}", gvk, e);
                Ok(None)
            }
            // The group version itself is not served.
            Err(kube::Error::Api(e)) if e.code == 404 => {
                debug!("group version {} not found: {}", gvk.api_version(), e.message);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
