//! Resolution of triples into clients able to read them.
//!
//! Resolved clients are cached per triple for the lifetime of the resolver and are never
//! refreshed on their own: callers that know the cluster discovery data changed (e.g. a CRD was
//! installed or upgraded) drop entries with [ResourceClientResolver::invalidate] or
//! [ResourceClientResolver::clear].

use kube::core::GroupVersionKind;
use kube::discovery::{ApiResource, Scope};
use kube::Client;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use super::descriptor::{gvk_to_string, ObjectAddress};
use super::discovery::{KubeDiscovery, ResourceDiscovery};
use super::error::K8sError;
use super::options::{GetOptions, ListOptions};
use super::transport::{KubeTransport, Transport};

/// Target of a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    Namespace(String),
    AllNamespaces,
    Cluster,
}

impl Display for ListScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ListScope::Namespace(ns) => f.write_str(ns),
            ListScope::AllNamespaces => f.write_str("<all namespaces>"),
            ListScope::Cluster => f.write_str("<cluster>"),
        }
    }
}

impl ListScope {
    /// An empty namespace means all namespaces.
    pub fn from_namespace(namespace: &str) -> Self {
        if namespace.is_empty() {
            ListScope::AllNamespaces
        } else {
            ListScope::Namespace(namespace.to_string())
        }
    }
}

/// Reads objects of a single triple.
pub struct ResourceClient {
    gvk: GroupVersionKind,
    api_resource: ApiResource,
    scope: Scope,
    transport: Arc<dyn Transport>,
}

impl ResourceClient {
    pub fn new(
        gvk: GroupVersionKind,
        api_resource: ApiResource,
        scope: Scope,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            gvk,
            api_resource,
            scope,
            transport,
        }
    }

    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    pub fn api_resource(&self) -> &ApiResource {
        &self.api_resource
    }

    pub fn is_namespaced(&self) -> bool {
        self.scope == Scope::Namespaced
    }

    /// Fetches the raw object at the address. The namespace is ignored for cluster scoped kinds
    /// and required for namespaced ones.
    pub async fn get(
        &self,
        address: &ObjectAddress,
        options: &GetOptions,
    ) -> Result<Vec<u8>, K8sError> {
        let namespace = match (self.is_namespaced(), address.namespace.as_deref()) {
            (true, None) => return Err(K8sError::MissingNamespace(gvk_to_string(&self.gvk))),
            (true, ns) => ns,
            (false, _) => None,
        };

        let requested = ObjectAddress {
            namespace: namespace.map(String::from),
            name: address.name.clone(),
        };
        self.transport
            .get(&self.api_resource, namespace, &address.name, options)
            .await
            .map_err(|source| K8sError::Remote {
                gvk: gvk_to_string(&self.gvk),
                address: requested.to_string(),
                source,
            })
    }

    /// Fetches the raw collection for the given scope.
    pub async fn list(&self, scope: &ListScope, options: &ListOptions) -> Result<Vec<u8>, K8sError> {
        let namespace = match (self.is_namespaced(), scope) {
            (true, ListScope::Namespace(ns)) => Some(ns.as_str()),
            (true, ListScope::AllNamespaces) => None,
            (false, ListScope::Cluster) => None,
            (true, ListScope::Cluster) => {
                return Err(self.scope_mismatch(
                    "the kind is namespaced, list it by namespace or across all namespaces",
                ))
            }
            (false, _) => {
                return Err(self.scope_mismatch(
                    "the kind is cluster scoped and cannot be listed by namespace",
                ))
            }
        };

        self.transport
            .list(&self.api_resource, namespace, options)
            .await
            .map_err(|source| K8sError::Remote {
                gvk: gvk_to_string(&self.gvk),
                address: scope.to_string(),
                source,
            })
    }

    fn scope_mismatch(&self, reason: &str) -> K8sError {
        K8sError::ScopeMismatch {
            gvk: gvk_to_string(&self.gvk),
            reason: reason.to_string(),
        }
    }
}

/// Resolves and caches a [ResourceClient] per triple.
///
/// Safe to share between tasks. The cache lock is never held while discovering, so concurrent
/// misses for the same triple may discover it more than once; the last insert wins.
pub struct ResourceClientResolver {
    discovery: Arc<dyn ResourceDiscovery>,
    transport: Arc<dyn Transport>,
    cache: RwLock<HashMap<GroupVersionKind, Arc<ResourceClient>>>,
}

impl ResourceClientResolver {
    pub fn new(discovery: Arc<dyn ResourceDiscovery>, transport: Arc<dyn Transport>) -> Self {
        Self {
            discovery,
            transport,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolver discovering and reading through the given kube client.
    pub fn from_client(client: Client) -> Self {
        Self::new(
            Arc::new(KubeDiscovery::new(client.clone())),
            Arc::new(KubeTransport::new(client)),
        )
    }

    pub async fn resolve(&self, gvk: &GroupVersionKind) -> Result<Arc<ResourceClient>, K8sError> {
        if let Some(resource_client) = self.cached(gvk) {
            return Ok(resource_client);
        }

        debug!("discovering resource for {}", gvk_to_string(gvk));
        let discovered = self
            .discovery
            .discover(gvk)
            .await?
            .ok_or_else(|| K8sError::UnknownResource(gvk_to_string(gvk)))?;

        let resource_client = Arc::new(ResourceClient::new(
            gvk.clone(),
            discovered.api_resource,
            discovered.scope,
            self.transport.clone(),
        ));

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(gvk.clone(), resource_client.clone());
        debug!("resource client for {} cached", gvk_to_string(gvk));

        Ok(resource_client)
    }

    /// Drops the cached client of the triple, returns whether there was one.
    pub fn invalidate(&self, gvk: &GroupVersionKind) -> bool {
        let removed = self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(gvk)
            .is_some();
        if removed {
            debug!("resource client for {} invalidated", gvk_to_string(gvk));
        }
        removed
    }

    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Triples with a cached client.
    pub fn cached_gvks(&self) -> Vec<GroupVersionKind> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn cached(&self, gvk: &GroupVersionKind) -> Option<Arc<ResourceClient>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(gvk)
            .cloned()
    }
}
