use kube::config::KubeConfigOptions;
use kube::core::GroupVersionKind;
use kube::{Client, Config};
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::debug;

use super::codec::{Codec, JsonCodec};
use super::config::ClientConfig;
use super::converter::{into_typed, into_typed_list};
use super::descriptor::{
    get_address, get_gvk, get_list_gvk, gvk_to_string, list_item_gvk, Descriptor, ResourceList,
};
use super::error::K8sError;
use super::options::{GetOption, GetOptions, ListOption, ListOptions};
use super::resolver::{ListScope, ResourceClient, ResourceClientResolver};

/// Provides a _sync_ implementation of [AsyncK8sClient].
///
/// It offers a sync version of each async method implemented in the [AsyncK8sClient]. To do so,
/// it essentially calls to `runtime.block_on(self.async_client.future)` using the held runtime
/// reference, so it must not be called from within an async context of the same runtime.
pub struct SyncK8sClient {
    async_client: AsyncK8sClient,
    runtime: Arc<Runtime>,
}

impl Debug for SyncK8sClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncK8sClient")
            .field("async_client", &self.async_client)
            .field("runtime", &self.runtime)
            .finish()
    }
}

impl SyncK8sClient {
    pub fn try_new(runtime: Arc<Runtime>, config: &ClientConfig) -> Result<Self, K8sError> {
        Ok(Self {
            async_client: runtime.block_on(AsyncK8sClient::try_new(config))?,
            runtime,
        })
    }

    pub fn new(runtime: Arc<Runtime>, async_client: AsyncK8sClient) -> Self {
        Self {
            async_client,
            runtime,
        }
    }

    pub fn get<K>(
        &self,
        destination: &mut K,
        options: impl IntoIterator<Item = GetOption>,
    ) -> Result<(), K8sError>
    where
        K: Descriptor + DeserializeOwned,
    {
        self.runtime
            .block_on(self.async_client.get(destination, options))
    }

    pub fn list<K>(
        &self,
        namespace: &str,
        destination: &mut ResourceList<K>,
        options: impl IntoIterator<Item = ListOption>,
    ) -> Result<(), K8sError>
    where
        K: DeserializeOwned,
    {
        self.runtime
            .block_on(self.async_client.list(namespace, destination, options))
    }

    pub fn list_cluster<K>(
        &self,
        destination: &mut ResourceList<K>,
        options: impl IntoIterator<Item = ListOption>,
    ) -> Result<(), K8sError>
    where
        K: DeserializeOwned,
    {
        self.runtime
            .block_on(self.async_client.list_cluster(destination, options))
    }

    pub fn resolver(&self) -> &ResourceClientResolver {
        self.async_client.resolver()
    }
}

/// Reads any kind served by the cluster into the caller's objects.
///
/// Each call extracts the triple from the destination, resolves (once per triple) the client for
/// it, performs a single read and converts the response into the destination. Calls are never
/// retried and errors are returned as they happen.
pub struct AsyncK8sClient {
    resolver: Arc<ResourceClientResolver>,
    codec: Arc<dyn Codec>,
}

impl Debug for AsyncK8sClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncK8sClient")
            .field("cached_gvks", &self.resolver.cached_gvks())
            .finish()
    }
}

impl AsyncK8sClient {
    /// Constructs a new Kubernetes client.
    ///
    /// If loading from the inCluster config fail we fall back to kube-config
    /// This will respect the `$KUBECONFIG` envvar, but otherwise default to `~/.kube/config`.
    /// Not leveraging infer() to check inClusterConfig first
    pub async fn try_new(client_config: &ClientConfig) -> Result<Self, K8sError> {
        debug!("trying inClusterConfig for k8s client");

        let mut config = match Config::incluster() {
            Ok(c) => c,
            Err(e) => {
                debug!("inClusterConfig {}, trying kubeconfig for k8s client", e);
                let c = KubeConfigOptions::default();
                Config::from_kubeconfig(&c).await?
            }
        };
        client_config.apply_to(&mut config);

        let client = Client::try_from(config)?;

        debug!("k8s client initialization succeeded");
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self::new(Arc::new(ResourceClientResolver::from_client(client)))
    }

    /// Client using the given resolver, which can be shared with other clients.
    pub fn new(resolver: Arc<ResourceClientResolver>) -> Self {
        Self::with_codec(resolver, Arc::new(JsonCodec))
    }

    pub fn with_codec(resolver: Arc<ResourceClientResolver>, codec: Arc<dyn Codec>) -> Self {
        Self { resolver, codec }
    }

    pub fn resolver(&self) -> &ResourceClientResolver {
        &self.resolver
    }

    /// Fetches the object addressed by the destination's namespace and name and replaces the
    /// destination with it.
    ///
    /// The destination content is undefined if the call fails.
    pub async fn get<K>(
        &self,
        destination: &mut K,
        options: impl IntoIterator<Item = GetOption>,
    ) -> Result<(), K8sError>
    where
        K: Descriptor + DeserializeOwned,
    {
        let gvk = get_gvk(destination.type_meta().as_ref())?;
        let address = get_address(destination)?;
        let options = GetOptions::from_options(options);

        let resource_client = self.resolver.resolve(&gvk).await?;

        let bytes = resource_client.get(&address, &options).await?;

        let tree = self
            .codec
            .decode(&bytes)
            .map_err(|e| K8sError::Decode(gvk_to_string(&gvk), e))?;
        into_typed(tree, destination).map_err(|e| K8sError::Conversion(gvk_to_string(&gvk), e))
    }

    /// Lists the objects of the destination's kind in `namespace`, or across all namespaces if
    /// it's empty, replacing the destination items in the order returned by the api-server.
    ///
    /// Cluster scoped kinds fail with [K8sError::ScopeMismatch], use [Self::list_cluster] instead.
    pub async fn list<K>(
        &self,
        namespace: &str,
        destination: &mut ResourceList<K>,
        options: impl IntoIterator<Item = ListOption>,
    ) -> Result<(), K8sError>
    where
        K: DeserializeOwned,
    {
        self.list_in_scope(ListScope::from_namespace(namespace), destination, options)
            .await
    }

    /// Lists the objects of a cluster scoped kind.
    pub async fn list_cluster<K>(
        &self,
        destination: &mut ResourceList<K>,
        options: impl IntoIterator<Item = ListOption>,
    ) -> Result<(), K8sError>
    where
        K: DeserializeOwned,
    {
        self.list_in_scope(ListScope::Cluster, destination, options)
            .await
    }

    async fn list_in_scope<K>(
        &self,
        scope: ListScope,
        destination: &mut ResourceList<K>,
        options: impl IntoIterator<Item = ListOption>,
    ) -> Result<(), K8sError>
    where
        K: DeserializeOwned,
    {
        let declared = get_list_gvk(destination)?;
        let options = ListOptions::from_options(options);

        let resource_client = self.resolve_list_kind(&declared).await?;
        let gvk = resource_client.gvk();

        let bytes = resource_client.list(&scope, &options).await?;

        let tree = self
            .codec
            .decode(&bytes)
            .map_err(|e| K8sError::Decode(gvk_to_string(gvk), e))?;
        into_typed_list(tree, destination)
            .map_err(|e| K8sError::Conversion(gvk_to_string(gvk), e))
    }

    /// Resolves the kind declared by a list destination. Only if the cluster doesn't serve it and
    /// it's a list kind (`FooList`), the item kind (`Foo`) is resolved instead.
    async fn resolve_list_kind(
        &self,
        declared: &GroupVersionKind,
    ) -> Result<Arc<ResourceClient>, K8sError> {
        match self.resolver.resolve(declared).await {
            Err(K8sError::UnknownResource(kind)) => match list_item_gvk(declared) {
                Some(item_gvk) => {
                    debug!(
                        "{} not served, listing {} items",
                        kind,
                        gvk_to_string(&item_gvk)
                    );
                    self.resolver.resolve(&item_gvk).await
                }
                None => Err(K8sError::UnknownResource(kind)),
            },
            result => result,
        }
    }
}
