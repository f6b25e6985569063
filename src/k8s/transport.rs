use async_trait::async_trait;
use kube::api::{GetParams, ListParams};
use kube::core::{DynamicObject, Request};
use kube::discovery::ApiResource;
use kube::{Client, Resource};

use super::options::{GetOptions, ListOptions};

/// Performs the remote reads for an already discovered resource.
///
/// `namespace` is `None` for cluster scoped kinds and for lists across all namespaces.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        api_resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        options: &GetOptions,
    ) -> Result<Vec<u8>, kube::Error>;

    async fn list(
        &self,
        api_resource: &ApiResource,
        namespace: Option<&str>,
        options: &ListOptions,
    ) -> Result<Vec<u8>, kube::Error>;
}

/// Transport sending the requests through the kube client, so authentication, timeouts and
/// api-server error statuses are handled there.
pub struct KubeTransport {
    client: Client,
}

impl KubeTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for KubeTransport {
    async fn get(
        &self,
        api_resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        options: &GetOptions,
    ) -> Result<Vec<u8>, kube::Error> {
        let request = Request::new(DynamicObject::url_path(api_resource, namespace))
            .get(name, &GetParams::from(options))
            .map_err(kube::Error::BuildRequest)?;

        Ok(self.client.request_text(request).await?.into_bytes())
    }

    async fn list(
        &self,
        api_resource: &ApiResource,
        namespace: Option<&str>,
        options: &ListOptions,
    ) -> Result<Vec<u8>, kube::Error> {
        let request = Request::new(DynamicObject::url_path(api_resource, namespace))
            .list(&ListParams::from(options))
            .map_err(kube::Error::BuildRequest)?;

        Ok(self.client.request_text(request).await?.into_bytes())
    }
}
