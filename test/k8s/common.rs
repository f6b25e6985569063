use k8s_openapi::api::core::v1::{ConfigMap, Namespace};
use kube::api::{Api, DeleteParams, ObjectMeta, PostParams};
use kube::Client;
use std::collections::BTreeMap;
use std::env;

use k8s_dynamic_reader::k8s::client::AsyncK8sClient;
use k8s_dynamic_reader::k8s::config::ClientConfig;

/// Kubeconfig used when `KUBECONFIG` is not set, e.g. the one of a local k3s/kind cluster copied
/// with `docker cp k3s-server-1:/etc/rancher/k3s/k3s.yaml test/k8s/.kubeconfig-dev`.
const DEV_KUBECONFIG_PATH: &str = "test/k8s/.kubeconfig-dev";

/// Test environment bound to the dev cluster. Every namespace created through it is removed on
/// drop.
pub struct K8sEnv {
    pub client: Client,
    generated_namespaces: Vec<String>,
}

impl K8sEnv {
    pub async fn new() -> Self {
        if env::var_os("KUBECONFIG").is_none() {
            env::set_var("KUBECONFIG", DEV_KUBECONFIG_PATH);
        }

        K8sEnv {
            client: Client::try_default().await.expect("fail to create the k8s client"),
            generated_namespaces: Vec::new(),
        }
    }

    pub async fn test_namespace(&mut self) -> String {
        let mut test_namespace = Namespace::default();
        test_namespace.metadata.generate_name = Some("dynamic-reader-test-".to_string());

        let created_namespace = Api::<Namespace>::all(self.client.clone())
            .create(&PostParams::default(), &test_namespace)
            .await
            .expect("fail to create the test namespace");

        let ns = created_namespace.metadata.name.unwrap();
        self.generated_namespaces.push(ns.clone());
        ns
    }

    /// Client under test, built the same way the users of the crate build it.
    pub async fn reader(&self) -> AsyncK8sClient {
        AsyncK8sClient::try_new(&ClientConfig::default())
            .await
            .expect("fail to create the reader")
    }

    async fn clean_up(&self) {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());

        for ns in self.generated_namespaces.iter() {
            let _ = namespaces
                .delete(ns.as_str(), &DeleteParams::default())
                .await;
        }
    }
}

impl Drop for K8sEnv {
    fn drop(&mut self) {
        // clean up test environment even if the test panics.
        // async drop doesn't exist so this needs to be run sync code.
        futures::executor::block_on(self.clean_up());
    }
}

pub async fn create_config_map(
    client: Client,
    namespace: &str,
    name: &str,
    labels: &[(&str, &str)],
) -> ConfigMap {
    let config_map = ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Default::default()
        },
        data: Some(BTreeMap::from([("key".to_string(), name.to_string())])),
        ..Default::default()
    };

    Api::<ConfigMap>::namespaced(client, namespace)
        .create(&PostParams::default(), &config_map)
        .await
        .expect("fail to create the config map")
}
