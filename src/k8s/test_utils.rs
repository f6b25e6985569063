use http::{Request, Response, StatusCode, Uri};
use kube::client::Body;
use kube::Client;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tower_test::mock;

type ApiServerHandle = mock::Handle<Request<Body>, Response<Body>>;

/// Mocked api-server answering from canned discovery documents and objects.
pub(crate) struct ApiServerVerifier {
    handle: ApiServerHandle,
    requests: Arc<Mutex<Vec<Uri>>>,
}

pub(crate) enum Scenario {
    /// Serves `apps/v1` deployments, core `v1` configmaps and namespaces and `newrelic.com/v1` foos.
    Cluster,
    /// Every request fails with an internal server error.
    ServerError,
}

impl ApiServerVerifier {
    pub(crate) fn client(scenario: Scenario) -> Client {
        Self::recording_client(scenario).0
    }

    /// Client whose request uris are recorded in the returned vector.
    pub(crate) fn recording_client(scenario: Scenario) -> (Client, Arc<Mutex<Vec<Uri>>>) {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let requests = Arc::new(Mutex::new(Vec::new()));
        ApiServerVerifier {
            handle,
            requests: requests.clone(),
        }
        .run(scenario);
        (Client::new(mock_service, "default"), requests)
    }

    fn run(mut self, scenario: Scenario) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            while let Some((read, send)) = self.handle.next_request().await {
                self.requests.lock().unwrap().push(read.uri().clone());

                let (status, data) = match scenario {
                    Scenario::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, Self::status(500)),
                    Scenario::Cluster => Self::route(read.uri().path()),
                };

                send.send_response(
                    Response::builder()
                        .status(status)
                        .body(Body::from(serde_json::to_vec(&data).unwrap()))
                        .unwrap(),
                );
            }
        })
    }

    fn route(path: &str) -> (StatusCode, serde_json::Value) {
        let data = match path {
            "/api/v1" => Self::core_api_resources(),
            "/apis/apps/v1" => Self::apps_api_resources(),
            "/apis/newrelic.com/v1" => Self::foo_api_resources(),
            "/apis/apps/v1/namespaces/default/deployments/example" => Self::deployment("example"),
            "/apis/apps/v1/namespaces/default/deployments" => Self::deployment_list(),
            "/apis/apps/v1/deployments" => Self::all_namespaces_deployment_list(),
            "/api/v1/namespaces/kube-system" => Self::namespace("kube-system"),
            "/api/v1/namespaces" => Self::namespace_list(),
            "/apis/newrelic.com/v1/namespaces/default/foos/test-foo" => Self::foo(),
            _ => return (StatusCode::NOT_FOUND, Self::status(404)),
        };
        (StatusCode::OK, data)
    }

    fn status(code: u16) -> serde_json::Value {
        let reason = if code == 404 { "NotFound" } else { "InternalError" };
        json!({
          "kind": "Status",
          "apiVersion": "v1",
          "metadata": {},
          "status": "Failure",
          "message": "the server could not find the requested resource",
          "reason": reason,
          "code": code
        })
    }

    /// generated with kubectl get --raw /api/v1 (simplified)
    fn core_api_resources() -> serde_json::Value {
        json!({
          "kind": "APIResourceList",
          "apiVersion": "v1",
          "groupVersion": "v1",
          "resources": [
            {
              "name": "configmaps",
              "singularName": "configmap",
              "namespaced": true,
              "kind": "ConfigMap",
              "verbs": ["get", "list"]
            },
            {
              "name": "namespaces",
              "singularName": "namespace",
              "namespaced": false,
              "kind": "Namespace",
              "verbs": ["get", "list"]
            }
          ]
        })
    }

    fn apps_api_resources() -> serde_json::Value {
        json!({
          "kind": "APIResourceList",
          "apiVersion": "v1",
          "groupVersion": "apps/v1",
          "resources": [
            {
              "name": "deployments",
              "singularName": "deployment",
              "namespaced": true,
              "kind": "Deployment",
              "verbs": ["get", "list"]
            },
            {
              "name": "deployments/status",
              "singularName": "",
              "namespaced": true,
              "kind": "Deployment",
              "verbs": ["get"]
            }
          ]
        })
    }

    /// generated after CRD creation with kubectl get --raw /apis/newrelic.com/v1
    fn foo_api_resources() -> serde_json::Value {
        json!({
          "kind": "APIResourceList",
          "apiVersion": "v1",
          "groupVersion": "newrelic.com/v1",
          "resources": [
            {
              "name": "foos",
              "singularName": "foo",
              "namespaced": true,
              "kind": "Foo",
              "verbs": ["get", "list"],
              "storageVersionHash": "PhxIpEAAgRo="
            }
          ]
        })
    }

    pub(crate) fn deployment(name: &str) -> serde_json::Value {
        json!({
          "kind": "Deployment",
          "apiVersion": "apps/v1",
          "metadata": {
            "name": name,
            "namespace": "default",
            "resourceVersion": "123456",
            "uid": "unique-deployment-uid",
            "labels": {"app": "nginx"}
          },
          "spec": {
            "replicas": 2,
            "selector": {"matchLabels": {"app": "nginx"}},
            "template": {
              "metadata": {"labels": {"app": "nginx"}},
              "spec": {"containers": [{"name": "nginx", "image": "nginx:1.25"}]}
            }
          }
        })
    }

    fn deployment_list() -> serde_json::Value {
        json!({
          "kind": "DeploymentList",
          "apiVersion": "apps/v1",
          "metadata": {
            "resourceVersion": "123456",
            "continue": ""
          },
          "items": [
            Self::deployment("first"),
            Self::deployment("second"),
            Self::deployment("third")
          ]
        })
    }

    fn all_namespaces_deployment_list() -> serde_json::Value {
        let mut in_other_ns = Self::deployment("other");
        in_other_ns["metadata"]["namespace"] = json!("other");
        json!({
          "kind": "DeploymentList",
          "apiVersion": "apps/v1",
          "metadata": {
            "resourceVersion": "123457",
            "continue": "next-page-token"
          },
          "items": [Self::deployment("first"), in_other_ns]
        })
    }

    fn namespace(name: &str) -> serde_json::Value {
        json!({
          "kind": "Namespace",
          "apiVersion": "v1",
          "metadata": {"name": name, "resourceVersion": "1"},
          "status": {"phase": "Active"}
        })
    }

    fn namespace_list() -> serde_json::Value {
        json!({
          "kind": "NamespaceList",
          "apiVersion": "v1",
          "metadata": {"resourceVersion": "100"},
          "items": [Self::namespace("default"), Self::namespace("kube-system")]
        })
    }

    fn foo() -> serde_json::Value {
        json!({
          "apiVersion": "newrelic.com/v1",
          "kind": "Foo",
          "metadata": {
            "creationTimestamp": "2023-12-11T21:39:38Z",
            "generation": 1,
            "name": "test-foo",
            "namespace": "default",
            "resourceVersion": "286247",
            "uid": "97605c1d-d9a4-4202-897c-b8c8b3a0d227"
          },
          "spec": {
            "data": "test"
          }
        })
    }
}
