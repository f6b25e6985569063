use kube::config::KubeconfigError;

#[derive(thiserror::Error, Debug)]
pub enum K8sError {
    #[error("it is not possible to create a k8s client: {0}")]
    UnableToSetupClient(String),

    #[error("it is not possible to read kubeconfig: `{0}`")]
    UnableToSetupClientKubeconfig(#[from] KubeconfigError),

    #[error("the kube client returned an error: `{0}`")]
    Generic(#[from] kube::Error),

    #[error("the kind of the object is missing")]
    MissingKind(),

    #[error("the version of the object is missing")]
    MissingVersion(),

    #[error("the name of the object is missing")]
    MissingName(),

    #[error("a namespace is required to get `{0}` since the kind is namespaced")]
    MissingNamespace(String),

    #[error("no resource found in the cluster for `{0}`")]
    UnknownResource(String),

    #[error("scope mismatch for `{gvk}`: {reason}")]
    ScopeMismatch { gvk: String, reason: String },

    #[error("request for `{gvk}` at `{address}` failed: `{source}`")]
    Remote {
        gvk: String,
        address: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to decode the response for `{0}`: `{1}`")]
    Decode(String, #[source] serde_json::Error),

    #[error("failed to convert `{0}` into the destination object: `{1}`")]
    Conversion(String, #[source] serde_json::Error),

    #[error("failed to parse yaml: {0}")]
    FailedToParseYaml(#[from] serde_yaml::Error),
}

impl K8sError {
    /// Status code reported by the api-server, if the error is a remote failure carrying one.
    pub fn remote_status_code(&self) -> Option<u16> {
        match self {
            K8sError::Remote {
                source: kube::Error::Api(response),
                ..
            } => Some(response.code),
            _ => None,
        }
    }
}
