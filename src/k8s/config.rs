use duration_str::deserialize_duration;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::error::K8sError;

/// Same as upstream kube-rs default client timeout (read/write). The access layer doesn't add any
/// timeout on its own, this one is only applied to the underlying transport.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(295);

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// The maximum duration the transport will wait for a response from the api-server.
    #[serde(default)]
    pub client_timeout: ClientTimeout,

    /// Overrides the default namespace of the loaded kube config.
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ClientTimeout(#[serde(deserialize_with = "deserialize_duration")] Duration);

impl Default for ClientTimeout {
    fn default() -> Self {
        Self(DEFAULT_CLIENT_TIMEOUT)
    }
}

impl From<ClientTimeout> for Duration {
    fn from(value: ClientTimeout) -> Self {
        value.0
    }
}

impl From<Duration> for ClientTimeout {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(content: &str) -> Result<Self, K8sError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, K8sError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            K8sError::UnableToSetupClient(format!(
                "reading client config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Applies the settings to the kube config used to build the client.
    pub fn apply_to(&self, config: &mut kube::Config) {
        config.read_timeout = Some(self.client_timeout.into());
        config.write_timeout = Some(self.client_timeout.into());
        if let Some(namespace) = self.namespace.as_ref().filter(|ns| !ns.is_empty()) {
            config.default_namespace = namespace.clone();
        }
    }
}
