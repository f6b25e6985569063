//! Read-only access to arbitrary Kubernetes objects.
//!
//! [k8s::client::AsyncK8sClient] (and its blocking counterpart [k8s::client::SyncK8sClient])
//! fetch a single object or a collection of any built-in or custom kind into typed or dynamic
//! destinations, without per-kind client code.

pub mod k8s;
pub mod logging;
