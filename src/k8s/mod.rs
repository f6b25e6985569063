//! Generic read access to any kind served by a Kubernetes api-server.
//!
//! Objects are addressed by the `apiVersion`/`kind` they declare plus their namespace and name.
//! The resource behind each kind is discovered once and cached by [resolver::ResourceClientResolver],
//! the raw responses are decoded by a [codec::Codec] and converted into the caller's types by
//! [converter].

pub use error::K8sError as Error;

pub mod client;
pub mod codec;
pub mod config;
pub mod converter;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod options;
pub mod resolver;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;
