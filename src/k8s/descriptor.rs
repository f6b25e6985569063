//! Identification of the objects handled by the client.
//!
//! Any type used as a destination for `get` exposes its declared `apiVersion`/`kind` and its
//! metadata through [Descriptor]. The triple used to resolve the resource is always taken from the
//! destination itself, never from previous calls.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Node, Pod, Secret, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use kube::core::{DynamicObject, GroupVersionKind, ObjectMeta, TypeMeta};
use std::fmt::{Display, Formatter};

use super::error::K8sError;

const LIST_KIND_SUFFIX: &str = "List";

/// Exposes the type and object metadata of an object.
pub trait Descriptor {
    /// Declared `apiVersion` and `kind`, if any.
    fn type_meta(&self) -> Option<TypeMeta>;

    fn object_meta(&self) -> &ObjectMeta;
}

impl Descriptor for DynamicObject {
    fn type_meta(&self) -> Option<TypeMeta> {
        self.types.clone()
    }

    fn object_meta(&self) -> &ObjectMeta {
        &self.metadata
    }
}

/// Implements [Descriptor] for types whose `apiVersion` and `kind` are known statically through
/// [kube::Resource], such as the k8s-openapi types or the ones generated with `CustomResource`.
///
/// ```ignore
/// k8s_dynamic_reader::impl_descriptor!(my_crate::Foo, my_crate::Bar);
/// ```
#[macro_export]
macro_rules! impl_descriptor {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::k8s::descriptor::Descriptor for $ty {
                fn type_meta(&self) -> Option<::kube::core::TypeMeta> {
                    Some(::kube::core::TypeMeta {
                        api_version: <$ty as ::kube::Resource>::api_version(&()).to_string(),
                        kind: <$ty as ::kube::Resource>::kind(&()).to_string(),
                    })
                }

                fn object_meta(&self) -> &::kube::core::ObjectMeta {
                    <$ty as ::kube::Resource>::meta(self)
                }
            }
        )+
    };
}

impl_descriptor!(
    Deployment,
    DaemonSet,
    StatefulSet,
    ReplicaSet,
    Pod,
    ConfigMap,
    Secret,
    Service,
    Namespace,
    Node,
);

/// Namespace and name of a single object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAddress {
    pub namespace: Option<String>,
    pub name: String,
}

impl Display for ObjectAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Destination of a list call.
///
/// `types` declares the kind of the items, either as the item kind (`Deployment`) or as the list
/// kind (`DeploymentList`). `metadata` is filled from the response and carries the continuation
/// token for the next page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList<K> {
    pub types: Option<TypeMeta>,
    pub metadata: ListMeta,
    pub items: Vec<K>,
}

impl<K> Default for ResourceList<K> {
    fn default() -> Self {
        Self {
            types: None,
            metadata: ListMeta::default(),
            items: Vec::new(),
        }
    }
}

impl<K> ResourceList<K> {
    pub fn new(types: TypeMeta) -> Self {
        Self {
            types: Some(types),
            ..Self::default()
        }
    }

    pub fn from_gvk(gvk: &GroupVersionKind) -> Self {
        Self::new(TypeMeta {
            api_version: gvk.api_version(),
            kind: gvk.kind.clone(),
        })
    }

    /// Token to request the next page, `None` when the response was complete.
    pub fn continue_token(&self) -> Option<&str> {
        self.metadata.continue_.as_deref().filter(|t| !t.is_empty())
    }

    pub fn resource_version(&self) -> Option<&str> {
        self.metadata.resource_version.as_deref()
    }
}

impl<K> ResourceList<K>
where
    K: kube::Resource<DynamicType = ()>,
{
    /// List destination for a statically typed resource.
    pub fn for_resource() -> Self {
        Self::new(TypeMeta {
            api_version: K::api_version(&()).to_string(),
            kind: K::kind(&()).to_string(),
        })
    }
}

/// Builds the triple from the declared type meta.
///
/// `apiVersion` is either `group/version` or a bare `version` for the core group.
pub fn get_gvk(types: Option<&TypeMeta>) -> Result<GroupVersionKind, K8sError> {
    let types = types.ok_or(K8sError::MissingKind())?;
    if types.kind.is_empty() {
        return Err(K8sError::MissingKind());
    }

    let (group, version) = types
        .api_version
        .split_once('/')
        .unwrap_or(("", types.api_version.as_str()));
    if version.is_empty() {
        return Err(K8sError::MissingVersion());
    }

    Ok(GroupVersionKind::gvk(group, version, &types.kind))
}

/// Triple declared by a list destination, as is.
pub fn get_list_gvk<K>(list: &ResourceList<K>) -> Result<GroupVersionKind, K8sError> {
    get_gvk(list.types.as_ref())
}

/// Item triple of a list kind (`FooList` gives `Foo`), `None` if the kind has no `List` suffix
/// or is the bare suffix.
pub fn list_item_gvk(gvk: &GroupVersionKind) -> Option<GroupVersionKind> {
    gvk.kind
        .strip_suffix(LIST_KIND_SUFFIX)
        .filter(|k| !k.is_empty())
        .map(|item_kind| GroupVersionKind::gvk(&gvk.group, &gvk.version, item_kind))
}

pub fn get_name<D: Descriptor + ?Sized>(obj: &D) -> Result<String, K8sError> {
    obj.object_meta()
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .ok_or(K8sError::MissingName())
}

/// Namespace of the object, an empty namespace is considered as not set.
pub fn get_namespace<D: Descriptor + ?Sized>(obj: &D) -> Option<String> {
    obj.object_meta()
        .namespace
        .clone()
        .filter(|ns| !ns.is_empty())
}

pub fn get_address<D: Descriptor + ?Sized>(obj: &D) -> Result<ObjectAddress, K8sError> {
    Ok(ObjectAddress {
        namespace: get_namespace(obj),
        name: get_name(obj)?,
    })
}

pub(crate) fn gvk_to_string(gvk: &GroupVersionKind) -> String {
    format!("{}/{}", gvk.api_version(), gvk.kind)
}
