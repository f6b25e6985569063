//! Conversion between the untyped tree returned by the api-server and the destination objects.
//!
//! The copy is driven by the serde shape of the destination: tree fields without a counterpart are
//! ignored, and destination fields missing in the tree keep the default the type declares for them
//! (k8s-openapi types declare every optional field as `Option`, custom types should use
//! `#[serde(default)]`). Field names follow the api-server camelCase convention, which is what
//! `#[serde(rename_all = "camelCase")]` types and k8s-openapi types expect.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::descriptor::ResourceList;

const ITEMS_FIELD: &str = "items";
const METADATA_FIELD: &str = "metadata";

/// Replaces `dest` with the object described by `tree`.
///
/// On error `dest` is left untouched.
pub fn into_typed<K>(tree: Value, dest: &mut K) -> Result<(), serde_json::Error>
where
    K: DeserializeOwned,
{
    *dest = serde_json::from_value(tree)?;
    Ok(())
}

/// Fills the items and list metadata of `dest` from a list response, keeping the response order.
///
/// A missing or `null` items field is an empty list. Items are converted before touching `dest`,
/// so a failure on any item leaves `dest` as it was.
pub fn into_typed_list<K>(mut tree: Value, dest: &mut ResourceList<K>) -> Result<(), serde_json::Error>
where
    K: DeserializeOwned,
{
    let items = match tree.get_mut(ITEMS_FIELD).map(Value::take) {
        None | Some(Value::Null) => Vec::new(),
        Some(items) => serde_json::from_value::<Vec<K>>(items)?,
    };
    let metadata = match tree.get_mut(METADATA_FIELD).map(Value::take) {
        None | Some(Value::Null) => Default::default(),
        Some(metadata) => serde_json::from_value(metadata)?,
    };

    dest.items = items;
    dest.metadata = metadata;
    Ok(())
}

/// Inverse of [into_typed], used to hand list elements or fetched objects back as trees.
pub fn from_typed<K>(obj: &K) -> Result<Value, serde_json::Error>
where
    K: Serialize,
{
    serde_json::to_value(obj)
}
