use serde_json::Value;

/// Translates between the bytes returned by the api-server and the untyped tree.
pub trait Codec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Value, serde_json::Error>;

    fn encode(&self, tree: &Value) -> Result<Vec<u8>, serde_json::Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    fn encode(&self, tree: &Value) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(tree)
    }
}
