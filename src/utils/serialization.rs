// Byte-level codec for blocks and transactions. Encode/decode errors
// convert into BlockchainError::Serialization at the error module's
// From impls, so callers only see the crate's Result.
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Encode a value with bincode's standard configuration.
pub fn serialize<T: Serialize + bincode::Encode>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::encode_to_vec(value, bincode::config::standard())?)
}

/// Decode a value with bincode's standard configuration. Trailing bytes
/// after the value are ignored.
pub fn deserialize<T>(bytes: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de> + bincode::Decode<()>,
{
    let (value, _) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}
