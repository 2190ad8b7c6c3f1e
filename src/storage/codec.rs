//! Record encoding.
//!
//! An object is stored as the compact JSON encoding of the value itself:
//! no envelope, no metadata. Any field the object's `Serialize` impl skips
//! is lost on the way back.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::error::StoreResult;

/// serialize an object into record bytes
pub fn encode<T: Serialize + ?Sized>(value: &T) -> StoreResult<Vec<u8>> {
    let bytes = serde_json::to_vec(value)?;
    Ok(bytes)
}

/// deserialize record bytes into a fresh value
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    let value = serde_json::from_slice(bytes)?;
    Ok(value)
}

/// deserialize record bytes into `out`
///
/// `out` is only overwritten once decoding has fully succeeded.
pub fn decode_into<T: DeserializeOwned>(bytes: &[u8], out: &mut T) -> StoreResult<()> {
    *out = decode(bytes)?;
    Ok(())
}
