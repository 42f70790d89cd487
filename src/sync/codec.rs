//! Binary codec for stored-document serialization.
//!
//! Every body handed to a store passes through [`encode`] on the way in and
//! [`decode`] on the way out. Centralizing the round trip does two things:
//! the in-memory store gets the value semantics of a remote database (what
//! you read back is a copy, never a shared alias), and every implementation
//! agrees on one deterministic byte layout.
//!
//! Bincode's error types are opaque by design, so failures are folded into
//! [`ScorebookError::SerializationError`] with the stringified cause.
//!
//! [`ScorebookError::SerializationError`]: crate::ScorebookError::SerializationError

use serde::{de::DeserializeOwned, Serialize};

use crate::{ScorebookError, ScorebookResult};

/// The bincode configuration used for every stored document.
///
/// Fixed-width integer encoding keeps a value's byte length independent of
/// its magnitude, so document sizes are stable as scores and stamps grow.
fn config() -> impl bincode::config::Config {
    bincode::config::standard().with_fixed_int_encoding()
}

/// Encodes a value into a fresh byte vector.
///
/// # Errors
///
/// Returns [`ScorebookError::SerializationError`] when bincode rejects the
/// value.
///
/// # Examples
///
/// ```
/// use scorebook::sync::codec::{decode, encode};
///
/// let original: u32 = 42;
/// let bytes = encode(&original)?;
/// let decoded: u32 = decode(&bytes)?;
/// assert_eq!(original, decoded);
/// # Ok::<(), scorebook::ScorebookError>(())
/// ```
pub fn encode<V>(value: &V) -> ScorebookResult<Vec<u8>>
where
    V: Serialize,
{
    bincode::serde::encode_to_vec(value, config()).map_err(|e| {
        ScorebookError::SerializationError {
            context: format!("encoding document body: {e}"),
        }
    })
}

/// Decodes a value from bytes produced by [`encode`].
///
/// Trailing bytes are ignored; documents are stored whole, so a partial
/// read indicates nothing here.
///
/// # Errors
///
/// Returns [`ScorebookError::SerializationError`] when the bytes do not
/// decode as a `V`.
pub fn decode<V>(bytes: &[u8]) -> ScorebookResult<V>
where
    V: DeserializeOwned,
{
    bincode::serde::decode_from_slice(bytes, config())
        .map(|(value, _consumed)| value)
        .map_err(|e| ScorebookError::SerializationError {
            context: format!("decoding document body: {e}"),
        })
}

// ###################
// # UNIT TESTS      #
// ###################
