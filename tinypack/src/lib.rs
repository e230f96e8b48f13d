//! tinypack - Compact binary packing with string deduplication
//!
//! [`pack`] turns a [`Value`] into bytes in up to two passes. Every string is
//! collected into a deduplicating [`StringDatabase`] while the value is
//! serialized. When the database ends up empty the value bytes are the whole
//! payload. Otherwise the database is serialized on its own and both byte
//! buffers are wrapped in a two-element array envelope.
//!
//! [`unpack`] reverses this, rebuilding the database from the envelope before
//! decoding the value against it. Optional encoder/decoder hooks run on the
//! whole value on either side.
//!
//! ```
//! use tinypack::{pack, unpack, PackOptions, UnpackOptions, Value};
//!
//! let value = Value::object([("name", Value::from("test"))]);
//! let packed = pack(value.clone(), &PackOptions::default()).unwrap();
//! let back: Value = unpack(&packed, &UnpackOptions::default()).unwrap();
//! assert_eq!(back, value);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bridge;
pub mod envelope;
pub mod hooks;
pub mod options;

// Re-export commonly used types
pub use tinypack_codec::{
    BytesCodec, FnLeafCodec, Leaf, LeafCodec, LeafValue, Limits, PackError, Result, SharedCodec,
    StringDatabase, Value,
};

// Re-export our own types
pub use envelope::Envelope;
pub use hooks::Hook;
pub use options::{PackOptions, UnpackOptions};

use tinypack_codec::{deserialize, serialize, Serialized};
use tracing::{debug, trace};

/// Pack a value into bytes
///
/// The encoder hook, if any, runs once on `value` before serialization. The
/// output is the bare value payload when no string was collected, and the
/// serialized `[database, payload]` envelope otherwise. A value that is
/// itself an array of two byte buffers is always framed so it cannot be
/// mistaken for an envelope on the way back.
pub fn pack(value: impl Into<Value>, opts: &PackOptions) -> Result<Vec<u8>> {
    let value = hooks::apply_hook(opts.encoder.as_ref(), value.into())?;
    let ser = opts.serialize_options();

    let Serialized {
        bytes: payload,
        string_database,
    } = serialize(&value, &ser)?;

    if string_database.is_empty() {
        if !Envelope::has_framed_shape(&value) {
            debug!(payload_len = payload.len(), "packed without string database");
            return Ok(payload);
        }
        debug!("value has the envelope shape; framing with an empty string database");
    }

    let database = bridge::encode_database(&string_database, &ser)?;
    trace!(
        strings = string_database.len(),
        database_len = database.len(),
        payload_len = payload.len(),
        "framing envelope"
    );

    let framed = Envelope::framed(database, payload).into_value();
    let packed = serialize(&framed, &ser)?.bytes;
    debug!(packed_len = packed.len(), "packed with string database");
    Ok(packed)
}

/// Unpack bytes produced by [`pack`] into a value
///
/// A framed payload resolves string references against the database it
/// carries, ignoring any database in `opts`. The decoder hook, if any, runs
/// once on the rebuilt value.
pub fn unpack_value(packed: &[u8], opts: &UnpackOptions) -> Result<Value> {
    let de = opts.deserialize_options();
    let outer = deserialize(packed, &de)?;

    let value = match Envelope::inspect(outer) {
        Envelope::Framed { database, payload } => {
            let db = bridge::decode_database(&database, &de)?;
            trace!(
                strings = db.len(),
                payload_len = payload.len(),
                "decoding framed payload"
            );
            deserialize(&payload, &bridge::value_pass_options(&de, db))?
        }
        Envelope::Bare(value) => {
            trace!("decoding bare payload");
            value
        }
    };

    hooks::apply_hook(opts.decoder.as_ref(), value)
}

/// Unpack bytes and convert the result into `T`
///
/// `unpack::<Value>` returns the rebuilt value unchanged. Other targets go
/// through their `TryFrom<Value>` conversion.
pub fn unpack<T>(packed: &[u8], opts: &UnpackOptions) -> Result<T>
where
    T: TryFrom<Value>,
    PackError: From<T::Error>,
{
    let value = unpack_value(packed, opts)?;
    Ok(T::try_from(value)?)
}
