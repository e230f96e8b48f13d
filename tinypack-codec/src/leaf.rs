//! Leaf codec registry
//!
//! Leaf codecs handle the values the structural walker does not frame on its
//! own: raw byte buffers and caller-defined [`Leaf`](tinypack_format::Leaf)
//! types. On the way out, codecs are asked in list order and the first one
//! that claims a value encodes it. On the way in, the first codec whose id
//! matches the payload decodes it.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tinypack_format::constants::BYTES_CODEC_ID;
use tinypack_format::{PackError, Result, Value};

/// Serializer/deserializer pair for one leaf type
pub trait LeafCodec: Send + Sync {
    /// Wire id written in front of every payload this codec produces
    fn id(&self) -> u64;

    /// Human-readable codec name for diagnostics
    fn name(&self) -> &str;

    /// Encode `value` if this codec claims it, `None` otherwise
    fn encode(&self, value: &Value) -> Option<Result<Vec<u8>>>;

    /// Decode a payload previously produced by [`LeafCodec::encode`]
    fn decode(&self, payload: &[u8]) -> Result<Value>;
}

impl fmt::Debug for dyn LeafCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafCodec")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}

/// Shared, thread-safe codec handle as stored in option records
pub type SharedCodec = Arc<dyn LeafCodec>;

/// Built-in codec for raw byte buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl LeafCodec for BytesCodec {
    fn id(&self) -> u64 {
        BYTES_CODEC_ID
    }

    fn name(&self) -> &str {
        "bytes"
    }

    fn encode(&self, value: &Value) -> Option<Result<Vec<u8>>> {
        value.as_bytes().map(|b| Ok(b.to_vec()))
    }

    fn decode(&self, payload: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(Bytes::copy_from_slice(payload)))
    }
}

type EncodeFn = dyn Fn(&Value) -> Option<Result<Vec<u8>>> + Send + Sync;
type DecodeFn = dyn Fn(&[u8]) -> Result<Value> + Send + Sync;

/// Leaf codec assembled from a pair of closures
pub struct FnLeafCodec {
    id: u64,
    name: String,
    encode: Box<EncodeFn>,
    decode: Box<DecodeFn>,
}

impl FnLeafCodec {
    /// Create a codec from an id, a name and encode/decode closures
    pub fn new<E, D>(id: u64, name: impl Into<String>, encode: E, decode: D) -> Self
    where
        E: Fn(&Value) -> Option<Result<Vec<u8>>> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            id,
            name: name.into(),
            encode: Box::new(encode),
            decode: Box::new(decode),
        }
    }
}

impl LeafCodec for FnLeafCodec {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, value: &Value) -> Option<Result<Vec<u8>>> {
        (self.encode)(value)
    }

    fn decode(&self, payload: &[u8]) -> Result<Value> {
        (self.decode)(payload)
    }
}

/// Caller codecs followed by the built-in byte buffer codec
pub fn with_bytes_codec(codecs: &[SharedCodec]) -> Vec<SharedCodec> {
    let mut out = Vec::with_capacity(codecs.len() + 1);
    out.extend(codecs.iter().cloned());
    out.push(Arc::new(BytesCodec));
    out
}

/// Ask each codec in order; the first claim wins
pub fn encode_leaf(codecs: &[SharedCodec], value: &Value) -> Result<(u64, Vec<u8>)> {
    for codec in codecs {
        if let Some(encoded) = codec.encode(value) {
            return encoded
                .map(|payload| (codec.id(), payload))
                .map_err(|err| codec_failure(codec.as_ref(), err));
        }
    }

    let what = match value.as_leaf() {
        Some(leaf) => format!("no leaf codec claims leaf type '{}'", leaf.type_name()),
        None => format!("no leaf codec claims {} value", value.kind()),
    };
    Err(PackError::Unserializable(what))
}

/// First codec registered under `id`
pub fn find_decoder(codecs: &[SharedCodec], id: u64) -> Result<&dyn LeafCodec> {
    codecs
        .iter()
        .find(|codec| codec.id() == id)
        .map(|codec| codec.as_ref())
        .ok_or(PackError::UnknownLeafCodec(id))
}

/// Decode `payload` with the codec registered under `id`
pub fn decode_leaf(codecs: &[SharedCodec], id: u64, payload: &[u8]) -> Result<Value> {
    let codec = find_decoder(codecs, id)?;
    codec
        .decode(payload)
        .map_err(|err| codec_failure(codec, err))
}

/// Attribute a codec's own error to that codec
fn codec_failure(codec: &dyn LeafCodec, err: PackError) -> PackError {
    match err {
        PackError::LeafCodec { .. } => err,
        other => PackError::LeafCodec {
            codec: codec.name().to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged_codec(id: u64, marker: u8) -> SharedCodec {
        Arc::new(FnLeafCodec::new(
            id,
            format!("marker-{marker}"),
            move |value| value.as_bytes().map(|_| Ok(vec![marker])),
            |payload| Ok(Value::from(payload.to_vec())),
        ))
    }

    #[test]
    fn test_bytes_codec_claims_only_bytes() {
        let codec = BytesCodec;
        assert!(codec.encode(&Value::Int(1)).is_none());
        let payload = codec.encode(&Value::from(vec![1u8, 2, 3])).unwrap().unwrap();
        assert_eq!(payload, vec![1, 2, 3]);
        assert_eq!(codec.decode(&payload).unwrap(), Value::from(vec![1u8, 2, 3]));
    }

    #[test]
    fn test_with_bytes_codec_appends_last() {
        let codecs = with_bytes_codec(&[tagged_codec(40, 7)]);
        assert_eq!(codecs.len(), 2);
        assert_eq!(codecs[0].id(), 40);
        assert_eq!(codecs[1].id(), BYTES_CODEC_ID);

        assert_eq!(with_bytes_codec(&[])[0].name(), "bytes");
    }

    #[test]
    fn test_first_claim_wins() {
        let codecs = with_bytes_codec(&[tagged_codec(40, 7), tagged_codec(41, 9)]);
        let (id, payload) = encode_leaf(&codecs, &Value::from(vec![0u8; 4])).unwrap();
        assert_eq!(id, 40);
        assert_eq!(payload, vec![7]);
    }

    #[test]
    fn test_unclaimed_value_is_unserializable() {
        let err = encode_leaf(&[], &Value::from(vec![1u8])).unwrap_err();
        assert!(matches!(err, PackError::Unserializable(msg) if msg.contains("bytes")));
    }

    #[test]
    fn test_codec_failures_name_the_codec() {
        let strict = FnLeafCodec::new(
            42,
            "strict",
            |value| value.as_bytes().map(|_| Err(PackError::CorruptPayload("too short".into()))),
            |_| Err(PackError::UnexpectedEof),
        );
        let codecs: Vec<SharedCodec> = vec![Arc::new(strict)];

        let err = encode_leaf(&codecs, &Value::from(vec![1u8])).unwrap_err();
        assert!(matches!(
            err,
            PackError::LeafCodec { ref codec, ref message }
                if codec == "strict" && message.contains("too short")
        ));

        let err = decode_leaf(&codecs, 42, &[]).unwrap_err();
        assert!(matches!(err, PackError::LeafCodec { ref codec, .. } if codec == "strict"));

        assert!(matches!(
            decode_leaf(&codecs, 7, &[]),
            Err(PackError::UnknownLeafCodec(7))
        ));
    }

    #[test]
    fn test_find_decoder_by_id() {
        let codecs = with_bytes_codec(&[tagged_codec(40, 7)]);
        assert_eq!(find_decoder(&codecs, BYTES_CODEC_ID).unwrap().name(), "bytes");
        assert!(matches!(
            find_decoder(&codecs, 99),
            Err(PackError::UnknownLeafCodec(99))
        ));
    }
}
