//! String database bridge
//!
//! Moves the string database between the envelope and the value pass: on
//! pack it becomes its own plain-text payload, on unpack it is rebuilt from
//! that payload and handed to the value pass as context.

use tinypack_codec::{
    deserialize_strings, serialize_strings, DeserializeOptions, SerializeOptions,
};
use tinypack_format::{PackError, Result, StringDatabase};

/// Serialize `db` as the envelope's database payload
pub fn encode_database(db: &StringDatabase, opts: &SerializeOptions) -> Result<Vec<u8>> {
    serialize_strings(db, opts)
}

/// Rebuild a string database from the envelope's database payload
pub fn decode_database(bytes: &[u8], opts: &DeserializeOptions) -> Result<StringDatabase> {
    let strings = deserialize_strings(bytes, opts)?;
    let count = strings.len();
    let db = StringDatabase::from_strings(strings);

    // Repeats would shift every later index.
    if db.len() != count {
        return Err(PackError::CorruptPayload(format!(
            "string database holds {} duplicate entries",
            count - db.len()
        )));
    }
    Ok(db)
}

/// Options for the value pass: `base` with the rebuilt database taking precedence
pub fn value_pass_options(base: &DeserializeOptions, db: StringDatabase) -> DeserializeOptions {
    DeserializeOptions {
        string_database: Some(db),
        ..base.clone()
    }
}
