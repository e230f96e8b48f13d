#![no_main]

use libfuzzer_sys::fuzz_target;
use tinypack_codec::{deserialize, with_bytes_codec, DeserializeOptions, StringDatabase};

fuzz_target!(|data: &[u8]| {
    let opts = DeserializeOptions {
        deserializers: with_bytes_codec(&[]),
        string_database: Some(StringDatabase::from_strings(["a", "bb", "ccc"])),
        ..DeserializeOptions::default()
    };
    let _ = deserialize(data, &opts);
});
