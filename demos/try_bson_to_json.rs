//! Run with:
//!
//! ```not_rust
//! cargo run --example try_bson_to_json
//! ```
use bson2json::try_bson_to_json;

fn main() {
    // {"spam": "eggs"}
    let input = b"\x14\x00\x00\x00\x02spam\x00\x05\x00\x00\x00eggs\x00\x00";

    let result = try_bson_to_json(input).unwrap();

    assert_eq!(result, "{\n  \"spam\": \"eggs\"\n}\n");
}
