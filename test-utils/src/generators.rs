//! Shared proptest generators for ledger client types.

use ledger_client::StatusCode;
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Generate contract and asset ids.
pub fn id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,32}"
}

/// Generate Java-style binary names.
pub fn binary_name_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{2,8}", "[a-z]{2,8}", "[A-Z][a-zA-Z]{2,12}")
        .prop_map(|(org, pkg, class)| format!("com.{org}.{pkg}.{class}"))
}

/// Generate non-empty byte code.
pub fn byte_code_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..512)
}

/// Generate certificate versions.
pub fn cert_version_strategy() -> impl Strategy<Value = u32> {
    1..=u32::MAX
}

/// Generate flat JSON objects usable as contract arguments.
pub fn json_object_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(
        "[a-z]{1,10}",
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[ -~]{0,20}".prop_map(Value::from),
        ],
        0..6,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

/// Generate any known status code.
pub fn status_code_strategy() -> impl Strategy<Value = StatusCode> {
    prop::sample::select(StatusCode::all().to_vec())
}

/// Generate numeric codes outside the status table.
pub fn unknown_code_strategy() -> impl Strategy<Value = i32> {
    any::<i32>().prop_filter("known status code", |code| {
        StatusCode::from_code(*code).is_none()
    })
}
