//! Shared payload types threaded between pipeline steps.

use std::collections::HashMap;

use serde_json::Value;

/// The mapping-typed data passed between tools in a pipeline run.
///
/// Each step receives a payload, produces a new payload, and never mutates
/// its input in place; ownership of the "current" payload transfers from
/// step to step inside the executor.
pub type Payload = HashMap<String, Value>;

/// Shallow-merge `overrides` onto a copy of `base`.
///
/// Keys present in `overrides` win on collision. Neither input is mutated.
pub fn merge_payloads(base: &Payload, overrides: &Payload) -> Payload {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
