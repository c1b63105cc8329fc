// File: src/signals.rs
// Purpose: Live state parsing from the `datastar` query payload

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::request_context::RequestContext;

/// Query parameter carrying client signals on live GET requests
pub const SIGNALS_QUERY_PARAM: &str = "datastar";

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("invalid signal payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("signal payload must be a JSON object")]
    NotAnObject,
}

/// Reads live state from the request, starting from `defaults`
///
/// A missing or blank payload yields `defaults` unchanged. Otherwise the
/// payload object is merged over the serialized defaults, so clients only
/// need to send the signals they changed.
pub fn read_signals<T>(req: &RequestContext, defaults: T) -> Result<T, SignalError>
where
    T: Serialize + DeserializeOwned,
{
    let raw = match req.query.get(SIGNALS_QUERY_PARAM) {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(defaults),
    };

    let incoming: JsonValue = serde_json::from_str(raw)?;
    if !incoming.is_object() {
        return Err(SignalError::NotAnObject);
    }

    let mut merged = serde_json::to_value(&defaults)?;
    merge_json(&mut merged, incoming);
    Ok(serde_json::from_value(merged)?)
}

fn merge_json(target: &mut JsonValue, patch: JsonValue) {
    match (target, patch) {
        (JsonValue::Object(target), JsonValue::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}
