//! Typed request body parsing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::envelope::RequestEnvelope;
use crate::error::HandlerError;

/// Parse the request body as `T`. A missing or blank body reads as `{}`.
pub(crate) fn parse_body<T: DeserializeOwned>(request: &RequestEnvelope) -> Result<T, HandlerError> {
    let raw = match request.body.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => "{}",
    };
    serde_json::from_str(raw)
        .map_err(|e| HandlerError::bad_request(format!("Invalid request body: {e}")))
}

/// Keep a present `null` apart from an absent field.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: absent
/// gives `None`, `null` gives `Some(None)`, a value gives `Some(Some(v))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
