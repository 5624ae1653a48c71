//! Request/response envelopes shared by every handler.
//!
//! The shapes follow the serverless HTTP trigger contract: camelCase keys,
//! a raw text body, and fixed CORS headers on every response.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

/// Preflight cache lifetime advertised to browsers (24 hours).
pub const PREFLIGHT_MAX_AGE_SECS: u32 = 86_400;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Options,
    Other(String),
}

impl From<String> for HttpMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "OPTIONS" => HttpMethod::Options,
            _ => HttpMethod::Other(raw),
        }
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.to_string()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Other(raw) => raw,
        };
        f.write_str(name)
    }
}

/// Incoming request as delivered by the trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub http_method: HttpMethod,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub query_string_parameters: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RequestEnvelope {
    pub fn new(http_method: HttpMethod) -> Self {
        Self {
            http_method,
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_string_parameters
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Query parameter value. Empty values are treated as absent.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Allowed methods and headers advertised on preflight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorsPolicy {
    pub allow_methods: &'static str,
    pub allow_headers: &'static str,
}

/// Outgoing response in trigger form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ResponseEnvelope {
    /// JSON response with the standard content type and CORS origin.
    pub fn json<T: Serialize>(status_code: u16, payload: &T) -> Self {
        let (status_code, body) = match serde_json::to_string(payload) {
            Ok(body) => (status_code, body),
            Err(e) => {
                tracing::error!("Failed to serialize response: {e}");
                (500, json!({ "error": e.to_string() }).to_string())
            }
        };
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]);
        Self {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status_code: u16, message: &str) -> Self {
        Self::json(status_code, &json!({ "error": message }))
    }

    /// `{"message": message}` with the given status.
    pub fn message(status_code: u16, message: &str) -> Self {
        Self::json(status_code, &json!({ "message": message }))
    }

    /// CORS preflight: 200, empty body.
    pub fn preflight(cors: &CorsPolicy) -> Self {
        let headers = BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            (
                "Access-Control-Allow-Methods".to_string(),
                cors.allow_methods.to_string(),
            ),
            (
                "Access-Control-Allow-Headers".to_string(),
                cors.allow_headers.to_string(),
            ),
            (
                "Access-Control-Max-Age".to_string(),
                PREFLIGHT_MAX_AGE_SECS.to_string(),
            ),
        ]);
        Self {
            status_code: 200,
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    /// Parse the body back into JSON.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
