use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use locations_core::contract::ValidationError;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const COLLECTION_SEGMENT: &str = "locations";

/// The subset of an API Gateway REST proxy event the handlers read.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl GatewayRequest {
    pub fn from_event(event: Value) -> Result<Self, ValidationError> {
        if !event.is_object() {
            return Err(ValidationError::new("Request payload must be a JSON object"));
        }
        serde_json::from_value(event)
            .map_err(|error| ValidationError::new(format!("Malformed gateway event: {error}")))
    }

    /// Decodes the request body. A missing or empty body reads as `{}`.
    pub fn json_body(&self) -> Result<Value, ValidationError> {
        match &self.body {
            None | Some(Value::Null) => Ok(Value::Object(Map::new())),
            Some(object @ Value::Object(_)) => Ok(object.clone()),
            Some(Value::String(text)) => {
                let decoded = if self.is_base64_encoded {
                    decode_base64(text)?
                } else {
                    text.clone()
                };
                if decoded.trim().is_empty() {
                    return Ok(Value::Object(Map::new()));
                }
                serde_json::from_str(&decoded).map_err(|error| {
                    ValidationError::new(format!("Malformed request body: {error}"))
                })
            }
            Some(_) => Err(ValidationError::new("Request body must be a JSON object")),
        }
    }

    /// The `{id}` path parameter, falling back to the last path segment of
    /// `/locations/{id}` when the event carries no path parameters.
    pub fn location_id(&self) -> Result<&str, ValidationError> {
        let from_parameters = self
            .path_parameters
            .as_ref()
            .and_then(|parameters| parameters.get("id"))
            .map(String::as_str);
        let from_path = || match split_segments(self.path.as_deref()).as_slice() {
            [collection, id] if *collection == COLLECTION_SEGMENT => Some(*id),
            _ => None,
        };

        from_parameters
            .or_else(from_path)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ValidationError::new("Missing location id"))
    }

    /// Path segments of the resource template, or of the raw path when the
    /// event has no resource.
    pub fn path_segments(&self) -> Vec<&str> {
        split_segments(self.resource.as_deref().or(self.path.as_deref()))
    }
}

fn split_segments(path: Option<&str>) -> Vec<&str> {
    path.unwrap_or_default()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn decode_base64(text: &str) -> Result<String, ValidationError> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|error| ValidationError::new(format!("Malformed request body: {error}")))?;
    String::from_utf8(bytes)
        .map_err(|error| ValidationError::new(format!("Malformed request body: {error}")))
}
