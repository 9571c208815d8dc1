use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Lambda proxy integration response understood by API Gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    /// Parses the body back into JSON. An empty body reads as `null`.
    pub fn json_body(&self) -> serde_json::Result<Value> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
    }
}

pub fn format_response(status_code: u16, payload: impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(&payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: default_headers(),
            body,
        },
        Err(error) => {
            tracing::error!(%error, status_code, "Failed to serialize response body");
            error_response(500, "Internal server error")
        }
    }
}

pub fn error_response(status_code: u16, message: &str) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: default_headers(),
        body: json!({ "error": message }).to_string(),
    }
}

pub fn empty_response(status_code: u16) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: default_headers(),
        body: String::new(),
    }
}

pub fn preflight_response() -> ApiGatewayResponse {
    let mut response = empty_response(204);
    response.headers["Access-Control-Allow-Methods"] = json!("GET,POST,PUT,DELETE,OPTIONS");
    response.headers["Access-Control-Allow-Headers"] = json!("*");
    response
}

fn default_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
    })
}

#[cfg(test)]
mod tests {
    use locations_core::coordinate::Coordinate;

    use super::*;

    #[test]
    fn every_response_carries_json_and_cors_headers() {
        for response in [
            format_response(200, json!([])),
            error_response(404, "Location not found"),
            empty_response(204),
        ] {
            assert_eq!(response.headers["Content-Type"], "application/json");
            assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        }
    }

    #[test]
    fn error_body_has_single_error_field() {
        let response = error_response(400, "Missing required fields");
        assert_eq!(response.body, r#"{"error":"Missing required fields"}"#);
    }

    #[test]
    fn coordinates_are_written_without_float_rounding() {
        let coordinate = Coordinate::parse("40.712776000000000001").expect("coordinate");
        let response = format_response(200, json!({ "latitude": coordinate }));
        assert_eq!(response.body, r#"{"latitude":40.712776000000000001}"#);
    }

    #[test]
    fn serializes_with_gateway_field_names() {
        let value = serde_json::to_value(empty_response(204)).expect("serialize");
        assert_eq!(value["statusCode"], 204);
        assert_eq!(value["body"], "");
    }

    #[test]
    fn preflight_lists_allowed_methods() {
        let response = preflight_response();
        assert_eq!(response.status_code, 204);
        assert_eq!(
            response.headers["Access-Control-Allow-Methods"],
            "GET,POST,PUT,DELETE,OPTIONS"
        );
    }
}
