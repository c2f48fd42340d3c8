//! Decision schema returned by the remote service.
//!
//! Wire format:
//! ```json
//! {
//!   "payload": {
//!     "headers":  [{"id": 1, "name": "x-tenant", "service_id": 7, "value": "acme"}],
//!     "rewrites": [{"id": 2, "pattern": "/api/(?P<rest>.*)", "service_id": 7,
//!                   "template": "/{rest}", "weight": 100}]
//!   }
//! }
//! ```
//!
//! Every field is optional and may be `null`, which reads as the field's
//! default. Unknown fields are ignored so the service can grow its schema
//! without breaking older middleware.

use serde::{Deserialize, Deserializer, Serialize};

/// A header to set on the forwarded request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderDirective {
    /// Opaque identifier, passed through untouched.
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Opaque service identifier, passed through untouched.
    #[serde(deserialize_with = "null_as_default")]
    pub service_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

impl HeaderDirective {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }
}

/// A conditional path transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteRule {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// Regular expression, may contain named groups (`(?P<name>...)`).
    #[serde(deserialize_with = "null_as_default")]
    pub pattern: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_id: i64,
    /// Replacement path with `{name}` placeholders.
    #[serde(deserialize_with = "null_as_default")]
    pub template: String,
    /// Priority; higher weights are tried first.
    #[serde(deserialize_with = "null_as_default")]
    pub weight: i64,
}

impl RewriteRule {
    pub fn new(pattern: impl Into<String>, template: impl Into<String>, weight: i64) -> Self {
        Self {
            pattern: pattern.into(),
            template: template.into(),
            weight,
            ..Self::default()
        }
    }
}

/// Headers and rewrite rules that apply to a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Decision {
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<HeaderDirective>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rewrites: Vec<RewriteRule>,
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default, deserialize_with = "null_as_default")]
    payload: Decision,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    payload: &'a Decision,
}

impl Decision {
    /// Decode a response body from the decision service.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        Ok(envelope.payload)
    }

    /// Encode in the wire envelope. Used by mock services in tests and tooling.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&EnvelopeRef { payload: self })
    }
}

/// `null` decodes as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let body = br#"{
            "payload": {
                "headers": [
                    {"id": 1, "name": "header1", "service_id": 1, "value": "value1"},
                    {"id": 2, "name": "header2", "service_id": 2, "value": "value2"}
                ],
                "rewrites": [
                    {"id": 1, "pattern": "/a/(?P<x>.*)", "service_id": 1, "template": "/b/{x}", "weight": 100}
                ]
            }
        }"#;

        let decision = Decision::from_slice(body).unwrap();
        assert_eq!(decision.headers.len(), 2);
        assert_eq!(decision.headers[1].name, "header2");
        assert_eq!(decision.headers[1].service_id, 2);
        assert_eq!(decision.rewrites[0].weight, 100);
        assert_eq!(decision.rewrites[0].template, "/b/{x}");
    }

    #[test]
    fn test_decode_missing_and_null_arrays() {
        let decision = Decision::from_slice(br#"{"payload": {}}"#).unwrap();
        assert_eq!(decision, Decision::default());

        let decision = Decision::from_slice(br#"{"payload": {"headers": null, "rewrites": null}}"#).unwrap();
        assert_eq!(decision, Decision::default());

        let decision = Decision::from_slice(br#"{}"#).unwrap();
        assert_eq!(decision, Decision::default());

        let decision = Decision::from_slice(br#"{"payload": null}"#).unwrap();
        assert_eq!(decision, Decision::default());
    }

    #[test]
    fn test_decode_null_fields_as_defaults() {
        let body = br#"{
            "payload": {
                "headers": [{"id": null, "name": "x-a", "service_id": null, "value": null}],
                "rewrites": [{"id": null, "pattern": "/a", "service_id": null, "template": null, "weight": null}]
            }
        }"#;

        let decision = Decision::from_slice(body).unwrap();
        assert_eq!(decision.headers, vec![HeaderDirective::new("x-a", "")]);
        assert_eq!(decision.rewrites, vec![RewriteRule::new("/a", "", 0)]);
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let body = br#"{
            "version": 3,
            "payload": {
                "message": "hello",
                "headers": [{"name": "x-a", "value": "1", "ttl": 30}]
            }
        }"#;

        let decision = Decision::from_slice(body).unwrap();
        assert_eq!(decision.headers, vec![HeaderDirective::new("x-a", "1")]);
    }

    #[test]
    fn test_decode_rejects_malformed_types() {
        let string_weight = br#"{"payload": {"rewrites": [{"pattern": "/", "template": "/", "weight": "high"}]}}"#;
        assert!(Decision::from_slice(string_weight).is_err());

        let numeric_value = br#"{"payload": {"headers": [{"name": "x-a", "value": 5}]}}"#;
        assert!(Decision::from_slice(numeric_value).is_err());

        assert!(Decision::from_slice(b"").is_err());
        assert!(Decision::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_wire_envelope() {
        let decision = Decision {
            headers: vec![HeaderDirective::new("x-a", "1")],
            rewrites: vec![RewriteRule::new("/a", "/b", 5)],
        };

        let body = decision.to_vec().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["payload"]["headers"][0]["name"], "x-a");
        assert_eq!(value["payload"]["rewrites"][0]["weight"], 5);
        assert_eq!(Decision::from_slice(&body).unwrap(), decision);
    }
}
