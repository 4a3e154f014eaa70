use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single listing as returned by the API.
///
/// Fields are kept as the raw JSON object; the accessors cover the common
/// scalar lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(Map<String, Value>);

impl Entry {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Integer field, also accepting numbers the API serialises as strings.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        match self.0.get(field)? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Entry {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(default)]
    parameter: Value,
    #[serde(default)]
    bericht: Value,
}

/// Strings are shown bare, other JSON values in their compact form.
fn render_remote_field(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Turns the decoded `Response` envelope into entries, or into
/// [`SearchError::Api`] when the remote side reported an error.
pub fn parse_response(payload: Value) -> Result<Vec<Entry>, SearchError> {
    let mut envelope = match payload {
        Value::Object(mut root) => match root.remove("Response") {
            Some(Value::Object(envelope)) => envelope,
            _ => {
                return Err(SearchError::MalformedResponse(
                    "missing \"Response\" object".to_string(),
                ))
            }
        },
        _ => {
            return Err(SearchError::MalformedResponse(
                "top-level JSON is not an object".to_string(),
            ))
        }
    };

    if let Some(error) = envelope.remove("error") {
        let RemoteError { parameter, bericht } = serde_json::from_value(error)
            .map_err(|err| SearchError::MalformedResponse(format!("unreadable error: {err}")))?;
        return Err(SearchError::Api {
            parameter: render_remote_field(parameter),
            message: render_remote_field(bericht),
        });
    }

    let objects = match envelope.remove("objecten") {
        Some(Value::Object(mut objecten)) => objecten.remove("object"),
        _ => {
            return Err(SearchError::MalformedResponse(
                "missing \"Response.objecten\" object".to_string(),
            ))
        }
    };

    match objects {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(single)) => Ok(vec![Entry(single)]),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(fields) => Ok(Entry(fields)),
                other => Err(SearchError::MalformedResponse(format!(
                    "listing is not an object: {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(SearchError::MalformedResponse(format!(
            "unexpected \"object\" value: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_envelope_becomes_api_error() {
        let payload = json!({
            "Response": {
                "error": { "parameter": "apisleutel", "bericht": "Ongeldige API sleutel" }
            }
        });

        let err = parse_response(payload).expect_err("api error");
        assert_eq!(
            err.to_string(),
            "Error in parameter \"apisleutel\": Ongeldige API sleutel"
        );
        assert!(!err.is_usage_error());
    }

    #[test]
    fn non_string_error_fields_still_yield_api_error() {
        let payload = json!({
            "Response": { "error": { "parameter": 17, "bericht": ["limiet bereikt"] } }
        });

        match parse_response(payload) {
            Err(SearchError::Api { parameter, message }) => {
                assert_eq!(parameter, "17");
                assert_eq!(message, r#"["limiet bereikt"]"#);
            }
            other => panic!("expected api error, got {other:?}"),
        }

        let bare = json!({ "Response": { "error": "onbekend" } });
        assert!(matches!(
            parse_response(bare),
            Err(SearchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn entries_preserve_remote_order() {
        let payload = json!({
            "Response": {
                "objecten": {
                    "object": [
                        { "id": "a1", "prijs": "250000", "plaats": "Utrecht" },
                        { "id": "b2", "prijs": 315000, "plaats": "Zeist" }
                    ]
                }
            }
        });

        let entries = parse_response(payload).expect("entries");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].get_str("id"), Some("a1"));
        assert_eq!(entries[0].get_i64("prijs"), Some(250_000));
        assert_eq!(entries[1].get_i64("prijs"), Some(315_000));
        assert_eq!(entries[1].get_str("plaats"), Some("Zeist"));
    }

    #[test]
    fn empty_or_missing_object_list_yields_no_entries() {
        let empty = json!({ "Response": { "objecten": { "object": [] } } });
        assert!(parse_response(empty).expect("empty list").is_empty());

        let missing = json!({ "Response": { "objecten": {} } });
        assert!(parse_response(missing).expect("no object key").is_empty());
    }

    #[test]
    fn single_object_is_wrapped() {
        let payload = json!({ "Response": { "objecten": { "object": { "id": "only" } } } });
        let entries = parse_response(payload).expect("single entry");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get_str("id"), Some("only"));
    }

    #[test]
    fn malformed_envelopes_are_reported() {
        for payload in [
            json!([]),
            json!({ "response": {} }),
            json!({ "Response": { "status": "ok" } }),
            json!({ "Response": { "objecten": { "object": [1, 2] } } }),
        ] {
            assert!(matches!(
                parse_response(payload),
                Err(SearchError::MalformedResponse(_))
            ));
        }
    }
}
