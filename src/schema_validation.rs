use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::Error;
use crate::model::PresentationDefinition;

pub const DEFINITION_SCHEMA_V1: &str = include_str!("schema/presentation_definition_v1.json");
pub const DEFINITION_SCHEMA_V2: &str = include_str!("schema/presentation_definition_v2.json");

/// C1: validates a raw definition against schema v1, falling back to v2 on
/// failure, then deserializes it into the typed model. No network: both
/// schemas are static assets embedded at compile time.
pub fn validate_and_parse_definition(raw: &Value) -> Result<PresentationDefinition, Error> {
    let schema_v1: Value = serde_json::from_str(DEFINITION_SCHEMA_V1)?;
    let compiled_v1 =
        JSONSchema::compile(&schema_v1).map_err(|e| Error::InvalidDefinition(format!("internal schema v1: {e}")))?;

    let v1_messages = match compiled_v1.validate(raw) {
        Ok(()) => return parse(raw),
        Err(errors) => errors.map(|e| e.to_string()).collect::<Vec<_>>(),
    };

    let schema_v2: Value = serde_json::from_str(DEFINITION_SCHEMA_V2)?;
    let compiled_v2 =
        JSONSchema::compile(&schema_v2).map_err(|e| Error::InvalidDefinition(format!("internal schema v2: {e}")))?;

    let v2_messages = match compiled_v2.validate(raw) {
        Ok(()) => return parse(raw),
        Err(errors) => errors.map(|e| e.to_string()).collect::<Vec<_>>(),
    };

    Err(Error::InvalidDefinition(format!(
        "v1: {}; v2: {}",
        v1_messages.join(" | "),
        v2_messages.join(" | ")
    )))
}

fn parse(raw: &Value) -> Result<PresentationDefinition, Error> {
    serde_json::from_value(raw.clone()).map_err(|e| Error::InvalidDefinition(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_v2_definition() {
        let raw = json!({
            "id": "d",
            "input_descriptors": [{ "id": "a" }],
        });
        assert!(validate_and_parse_definition(&raw).is_ok());
    }

    #[test]
    fn accepts_v1_definition_with_schema() {
        let raw = json!({
            "id": "d",
            "input_descriptors": [{
                "id": "a",
                "schema": [{ "uri": "https://www.w3.org/2018/credentials#VerifiableCredential" }]
            }]
        });
        assert!(validate_and_parse_definition(&raw).is_ok());
    }

    #[test]
    fn rejects_missing_id() {
        let raw = json!({ "input_descriptors": [] });
        let err = validate_and_parse_definition(&raw).unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition(_)));
    }
}
