use getset::Getters;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::descriptor::{InputDescriptor, SubmissionRequirement};
use super::format::Format;

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct PresentationDefinition {
    pub id: String,
    pub name: Option<String>,
    pub purpose: Option<String>,
    pub locale: Option<String>,
    pub format: Option<Format>,
    pub frame: Option<serde_json::Value>,
    pub submission_requirements: Option<Vec<SubmissionRequirement>>,
    pub input_descriptors: Vec<InputDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_minimal_definition() {
        let definition: PresentationDefinition = serde_json::from_value(json!({
            "id": "d",
            "input_descriptors": [{
                "id": "a",
                "constraints": {
                    "fields": [{
                        "path": ["$.credentialSubject.degree.type"],
                        "filter": { "const": "BachelorDegree" }
                    }]
                }
            }]
        }))
        .unwrap();
        assert_eq!(definition.id(), "d");
        assert_eq!(definition.input_descriptors().len(), 1);
        assert!(definition.submission_requirements().is_none());
    }
}
