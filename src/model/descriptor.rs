use getset::Getters;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::constraints::Constraints;
use super::format::Format;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct SchemaEntry {
    pub uri: String,
    #[serde(default)]
    pub required: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct InputDescriptor {
    pub id: String,
    pub name: Option<String>,
    pub purpose: Option<String>,
    pub group: Option<Vec<String>>,
    pub schema: Option<Vec<SchemaEntry>>,
    #[serde(default)]
    pub constraints: Constraints,
    pub format: Option<Format>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    All,
    Pick,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct SubmissionRequirement {
    pub rule: Rule,
    pub count: Option<usize>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub from: Option<String>,
    pub from_nested: Option<Vec<SubmissionRequirement>>,
    pub name: Option<String>,
    pub purpose: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_input_descriptor() {
        let descriptor: InputDescriptor = serde_json::from_value(json!({
            "id": "a",
            "group": ["A"],
            "constraints": {
                "fields": [{ "path": ["$.credentialSubject.degree.type"] }]
            }
        }))
        .unwrap();
        assert_eq!(descriptor.id(), "a");
        assert_eq!(descriptor.group(), &Some(vec!["A".to_string()]));
        assert_eq!(descriptor.constraints().fields().len(), 1);
    }

    #[test]
    fn submission_requirement_from_xor_from_nested() {
        let req: SubmissionRequirement = serde_json::from_value(json!({
            "rule": "pick",
            "count": 1,
            "from_nested": [
                { "rule": "all", "from": "A" },
                { "rule": "all", "from": "B" },
            ]
        }))
        .unwrap();
        assert_eq!(req.rule(), &Rule::Pick);
        assert!(req.from().is_none());
        assert_eq!(req.from_nested().as_ref().unwrap().len(), 2);
    }
}
