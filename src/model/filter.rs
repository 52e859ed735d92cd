use serde::{Deserialize, Serialize};

/// A JSON-Schema-shaped filter fragment (`type`, `format`, `pattern`, numeric
/// and length bounds, `const`, `enum`, `not`, `contains`, ...). Left as a raw
/// [`serde_json::Value`] and compiled with `jsonschema` at evaluation time,
/// rather than mirrored as a dedicated struct — the filter grammar is a
/// subset of JSON Schema itself, so there is nothing to gain by re-modeling it.
pub type Filter = serde_json::Value;

/// Shared by `Field::predicate`, `Constraints::limit_disclosure` and
/// `Constraints::subject_is_issuer`, all of which take the same two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Required,
    Preferred,
}

impl Directive {
    pub fn is_required(&self) -> bool {
        matches!(self, Directive::Required)
    }
}
