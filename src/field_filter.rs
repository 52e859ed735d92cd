use jsonpath_lib as jsonpath;
use jsonschema::JSONSchema;
use serde_json::Value;

use crate::model::Field;

/// Outcome of evaluating one [`Field`] against one credential document. A
/// filter compile error is raised directly as an [`Error`](crate::Error)
/// rather than folded into this enum as its own variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldStatus {
    Applicable { value: Value, path: String },
    NotApplicable,
}

impl FieldStatus {
    pub fn is_applicable(&self) -> bool {
        matches!(self, FieldStatus::Applicable { .. })
    }
}

/// C3: for one field and one credential document, tries each JSONPath in
/// order; the first candidate that both matches and validates against the
/// field's filter (if any) wins. Returns `Err` only for a structurally
/// invalid filter schema — a value simply failing validation is not an
/// error, it just means that path isn't applicable.
pub fn evaluate_field(field: &Field, document: &Value) -> Result<FieldStatus, String> {
    let compiled = field.filter().as_ref().map(|f| JSONSchema::compile(f).map_err(|e| e.to_string())).transpose()?;

    let mut selector = jsonpath::selector(document);
    for path in field.path() {
        let Ok(matches) = selector(path) else {
            continue;
        };
        for candidate in matches {
            let valid = compiled.as_ref().map(|schema| schema.is_valid(candidate)).unwrap_or(true);
            if valid {
                return Ok(FieldStatus::Applicable {
                    value: candidate.clone(),
                    path: path.clone(),
                });
            }
        }
    }
    Ok(FieldStatus::NotApplicable)
}
