use serde_json::{json, Value};

use crate::constraint_filter::MatchedField;
use crate::error::Error;
use crate::model::Credential;

use super::path::{first_segment_is, set_by_path};

/// Plain JSON projection. Starts a skeleton containing only the
/// always-disclosed fields, then writes each matched
/// field's value (or `true`, for predicates) at its original path — except
/// paths that reference `credentialSchema`, which are never rewritten.
pub fn project(credential: &Credential, matched: &[MatchedField]) -> Result<Credential, Error> {
    let document = &credential.document;
    let mut skeleton = json!({
        "id": document.get("id").cloned().unwrap_or(Value::Null),
        "type": document.get("type").cloned().unwrap_or(Value::Null),
        "@context": document.get("@context").cloned().unwrap_or(Value::Null),
        "issuer": document.get("issuer").cloned().unwrap_or(Value::Null),
        "credentialSubject": base_subject(document.get("credentialSubject")),
        "issuanceDate": document.get("issuanceDate").cloned().unwrap_or(Value::Null),
    });

    for field in matched {
        if first_segment_is(&field.path, "credentialSchema") {
            continue;
        }
        let value = if field.predicate { Value::Bool(true) } else { field.value.clone() };
        set_by_path(&mut skeleton, &field.path, value);
    }

    Credential::from_document(skeleton)
}

fn base_subject(subject: Option<&Value>) -> Value {
    match subject {
        Some(Value::Array(subjects)) if subjects.len() == 1 => subject_id_only(&subjects[0]),
        Some(Value::Array(subjects)) => Value::Array(subjects.iter().map(subject_id_only).collect()),
        Some(other) => subject_id_only(other),
        None => Value::Null,
    }
}

fn subject_id_only(subject: &Value) -> Value {
    json!({ "id": subject.get("id").cloned().unwrap_or(Value::Null) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_to_demanded_fields_plus_skeleton() {
        let credential = Credential::from_document(json!({
            "id": "urn:uuid:1",
            "type": ["VerifiableCredential"],
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "issuer": { "id": "did:example:issuer" },
            "credentialSubject": { "id": "did:example:subject", "degree": { "type": "BachelorDegree" }, "givenName": "Jane" },
            "issuanceDate": "2024-01-01T00:00:00Z",
        }))
        .unwrap();

        let matched = vec![MatchedField {
            path: "$.credentialSubject.degree.type".to_string(),
            value: json!("BachelorDegree"),
            predicate: false,
        }];

        let reshaped = project(&credential, &matched).unwrap();
        assert_eq!(
            reshaped.document.get("credentialSubject").unwrap().get("degree").unwrap().get("type").unwrap(),
            "BachelorDegree"
        );
        assert!(reshaped.document.get("credentialSubject").unwrap().get("givenName").is_none());
        assert_eq!(reshaped.document.get("issuer").unwrap().get("id").unwrap(), "did:example:issuer");
    }

    #[test]
    fn predicate_substitutes_boolean_true() {
        let credential = Credential::from_document(json!({
            "id": "urn:uuid:1",
            "credentialSubject": { "id": "did:example:subject", "birthDate": "1990-01-01" },
        }))
        .unwrap();
        let matched = vec![MatchedField {
            path: "$.credentialSubject.birthDate".to_string(),
            value: json!("1990-01-01"),
            predicate: true,
        }];
        let reshaped = project(&credential, &matched).unwrap();
        assert_eq!(reshaped.document.get("credentialSubject").unwrap().get("birthDate").unwrap(), &json!(true));
    }

    #[test]
    fn credential_schema_path_is_never_rewritten() {
        let credential = Credential::from_document(json!({
            "id": "urn:uuid:1",
            "credentialSubject": { "id": "did:example:subject" },
        }))
        .unwrap();
        let matched = vec![MatchedField {
            path: "$.credentialSchema.id".to_string(),
            value: json!("https://example.org/schema"),
            predicate: false,
        }];
        let reshaped = project(&credential, &matched).unwrap();
        assert!(reshaped.document.get("credentialSchema").is_none());
    }
}
