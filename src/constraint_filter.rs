use serde_json::Value;

use crate::error::Error;
use crate::field_filter::{evaluate_field, FieldStatus};
use crate::model::{append_tmp_suffix, Credential, Directive, InputDescriptor};
use crate::reshape::sd_jwt::disclosed_document;
use crate::reshape::{reshape, BbsDeriver};

/// One field that matched during C4's evaluation loop, carrying exactly what
/// C7 needs to reshape the credential: the path it matched at, the value (or
/// the actual value even under a predicate — C7 decides whether to keep or
/// replace it), and whether a predicate substitution applies.
#[derive(Debug, Clone)]
pub struct MatchedField {
    pub path: String,
    pub value: Value,
    pub predicate: bool,
}

/// C4: evaluates one credential against one descriptor's constraints.
/// `commit` distinguishes Create-Presentation (performs the C7 reshape and
/// appends the transient id suffix) from Match-Requirements (introspection
/// only — constraints are still evaluated, but nothing is rewritten).
#[allow(clippy::too_many_arguments)]
pub fn filter_credential(
    descriptor: &InputDescriptor,
    credential: &Credential,
    commit: bool,
    bbs_deriver: Option<&dyn BbsDeriver>,
    fresh_uuid: &mut dyn FnMut() -> String,
) -> Result<Option<Credential>, Error> {
    let constraints = descriptor.constraints();

    if constraints.subject_is_issuer() == &Some(Directive::Required) {
        let issuer = credential.issuer_id();
        if !credential.subject_ids().iter().any(|subject| Some(subject) == issuer.as_ref()) {
            return Ok(None);
        }
    }

    let working_document = if let Some(sd_jwt) = &credential.sd_jwt {
        disclosed_document(&credential.document, &sd_jwt.disclosures, sd_jwt.hash_alg)
    } else {
        credential.document.clone()
    };

    let mut matched = Vec::with_capacity(constraints.fields().len());
    for (index, field) in constraints.fields().iter().enumerate() {
        match evaluate_field(field, &working_document) {
            Ok(FieldStatus::Applicable { value, path }) => {
                matched.push(MatchedField {
                    path,
                    value,
                    predicate: field.predicate() == &Some(Directive::Required),
                });
            }
            Ok(FieldStatus::NotApplicable) => return Ok(None),
            Err(source) => return Err(Error::FilterError { index, source }),
        }
    }

    if !commit {
        return Ok(Some(credential.clone()));
    }

    let limit_disclosure = *constraints.limit_disclosure();
    let predicate_mode = matched.iter().any(|field| field.predicate);

    let mut reshaped = if credential.is_sd_jwt() {
        if limit_disclosure == Some(Directive::Required) {
            crate::reshape::sd_jwt::prune(credential, &matched)?
        } else {
            credential.clone()
        }
    } else if limit_disclosure == Some(Directive::Required) || predicate_mode {
        reshape(credential, limit_disclosure, &matched, bbs_deriver)?
    } else {
        credential.clone()
    };

    let suffixed_id = append_tmp_suffix(&reshaped.id(), &fresh_uuid());
    if let Some(object) = reshaped.document.as_object_mut() {
        object.insert("id".to_string(), Value::String(suffixed_id));
    }

    Ok(Some(reshaped))
}
