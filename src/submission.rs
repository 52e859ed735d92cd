use std::collections::HashMap;

use getset::Getters;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use serde_with::skip_serializing_none;

use crate::evaluator::DescriptorCredentials;
use crate::model::{strip_tmp_suffix, ClaimFormatDesignation};

const BASE_VP_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
const PRESENTATION_SUBMISSION_CONTEXT_IRI: &str = "https://identity.foundation/presentation-exchange/submission/v1";
const PRESENTATION_SUBMISSION_TYPE: &str = "PresentationSubmission";

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct PresentationSubmission {
    pub id: String,
    pub definition_id: String,
    pub descriptor_map: Vec<InputDescriptorMappingObject>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct InputDescriptorMappingObject {
    pub id: String,
    pub format: ClaimFormatDesignation,
    pub path: String,
    pub path_nested: Option<PathNested>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct PathNested {
    pub id: Option<String>,
    pub format: ClaimFormatDesignation,
    pub path: String,
    pub path_nested: Option<Box<PathNested>>,
}

/// C9: deduplicates accepted credentials by their original (trimmed) id,
/// stably sorts the descriptor map by descriptor id, and wraps the result in
/// a Verifiable Presentation envelope. Within a descriptor bucket only the
/// first accepted credential gets a descriptor-map entry —
/// this crate's C8 may accept more than one credential per descriptor, but
/// the Presentation Submission format itself only ever points at one.
pub fn assemble_presentation(definition_id: &str, vp_format: &str, descriptor_credentials: DescriptorCredentials, fresh_uuid: &mut dyn FnMut() -> String) -> Value {
    let vp_format_tag = ClaimFormatDesignation::from_tag(vp_format).unwrap_or(ClaimFormatDesignation::LdpVp);

    let mut descriptor_ids: Vec<&String> = descriptor_credentials.keys().collect();
    descriptor_ids.sort();

    let mut credentials_out: Vec<Value> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut descriptor_map = Vec::new();

    for descriptor_id in descriptor_ids {
        let Some(credential) = descriptor_credentials.get(descriptor_id).and_then(|creds| creds.first()) else {
            continue;
        };

        let trimmed_id = strip_tmp_suffix(&credential.id());
        let index = *seen.entry(trimmed_id.clone()).or_insert_with(|| {
            let mut document = credential.document.clone();
            if let Some(object) = document.as_object_mut() {
                object.insert("id".to_string(), Value::String(trimmed_id.clone()));
            }
            credentials_out.push(document);
            credentials_out.len() - 1
        });

        let vc_format = if credential.jwt.is_some() {
            ClaimFormatDesignation::JwtVc
        } else {
            ClaimFormatDesignation::LdpVc
        };

        descriptor_map.push(InputDescriptorMappingObject {
            id: descriptor_id.clone(),
            format: vp_format_tag,
            path: "$".to_string(),
            path_nested: Some(PathNested {
                id: Some(descriptor_id.clone()),
                format: vc_format,
                path: format!("$.verifiableCredential[{index}]"),
                path_nested: None,
            }),
        });
    }

    let submission = PresentationSubmission {
        id: fresh_uuid(),
        definition_id: definition_id.to_string(),
        descriptor_map,
    };

    json!({
        "@context": [BASE_VP_CONTEXT, PRESENTATION_SUBMISSION_CONTEXT_IRI],
        "type": ["VerifiablePresentation", PRESENTATION_SUBMISSION_TYPE],
        "verifiableCredential": credentials_out,
        "presentation_submission": submission,
    })
}
