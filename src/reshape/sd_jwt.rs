use std::collections::HashSet;

use serde_json::Value;

use crate::constraint_filter::MatchedField;
use crate::error::Error;
use crate::model::{Credential, Disclosure, HashAlg, SdJwtMeta};

use super::path::{parse_path, node_at, PathSegment};

const DIGESTS_KEY: &str = "_sd";
const ARRAY_DIGEST_KEY: &str = "...";

/// Materializes the "display credential": recursively substitutes every
/// `_sd`/`...` digest marker with its matching disclosure, so the rest of the
/// pipeline (C3 field evaluation) can run JSONPath over a fully-revealed
/// document exactly as it would for a non-SD-JWT credential.
pub fn disclosed_document(document: &Value, disclosures: &[Disclosure], hash_alg: HashAlg) -> Value {
    match document {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            if let Some(Value::Array(digests)) = map.get(DIGESTS_KEY) {
                for digest in digests.iter().filter_map(Value::as_str) {
                    if let Some(disclosure) = disclosures.iter().find(|d| d.name.is_some() && d.digest(hash_alg) == digest) {
                        out.insert(
                            disclosure.name.clone().unwrap(),
                            disclosed_document(&disclosure.value, disclosures, hash_alg),
                        );
                    }
                }
            }
            for (key, value) in map {
                if key == DIGESTS_KEY || key == "_sd_alg" {
                    continue;
                }
                out.insert(key.clone(), disclosed_document(value, disclosures, hash_alg));
            }
            Value::Object(out)
        }
        Value::Array(items) => {
            let mut out = Vec::new();
            for item in items {
                if let Some(digest) = item.get(ARRAY_DIGEST_KEY).and_then(Value::as_str) {
                    if let Some(disclosure) = disclosures.iter().find(|d| d.name.is_none() && d.digest(hash_alg) == digest) {
                        out.push(disclosed_document(&disclosure.value, disclosures, hash_alg));
                        continue;
                    }
                }
                out.push(disclosed_document(item, disclosures, hash_alg));
            }
            Value::Array(out)
        }
        other => other.clone(),
    }
}

/// SD-JWT pruning. For each matched field's path, looks at the parent
/// object's digest list and keeps only the disclosures
/// whose name matches the leaf key and whose digest is actually present
/// there.
pub fn prune(credential: &Credential, matched: &[MatchedField]) -> Result<Credential, Error> {
    let sd_jwt = credential
        .sd_jwt
        .as_ref()
        .ok_or_else(|| Error::UnmarshalError("credential is not an SD-JWT credential".to_string()))?;

    let mut seen = HashSet::new();
    let mut collected = Vec::new();

    for field in matched {
        let segments = parse_path(&field.path);
        let Some(PathSegment::Key(leaf_key)) = segments.last() else {
            continue;
        };
        let parent_segments = &segments[..segments.len() - 1];
        let Some(parent) = node_at(&credential.document, parent_segments) else {
            continue;
        };
        let Some(Value::Array(digests)) = parent.get(DIGESTS_KEY) else {
            continue;
        };
        for disclosure in &sd_jwt.disclosures {
            if disclosure.name.as_deref() != Some(leaf_key.as_str()) {
                continue;
            }
            let digest = disclosure.digest(sd_jwt.hash_alg);
            if digests.iter().any(|d| d.as_str() == Some(digest.as_str())) && seen.insert(disclosure.raw.clone()) {
                collected.push(disclosure.clone());
            }
        }
    }

    let mut reshaped = credential.clone();
    reshaped.sd_jwt = Some(SdJwtMeta {
        hash_alg: sd_jwt.hash_alg,
        disclosures: collected,
    });
    Ok(reshaped)
}
