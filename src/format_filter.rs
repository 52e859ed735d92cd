use crate::model::{ClaimFormatDesignation, ClaimFormatProperty, Credential, Format};

/// C5: partitions `credentials` into the six ordered claim-format buckets and
/// returns the first non-empty one, preferring JSON-LD proofs over JWT when a
/// definition accepts both.
pub fn select_format(format: &Format, credentials: &[Credential]) -> (String, Vec<Credential>) {
    for designation in ClaimFormatDesignation::ORDER {
        let Some(property) = format.get(&designation) else {
            continue;
        };
        let matched: Vec<Credential> = credentials
            .iter()
            .filter(|credential| matches_bucket(designation, property, credential))
            .cloned()
            .collect();
        if !matched.is_empty() {
            return (designation.as_tag().to_string(), matched);
        }
    }
    (String::new(), Vec::new())
}

fn matches_bucket(designation: ClaimFormatDesignation, property: &ClaimFormatProperty, credential: &Credential) -> bool {
    match property {
        ClaimFormatProperty::ProofType(types) if designation.is_ldp() => {
            credential.proofs.iter().any(|proof| types.iter().any(|t| t == &proof.type_))
        }
        ClaimFormatProperty::Alg(algs) if !designation.is_ldp() => extract_alg(credential)
            .map(|alg| algs.iter().any(|a| a.eq_ignore_ascii_case(&alg)))
            .unwrap_or(false),
        _ => false,
    }
}

fn extract_alg(credential: &Credential) -> Option<String> {
    let jwt = credential.jwt.as_deref()?;
    match jsonwebtoken::decode_header(jwt) {
        Ok(header) => serde_json::to_value(header.alg).ok().and_then(|v| v.as_str().map(String::from)),
        Err(error) => {
            tracing::warn!(%error, "failed to parse JWT header; skipping credential for format matching");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ldp_credential(proof_type: &str) -> Credential {
        Credential::from_document(json!({
            "id": "urn:uuid:1",
            "proof": { "type": proof_type },
        }))
        .unwrap()
    }

    #[test]
    fn prefers_ldp_over_jwt_when_both_present() {
        let format: Format = serde_json::from_value(json!({
            "ldp_vc": { "proof_type": ["Ed25519Signature2018"] },
            "jwt_vc": { "alg": ["EdDSA"] },
        }))
        .unwrap();
        let credentials = vec![ldp_credential("Ed25519Signature2018")];
        let (tag, matched) = select_format(&format, &credentials);
        assert_eq!(tag, "ldp_vc");
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn empty_when_no_bucket_matches() {
        let format: Format = serde_json::from_value(json!({ "ldp_vc": { "proof_type": ["Ed25519Signature2018"] } })).unwrap();
        let credentials = vec![ldp_credential("BbsBlsSignature2020")];
        let (tag, matched) = select_format(&format, &credentials);
        assert_eq!(tag, "");
        assert!(matched.is_empty());
    }
}
