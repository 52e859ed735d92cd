use serde_json::Value;

use crate::error::Error;

/// The transient marker the reshaper appends to a credential's `id` so that
/// C8/C9 can tell reshaped-from-original copies apart during set arithmetic,
/// stripped again by the Submission Assembler.
pub const TMP_MARKER: &str = "tmp_unique_id_";

pub fn append_tmp_suffix(id: &str, uuid: &str) -> String {
    format!("{id}{TMP_MARKER}{uuid}")
}

pub fn strip_tmp_suffix(id: &str) -> String {
    match id.find(TMP_MARKER) {
        Some(index) => id[..index].to_string(),
        None => id.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlg {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlg {
    pub fn alg_name(&self) -> &'static str {
        match self {
            HashAlg::Sha256 => "sha-256",
            HashAlg::Sha384 => "sha-384",
            HashAlg::Sha512 => "sha-512",
        }
    }

    pub fn from_alg_name(name: &str) -> Option<Self> {
        match name {
            "sha-256" => Some(HashAlg::Sha256),
            "sha-384" => Some(HashAlg::Sha384),
            "sha-512" => Some(HashAlg::Sha512),
            _ => None,
        }
    }

    /// Digest of a (already base64url-encoded) disclosure string, itself
    /// base64url-encoded — the shape SD-JWT digests are carried in.
    pub fn encoded_digest(&self, disclosure_b64: &str) -> String {
        use sha2::{Digest, Sha256, Sha384, Sha512};
        let bytes: Vec<u8> = match self {
            HashAlg::Sha256 => Sha256::digest(disclosure_b64.as_bytes()).to_vec(),
            HashAlg::Sha384 => Sha384::digest(disclosure_b64.as_bytes()).to_vec(),
            HashAlg::Sha512 => Sha512::digest(disclosure_b64.as_bytes()).to_vec(),
        };
        base64_url::encode(&bytes)
    }
}

/// One SD-JWT disclosure: a base64url-encoded JSON array of either
/// `[salt, value]` (array-entry disclosures) or `[salt, name, value]`
/// (object-property disclosures).
#[derive(Debug, Clone, PartialEq)]
pub struct Disclosure {
    pub raw: String,
    pub salt: String,
    pub name: Option<String>,
    pub value: Value,
}

impl Disclosure {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let decoded = base64_url::decode(raw).map_err(|e| Error::UnmarshalError(e.to_string()))?;
        let parts: Vec<Value> = serde_json::from_slice(&decoded)?;
        match parts.len() {
            2 => Ok(Disclosure {
                raw: raw.to_string(),
                salt: parts[0].as_str().unwrap_or_default().to_string(),
                name: None,
                value: parts[1].clone(),
            }),
            3 => Ok(Disclosure {
                raw: raw.to_string(),
                salt: parts[0].as_str().unwrap_or_default().to_string(),
                name: parts[1].as_str().map(String::from),
                value: parts[2].clone(),
            }),
            _ => Err(Error::UnmarshalError(
                "SD-JWT disclosure must decode to a 2- or 3-element array".to_string(),
            )),
        }
    }

    pub fn digest(&self, alg: HashAlg) -> String {
        alg.encoded_digest(&self.raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SdJwtMeta {
    pub hash_alg: HashAlg,
    pub disclosures: Vec<Disclosure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProofBlock {
    pub type_: String,
    pub value: Value,
}

/// A credential as this crate sees it: a JSON-LD document tree plus whatever
/// metadata the claim-format/selective-disclosure machinery needs. Modeled as
/// a tree once per credential and reused for every field evaluation, rather
/// than round-tripped through a generic map on every filter call.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub document: Value,
    pub jwt: Option<String>,
    pub proofs: Vec<ProofBlock>,
    pub sd_jwt: Option<SdJwtMeta>,
}

impl Credential {
    pub fn from_document(document: Value) -> Result<Self, Error> {
        let proofs = match document.get("proof") {
            Some(Value::Array(items)) => items.iter().filter_map(parse_proof).collect(),
            Some(proof @ Value::Object(_)) => parse_proof(proof).into_iter().collect(),
            _ => Vec::new(),
        };
        let jwt = document.get("jwt").and_then(Value::as_str).map(String::from);
        let sd_jwt = parse_sd_jwt(&document)?;
        Ok(Credential {
            document,
            jwt,
            proofs,
            sd_jwt,
        })
    }

    pub fn id(&self) -> String {
        self.document.get("id").and_then(Value::as_str).unwrap_or_default().to_string()
    }

    pub fn issuer_id(&self) -> Option<String> {
        match self.document.get("issuer") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(map)) => map.get("id").and_then(Value::as_str).map(String::from),
            _ => None,
        }
    }

    pub fn types(&self) -> Vec<String> {
        match self.document.get("type") {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
            _ => Vec::new(),
        }
    }

    pub fn context_entries(&self) -> Vec<String> {
        match self.document.get("@context") {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
            _ => Vec::new(),
        }
    }

    pub fn subject_ids(&self) -> Vec<String> {
        match self.document.get("credentialSubject") {
            Some(Value::Object(map)) => map.get("id").and_then(Value::as_str).map(String::from).into_iter().collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.get("id").and_then(Value::as_str).map(String::from))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_sd_jwt(&self) -> bool {
        self.sd_jwt.is_some()
    }

    pub fn has_proof_type(&self, proof_type: &str) -> bool {
        self.proofs.iter().any(|p| p.type_ == proof_type)
    }
}

fn parse_proof(value: &Value) -> Option<ProofBlock> {
    let type_ = value.get("type").and_then(Value::as_str)?.to_string();
    Some(ProofBlock {
        type_,
        value: value.clone(),
    })
}

/// `sd_jwt_hash_alg` and `sd_jwt_disclosures` are only present on credentials
/// ingested from their SD-JWT form; absent on anything else.
fn parse_sd_jwt(document: &Value) -> Result<Option<SdJwtMeta>, Error> {
    let Some(alg_name) = document.get("sd_jwt_hash_alg").and_then(Value::as_str) else {
        return Ok(None);
    };
    let hash_alg = HashAlg::from_alg_name(alg_name).ok_or_else(|| Error::UnmarshalError(format!("unknown SD-JWT hash algorithm `{alg_name}`")))?;

    let disclosures = match document.get("sd_jwt_disclosures") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                let raw = item
                    .as_str()
                    .ok_or_else(|| Error::UnmarshalError("sd_jwt_disclosures entries must be strings".to_string()))?;
                Disclosure::parse(raw)
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    Ok(Some(SdJwtMeta { hash_alg, disclosures }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tmp_suffix_round_trips() {
        let original = "urn:uuid:abc";
        let suffixed = append_tmp_suffix(original, "deadbeef");
        assert_ne!(suffixed, original);
        assert_eq!(strip_tmp_suffix(&suffixed), original);
        assert_eq!(strip_tmp_suffix(original), original);
    }

    #[test]
    fn reads_issuer_and_subject_from_document() {
        let credential = Credential::from_document(json!({
            "id": "urn:uuid:1",
            "issuer": { "id": "did:example:issuer" },
            "type": ["VerifiableCredential"],
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "credentialSubject": { "id": "did:example:subject" },
        }))
        .unwrap();
        assert_eq!(credential.issuer_id(), Some("did:example:issuer".to_string()));
        assert_eq!(credential.subject_ids(), vec!["did:example:subject".to_string()]);
        assert_eq!(credential.types(), vec!["VerifiableCredential".to_string()]);
    }

    #[test]
    fn parses_proof_block() {
        let credential = Credential::from_document(json!({
            "id": "urn:uuid:1",
            "proof": { "type": "Ed25519Signature2018" },
        }))
        .unwrap();
        assert!(credential.has_proof_type("Ed25519Signature2018"));
    }

    #[test]
    fn disclosure_parses_object_property_triple() {
        let raw = base64_url::encode(br#"["salt123","given_name","John"]"#);
        let disclosure = Disclosure::parse(&raw).unwrap();
        assert_eq!(disclosure.name.as_deref(), Some("given_name"));
        assert_eq!(disclosure.value, json!("John"));
    }

    #[test]
    fn from_document_reads_jwt_compact_form() {
        let credential = Credential::from_document(json!({
            "id": "urn:uuid:1",
            "jwt": "eyJhbGciOiJFUzI1NiJ9.eyJzdWIiOiIxMjMifQ.sig",
        }))
        .unwrap();
        assert_eq!(credential.jwt.as_deref(), Some("eyJhbGciOiJFUzI1NiJ9.eyJzdWIiOiIxMjMifQ.sig"));
    }

    #[test]
    fn from_document_reads_sd_jwt_hash_alg_and_disclosures() {
        let raw = base64_url::encode(br#"["salt123","given_name","John"]"#);
        let credential = Credential::from_document(json!({
            "id": "urn:uuid:1",
            "sd_jwt_hash_alg": "sha-256",
            "sd_jwt_disclosures": [raw],
        }))
        .unwrap();
        assert!(credential.is_sd_jwt());
        let sd_jwt = credential.sd_jwt.unwrap();
        assert_eq!(sd_jwt.hash_alg, HashAlg::Sha256);
        assert_eq!(sd_jwt.disclosures.len(), 1);
        assert_eq!(sd_jwt.disclosures[0].name.as_deref(), Some("given_name"));
    }

    #[test]
    fn from_document_without_sd_jwt_fields_is_not_sd_jwt() {
        let credential = Credential::from_document(json!({ "id": "urn:uuid:1" })).unwrap();
        assert!(!credential.is_sd_jwt());
        assert!(credential.jwt.is_none());
    }
}
