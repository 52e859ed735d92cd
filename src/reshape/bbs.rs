use rand::RngCore;
use serde_json::Value;

use crate::constraint_filter::MatchedField;
use crate::error::Error;
use crate::model::Credential;

use super::path::parse_path;

/// The external BBS+ selective-disclosure collaborator. No default
/// implementation ships — deriving a real BBS+ proof needs a real signer;
/// callers wire in one backed by, e.g., the `zkryptium`/`bbsplus` crates.
pub trait BbsDeriver {
    fn derive(&self, credential: &Value, reveal_document: &Value, nonce: &[u8]) -> Result<Value, Error>;
}

const NONCE_LEN: usize = 32;

/// BBS+ derivation. Builds a reveal document that marks the root and every
/// constraint-referenced node `@explicit: true`,
/// copying `type`/`@context` onto the leaf nodes actually being revealed, then
/// hands it to the external deriver with a fresh nonce.
pub fn derive(credential: &Credential, matched: &[MatchedField], deriver: &dyn BbsDeriver) -> Result<Credential, Error> {
    let mut reveal_document = credential.document.clone();
    mark_explicit(&mut reveal_document, &[]);

    for field in matched {
        let segments = parse_path(&field.path);
        for depth in 1..=segments.len() {
            mark_explicit(&mut reveal_document, &segments[..depth]);
        }
        if let Some(node) = mutable_node_at(&mut reveal_document, &segments) {
            if let Some(original) = mutable_node_at_immutable(&credential.document, &segments) {
                if let Some(type_) = original.get("type") {
                    insert(node, "type", type_.clone());
                }
                if let Some(context) = original.get("@context") {
                    insert(node, "@context", context.clone());
                }
            }
        }
    }

    let mut nonce = vec![0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let derived = deriver
        .derive(&credential.document, &reveal_document, &nonce)
        .map_err(|e| Error::BbsDeriveFailed(e.to_string()))?;

    Credential::from_document(derived)
}

fn mark_explicit(node: &mut Value, segments: &[crate::reshape::path::PathSegment]) {
    if let Some(target) = mutable_node_at(node, segments) {
        insert(target, "@explicit", Value::Bool(true));
    }
}

fn insert(node: &mut Value, key: &str, value: Value) {
    if !node.is_object() {
        *node = Value::Object(Default::default());
    }
    node.as_object_mut().unwrap().insert(key.to_string(), value);
}

fn mutable_node_at<'a>(root: &'a mut Value, segments: &[crate::reshape::path::PathSegment]) -> Option<&'a mut Value> {
    let mut node = root;
    for segment in segments {
        node = match segment {
            crate::reshape::path::PathSegment::Key(key) => node.get_mut(key)?,
            crate::reshape::path::PathSegment::Index(index) => node.get_mut(index)?,
        };
    }
    Some(node)
}

fn mutable_node_at_immutable<'a>(root: &'a Value, segments: &[crate::reshape::path::PathSegment]) -> Option<&'a Value> {
    super::path::node_at(root, segments)
}
