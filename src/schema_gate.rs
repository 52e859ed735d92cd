use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::error::Error;
use crate::model::{Credential, InputDescriptor};

/// The external JSON-LD document loader collaborator. Returns `Ok(None)` for
/// a URI with no known document, distinct from a hard load failure.
pub trait ContextLoader {
    fn load(&self, uri: &str) -> Result<Option<Value>, Error>;
}

/// In-memory default implementation, the `ContextLoader` analogue of the
/// static schema assets C1 embeds for its own use — useful for tests and for
/// callers without a live JSON-LD context cache.
#[derive(Debug, Default, Clone)]
pub struct StaticContextLoader(HashMap<String, Value>);

impl StaticContextLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, document: Value) -> &mut Self {
        self.0.insert(uri.into(), document);
        self
    }
}

impl ContextLoader for StaticContextLoader {
    fn load(&self, uri: &str) -> Result<Option<Value>, Error> {
        Ok(self.0.get(uri).cloned())
    }
}

/// Whether a single failed context load should reject the whole schema-gate
/// decision or only skip that context. Configurable rather than hardcoded,
/// since source implementations of this gate disagree on the answer.
#[derive(Debug, Clone, Copy)]
pub struct SchemaGateConfig {
    pub reject_on_context_error: bool,
}

impl Default for SchemaGateConfig {
    fn default() -> Self {
        SchemaGateConfig {
            reject_on_context_error: true,
        }
    }
}

/// Per-invocation memoization of contexts by URI. Does not outlive the call.
pub type SchemaCache = RefCell<HashMap<String, Option<Value>>>;

/// C6: applies only when `descriptor.schema` is set. Walks the credential's
/// `@context` entries, resolves each credential `type` through the loaded
/// context document, and checks the descriptor's schema entries against the
/// resolved IRIs.
pub fn passes_schema_gate(
    descriptor: &InputDescriptor,
    credential: &Credential,
    loader: &dyn ContextLoader,
    config: &SchemaGateConfig,
    cache: &SchemaCache,
) -> Result<bool, Error> {
    let Some(schemas) = descriptor.schema() else {
        return Ok(true);
    };

    let mut resolved_iris: HashSet<String> = HashSet::new();
    for context_uri in credential.context_entries() {
        let uri = context_uri.split('#').next().unwrap_or(&context_uri).to_string();
        let document = {
            let mut cache = cache.borrow_mut();
            if let Some(cached) = cache.get(&uri) {
                cached.clone()
            } else {
                let loaded = match loader.load(&uri) {
                    Ok(document) => document,
                    Err(error) => {
                        tracing::warn!(%uri, %error, "failed to load JSON-LD context");
                        if config.reject_on_context_error {
                            return Ok(false);
                        }
                        None
                    }
                };
                cache.insert(uri.clone(), loaded.clone());
                loaded
            }
        };
        let Some(document) = document else {
            if config.reject_on_context_error {
                return Ok(false);
            }
            continue;
        };
        for type_name in credential.types() {
            resolved_iris.extend(resolve_term_iris(&document, &type_name));
        }
    }

    let mut required_ok = true;
    let mut any_matched = false;
    for schema in schemas {
        let matched = resolved_iris.contains(schema.uri());
        if matched {
            any_matched = true;
        } else if schema.required().unwrap_or(true) {
            required_ok = false;
        }
    }
    Ok(required_ok && any_matched)
}

/// Resolves a `@context` term to its `@id` and, through one level of nested
/// `@context`, its further expansion.
fn resolve_term_iris(context_document: &Value, term: &str) -> Vec<String> {
    let mut iris = Vec::new();
    let Some(entry) = context_document.get("@context").and_then(|ctx| ctx.get(term)) else {
        return iris;
    };
    match entry {
        Value::String(iri) => iris.push(iri.clone()),
        Value::Object(map) => {
            if let Some(id) = map.get("@id").and_then(Value::as_str) {
                iris.push(id.to_string());
                if let Some(nested) = map.get("@context") {
                    let nested_key = id.rsplit(':').next().unwrap_or(id);
                    if let Some(nested_entry) = nested.get(term).or_else(|| nested.get(nested_key)) {
                        if let Some(iri) = nested_entry.as_str() {
                            iris.push(iri.to_string());
                        }
                    }
                }
            }
        }
        _ => {}
    }
    iris
}
