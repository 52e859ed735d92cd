use std::collections::{HashMap, HashSet};

use crate::constraint_filter::filter_credential;
use crate::error::Error;
use crate::format_filter::select_format;
use crate::model::{strip_tmp_suffix, Credential, Format, Requirement, Rule};
use crate::reshape::BbsDeriver;
use crate::schema_gate::{passes_schema_gate, ContextLoader, SchemaCache, SchemaGateConfig};

/// `descriptor_id -> accepted credentials`, the shape C8 threads up the tree
/// and C9 consumes directly.
pub type DescriptorCredentials = HashMap<String, Vec<Credential>>;

/// C8: recursive evaluation over the requirement tree built by C2. `vp_format`
/// starts at `"ldp_vp"` at the root and is threaded through the whole walk so
/// leaves can override it in definition order (last non-empty override wins).
/// Returns `Ok(None)` for the `no-credentials` signal, which the caller must
/// treat as locally recoverable (skip this branch) or, at the root, as fatal.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    requirement: &Requirement,
    credentials: &[Credential],
    default_format: Option<&Format>,
    commit: bool,
    loader: &dyn ContextLoader,
    schema_config: &SchemaGateConfig,
    cache: &SchemaCache,
    bbs_deriver: Option<&dyn BbsDeriver>,
    fresh_uuid: &mut dyn FnMut() -> String,
    vp_format: &mut String,
) -> Result<Option<DescriptorCredentials>, Error> {
    if requirement.is_leaf() {
        evaluate_leaf(
            requirement,
            credentials,
            default_format,
            commit,
            loader,
            schema_config,
            cache,
            bbs_deriver,
            fresh_uuid,
            vp_format,
        )
    } else {
        evaluate_branch(
            requirement,
            credentials,
            default_format,
            commit,
            loader,
            schema_config,
            cache,
            bbs_deriver,
            fresh_uuid,
            vp_format,
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn evaluate_leaf(
    requirement: &Requirement,
    credentials: &[Credential],
    default_format: Option<&Format>,
    commit: bool,
    loader: &dyn ContextLoader,
    schema_config: &SchemaGateConfig,
    cache: &SchemaCache,
    bbs_deriver: Option<&dyn BbsDeriver>,
    fresh_uuid: &mut dyn FnMut() -> String,
    vp_format: &mut String,
) -> Result<Option<DescriptorCredentials>, Error> {
    let mut out = DescriptorCredentials::new();

    for descriptor in &requirement.input_descriptors {
        let mut schema_passed = Vec::new();
        for credential in credentials {
            if passes_schema_gate(descriptor, credential, loader, schema_config, cache)? {
                schema_passed.push(credential.clone());
            }
        }

        let effective_format = descriptor.format().as_ref().or(default_format);
        let (tag, format_matched) = match effective_format {
            Some(format) => select_format(format, &schema_passed),
            None => (String::new(), schema_passed),
        };

        let mut accepted = Vec::new();
        for credential in &format_matched {
            if let Some(reshaped) = filter_credential(descriptor, credential, commit, bbs_deriver, fresh_uuid)? {
                accepted.push(reshaped);
            }
        }

        if !accepted.is_empty() {
            if !tag.is_empty() {
                *vp_format = tag;
            }
            out.insert(descriptor.id().clone(), accepted);
        }
    }

    if !requirement.satisfies_cardinality(out.len()) {
        return Ok(None);
    }
    Ok(Some(out))
}

#[allow(clippy::too_many_arguments)]
fn evaluate_branch(
    requirement: &Requirement,
    credentials: &[Credential],
    default_format: Option<&Format>,
    commit: bool,
    loader: &dyn ContextLoader,
    schema_config: &SchemaGateConfig,
    cache: &SchemaCache,
    bbs_deriver: Option<&dyn BbsDeriver>,
    fresh_uuid: &mut dyn FnMut() -> String,
    vp_format: &mut String,
) -> Result<Option<DescriptorCredentials>, Error> {
    let mut accepted_children = Vec::new();
    for child in &requirement.nested {
        if let Some(result) = evaluate(
            child,
            credentials,
            default_format,
            commit,
            loader,
            schema_config,
            cache,
            bbs_deriver,
            fresh_uuid,
            vp_format,
        )? {
            accepted_children.push(result);
        }
    }

    if accepted_children.is_empty() || !requirement.satisfies_cardinality(accepted_children.len()) {
        return Ok(None);
    }

    // original (trimmed) credential id -> descriptor id -> the tmp-suffixed id it matched under
    // only built for `pick` branches: cross-descriptor exclusion is a pick-cardinality
    // concept (a credential satisfying more groups than the branch asks for is excluded
    // from all of them) and does not apply to `all`, where satisfying fewer descriptors
    // than there are children is the normal case, not a violation.
    let mut exclude: HashSet<(String, String)> = HashSet::new();
    if requirement.rule == Rule::Pick {
        let mut index: HashMap<String, HashMap<String, String>> = HashMap::new();
        for child in &accepted_children {
            for (descriptor_id, creds) in child {
                for credential in creds {
                    let trimmed = strip_tmp_suffix(&credential.id());
                    index.entry(trimmed).or_default().insert(descriptor_id.clone(), credential.id());
                }
            }
        }

        for by_descriptor in index.values() {
            if !requirement.satisfies_cardinality(by_descriptor.len()) {
                for (descriptor_id, tmp_id) in by_descriptor {
                    exclude.insert((descriptor_id.clone(), tmp_id.clone()));
                }
            }
        }
    }

    let mut merged = DescriptorCredentials::new();
    for child in accepted_children {
        for (descriptor_id, creds) in child {
            let bucket = merged.entry(descriptor_id.clone()).or_default();
            for credential in creds {
                if exclude.contains(&(descriptor_id.clone(), credential.id())) {
                    continue;
                }
                let trimmed = strip_tmp_suffix(&credential.id());
                if bucket.iter().any(|existing: &Credential| strip_tmp_suffix(&existing.id()) == trimmed) {
                    continue;
                }
                bucket.push(credential);
            }
        }
    }
    merged.retain(|_, creds| !creds.is_empty());

    Ok(Some(merged))
}
