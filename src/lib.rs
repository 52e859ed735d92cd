pub mod constraint_filter;
pub mod error;
pub mod evaluator;
pub mod field_filter;
pub mod format_filter;
pub mod model;
pub mod requirement_tree;
pub mod reshape;
pub mod schema_gate;
pub mod schema_validation;
pub mod submission;

pub use constraint_filter::MatchedField;
pub use error::Error;
pub use evaluator::DescriptorCredentials;
pub use model::{
    ClaimFormatDesignation, ClaimFormatProperty, Constraints, Credential, Directive, Field, Filter, Format, HashAlg,
    HolderSubject, InputDescriptor, PresentationDefinition, Requirement, Rule, SchemaEntry, SubmissionRequirement,
};
pub use reshape::BbsDeriver;
pub use schema_gate::{ContextLoader, SchemaCache, SchemaGateConfig, StaticContextLoader};
pub use schema_validation::{validate_and_parse_definition, DEFINITION_SCHEMA_V1, DEFINITION_SCHEMA_V2};
pub use submission::{assemble_presentation, InputDescriptorMappingObject, PathNested, PresentationSubmission};

use serde_json::Value;

use evaluator::evaluate;
use requirement_tree::build_requirement_tree;

/// Bundles the external collaborators an evaluation needs: the JSON-LD
/// context loader (C6), the schema-gate policy, and an optional BBS+ deriver
/// (C7). Borrowed for the duration of a single invocation — nothing here
/// outlives the call.
pub struct EvalContext<'a> {
    pub loader: &'a dyn ContextLoader,
    pub schema_config: SchemaGateConfig,
    pub bbs_deriver: Option<&'a dyn BbsDeriver>,
}

impl<'a> EvalContext<'a> {
    pub fn new(loader: &'a dyn ContextLoader) -> Self {
        EvalContext {
            loader,
            schema_config: SchemaGateConfig::default(),
            bbs_deriver: None,
        }
    }
}

/// Match-Requirements: introspection only. Evaluates a raw presentation
/// definition against the given credentials and returns which descriptor
/// accepted which credentials, without committing to any reshaping or
/// transient-id assignment.
pub fn match_requirements(definition: &Value, credentials: &[Credential], ctx: &EvalContext) -> Result<DescriptorCredentials, Error> {
    run(definition, credentials, false, ctx).map(|(map, _, _)| map)
}

/// Create-Presentation: runs the same evaluation as [`match_requirements`]
/// but committed (C4 reshapes accepted credentials and appends the transient
/// id suffix), then hands the result to C9 to assemble a Verifiable
/// Presentation envelope.
pub fn create_presentation(definition: &Value, credentials: &[Credential], ctx: &EvalContext) -> Result<Value, Error> {
    let (descriptor_credentials, vp_format, definition_id) = run(definition, credentials, true, ctx)?;
    let mut fresh_uuid = || uuid::Uuid::new_v4().to_string();
    Ok(submission::assemble_presentation(&definition_id, &vp_format, descriptor_credentials, &mut fresh_uuid))
}

fn run(definition: &Value, credentials: &[Credential], commit: bool, ctx: &EvalContext) -> Result<(DescriptorCredentials, String, String), Error> {
    let parsed = validate_and_parse_definition(definition)?;
    let tree = build_requirement_tree(&parsed)?;

    let cache = SchemaCache::default();
    let mut vp_format = "ldp_vp".to_string();
    let mut fresh_uuid = || uuid::Uuid::new_v4().to_string();

    let result = evaluate(
        &tree,
        credentials,
        parsed.format().as_ref(),
        commit,
        ctx.loader,
        &ctx.schema_config,
        &cache,
        ctx.bbs_deriver,
        &mut fresh_uuid,
        &mut vp_format,
    )?;

    let descriptor_credentials = result.ok_or(Error::NoCredentials)?;
    Ok((descriptor_credentials, vp_format, parsed.id().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn credential(id: &str, degree: &str) -> Credential {
        Credential::from_document(json!({
            "id": id,
            "type": ["VerifiableCredential"],
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "issuer": { "id": "did:example:issuer" },
            "credentialSubject": { "id": "did:example:subject", "degree": { "type": degree } },
            "issuanceDate": "2024-01-01T00:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn single_descriptor_one_matching_credential_produces_vp() {
        let definition = json!({
            "id": "d",
            "input_descriptors": [{
                "id": "a",
                "constraints": { "fields": [{ "path": ["$.credentialSubject.degree.type"], "filter": { "const": "BachelorDegree" } }] }
            }]
        });
        let credentials = vec![credential("urn:uuid:1", "BachelorDegree")];
        let loader = StaticContextLoader::new();
        let ctx = EvalContext::new(&loader);

        let vp = create_presentation(&definition, &credentials, &ctx).unwrap();
        let verifiable_credential = vp.get("verifiableCredential").unwrap().as_array().unwrap();
        assert_eq!(verifiable_credential.len(), 1);
        assert_eq!(verifiable_credential[0].get("id").unwrap(), "urn:uuid:1");

        let descriptor_map = vp.get("presentation_submission").unwrap().get("descriptor_map").unwrap().as_array().unwrap();
        assert_eq!(descriptor_map.len(), 1);
        assert_eq!(descriptor_map[0].get("id").unwrap(), "a");
        assert_eq!(descriptor_map[0].get("path").unwrap(), "$");
        assert_eq!(descriptor_map[0].get("path_nested").unwrap().get("path").unwrap(), "$.verifiableCredential[0]");
    }

    #[test]
    fn pick_one_of_two_groups_only_passing_group_surfaces() {
        let definition = json!({
            "id": "d",
            "input_descriptors": [
                { "id": "a", "group": ["A"], "constraints": { "fields": [{ "path": ["$.credentialSubject.degree.type"], "filter": { "const": "BachelorDegree" } }] } },
                { "id": "b", "group": ["B"], "constraints": { "fields": [{ "path": ["$.credentialSubject.degree.type"], "filter": { "const": "MasterDegree" } }] } },
            ],
            "submission_requirements": [{
                "rule": "pick",
                "count": 1,
                "from_nested": [
                    { "rule": "all", "from": "A" },
                    { "rule": "all", "from": "B" },
                ]
            }]
        });
        let credentials = vec![credential("urn:uuid:1", "BachelorDegree")];
        let loader = StaticContextLoader::new();
        let ctx = EvalContext::new(&loader);

        let map = match_requirements(&definition, &credentials, &ctx).unwrap();
        assert!(map.contains_key("a"));
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn no_matching_credential_is_fatal_no_credentials() {
        let definition = json!({
            "id": "d",
            "input_descriptors": [{
                "id": "a",
                "constraints": { "fields": [{ "path": ["$.credentialSubject.degree.type"], "filter": { "const": "DoctorateDegree" } }] }
            }]
        });
        let credentials = vec![credential("urn:uuid:1", "BachelorDegree")];
        let loader = StaticContextLoader::new();
        let ctx = EvalContext::new(&loader);

        let err = match_requirements(&definition, &credentials, &ctx).unwrap_err();
        assert!(matches!(err, Error::NoCredentials));
    }

    #[test]
    fn match_requirements_then_create_presentation_yields_same_credential_set() {
        let definition = json!({
            "id": "d",
            "input_descriptors": [{
                "id": "a",
                "constraints": { "fields": [{ "path": ["$.credentialSubject.degree.type"] }] }
            }]
        });
        let credentials = vec![credential("urn:uuid:1", "BachelorDegree")];
        let loader = StaticContextLoader::new();
        let ctx = EvalContext::new(&loader);

        let matched = match_requirements(&definition, &credentials, &ctx).unwrap();
        assert_eq!(matched.get("a").unwrap()[0].id(), "urn:uuid:1");

        let vp = create_presentation(&definition, &credentials, &ctx).unwrap();
        let verifiable_credential = vp.get("verifiableCredential").unwrap().as_array().unwrap();
        assert_eq!(
            verifiable_credential[0].get("credentialSubject").unwrap().get("degree").unwrap().get("type").unwrap(),
            "BachelorDegree"
        );
    }
}
