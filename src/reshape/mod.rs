pub mod bbs;
pub mod path;
pub mod plain;
pub mod sd_jwt;

pub use bbs::BbsDeriver;

use crate::constraint_filter::MatchedField;
use crate::error::Error;
use crate::model::{Credential, Directive};

/// C7 dispatch for the non-SD-JWT modes. The SD-JWT mode is invoked
/// separately by C4, since it is triggered by a different condition
/// (`limit_disclosure=required` AND the credential *is* SD-JWT) than the two
/// modes dispatched here (which both require the credential *not* be SD-JWT).
pub fn reshape(
    credential: &Credential,
    limit_disclosure: Option<Directive>,
    matched: &[MatchedField],
    bbs_deriver: Option<&dyn BbsDeriver>,
) -> Result<Credential, Error> {
    let limit_required = matches!(limit_disclosure, Some(Directive::Required));
    let predicate_mode = matched.iter().any(|field| field.predicate);
    let has_bbs_proof = credential.has_proof_type("BbsBlsSignature2020");

    if limit_required && has_bbs_proof && !predicate_mode {
        if let Some(deriver) = bbs_deriver {
            return bbs::derive(credential, matched, deriver);
        }
        tracing::debug!("credential carries a BbsBlsSignature2020 proof but no BbsDeriver was configured; falling back to plain projection");
    }

    plain::project(credential, matched)
}
