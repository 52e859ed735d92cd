use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The six normative claim format tags. Narrower than the broader
/// `ac_vc`/`mso_mdoc`/`vc+sd-jwt` variants used by the wider OpenID4VC
/// protocol stack — this crate only needs the six tags the Format Filter
/// actually buckets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimFormatDesignation {
    Jwt,
    JwtVc,
    JwtVp,
    Ldp,
    LdpVc,
    LdpVp,
}

impl ClaimFormatDesignation {
    pub const ORDER: [ClaimFormatDesignation; 6] = [
        ClaimFormatDesignation::Ldp,
        ClaimFormatDesignation::LdpVc,
        ClaimFormatDesignation::LdpVp,
        ClaimFormatDesignation::Jwt,
        ClaimFormatDesignation::JwtVc,
        ClaimFormatDesignation::JwtVp,
    ];

    pub fn as_tag(&self) -> &'static str {
        match self {
            ClaimFormatDesignation::Jwt => "jwt",
            ClaimFormatDesignation::JwtVc => "jwt_vc",
            ClaimFormatDesignation::JwtVp => "jwt_vp",
            ClaimFormatDesignation::Ldp => "ldp",
            ClaimFormatDesignation::LdpVc => "ldp_vc",
            ClaimFormatDesignation::LdpVp => "ldp_vp",
        }
    }

    pub fn is_ldp(&self) -> bool {
        matches!(
            self,
            ClaimFormatDesignation::Ldp | ClaimFormatDesignation::LdpVc | ClaimFormatDesignation::LdpVp
        )
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|designation| designation.as_tag() == tag)
    }
}

/// The per-format constraint: either an allow-list of JOSE `alg` values
/// (`jwt*` buckets) or of proof `type` values (`ldp*` buckets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimFormatProperty {
    Alg(Vec<String>),
    ProofType(Vec<String>),
}

pub type Format = HashMap<ClaimFormatDesignation, ClaimFormatProperty>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_format_map() {
        let format: Format = serde_json::from_value(json!({
            "jwt_vc": { "alg": ["EdDSA"] },
            "ldp_vc": { "proof_type": ["Ed25519Signature2018"] },
        }))
        .unwrap();
        assert_eq!(
            format.get(&ClaimFormatDesignation::JwtVc),
            Some(&ClaimFormatProperty::Alg(vec!["EdDSA".to_string()]))
        );
        assert_eq!(
            format.get(&ClaimFormatDesignation::LdpVc),
            Some(&ClaimFormatProperty::ProofType(vec!["Ed25519Signature2018".to_string()]))
        );
    }
}
