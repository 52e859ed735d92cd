use getset::Getters;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::field::Field;
use super::filter::Directive;

#[skip_serializing_none]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct HolderSubject {
    pub field_id: Vec<String>,
    pub directive: Directive,
}

#[skip_serializing_none]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Constraints {
    pub limit_disclosure: Option<Directive>,
    pub subject_is_issuer: Option<Directive>,
    pub is_holder: Option<Vec<HolderSubject>>,
    #[serde(default)]
    pub fields: Vec<Field>,
}
