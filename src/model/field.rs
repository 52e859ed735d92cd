use getset::Getters;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::filter::{Directive, Filter};

#[skip_serializing_none]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct Field {
    pub id: Option<String>,
    pub path: Vec<String>,
    pub purpose: Option<String>,
    pub name: Option<String>,
    pub filter: Option<Filter>,
    pub predicate: Option<Directive>,
    pub intent_to_retain: Option<bool>,
}
