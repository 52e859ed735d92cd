use std::sync::Arc;

use super::descriptor::{InputDescriptor, Rule};

/// The internal requirement tree produced by C2 from a definition's
/// `submission_requirements` (or the implicit single-`all`-group default).
/// Descriptors are shared by [`Arc`] rather than cloned: the tree is a strict
/// tree with no sharing of *nodes*, but the same descriptor can legitimately
/// appear under more than one leaf (e.g. via nested `from_nested` groups), and
/// descriptors are immutable once parsed.
#[derive(Debug, Clone)]
pub struct Requirement {
    pub rule: Rule,
    pub count: Option<usize>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub input_descriptors: Vec<Arc<InputDescriptor>>,
    pub nested: Vec<Requirement>,
}

impl Requirement {
    pub fn leaf(rule: Rule, count: Option<usize>, min: Option<usize>, max: Option<usize>, input_descriptors: Vec<Arc<InputDescriptor>>) -> Self {
        Requirement {
            rule,
            count,
            min,
            max,
            input_descriptors,
            nested: Vec::new(),
        }
    }

    pub fn branch(rule: Rule, count: Option<usize>, min: Option<usize>, max: Option<usize>, nested: Vec<Requirement>) -> Self {
        Requirement {
            rule,
            count,
            min,
            max,
            input_descriptors: Vec::new(),
            nested,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !self.input_descriptors.is_empty()
    }

    /// `count/min/max` cardinality check shared by leaf and branch evaluation.
    pub fn satisfies_cardinality(&self, n: usize) -> bool {
        if let Some(count) = self.count {
            return n == count;
        }
        let min_ok = self.min.map(|m| n >= m).unwrap_or(true);
        let max_ok = self.max.map(|m| n <= m).unwrap_or(true);
        min_ok && max_ok
    }
}
