use std::sync::Arc;

use crate::error::Error;
use crate::model::{InputDescriptor, PresentationDefinition, Requirement, Rule, SubmissionRequirement};

/// C2: translates `submission_requirements` + `input_descriptors` into the
/// internal requirement tree, or produces the implicit default when no
/// requirements are given.
pub fn build_requirement_tree(definition: &PresentationDefinition) -> Result<Requirement, Error> {
    match definition.submission_requirements() {
        None => Ok(default_tree(definition)),
        Some(requirements) if requirements.is_empty() => Ok(default_tree(definition)),
        Some(requirements) => {
            let children = requirements
                .iter()
                .map(|r| build_node(r, definition))
                .collect::<Result<Vec<_>, _>>()?;
            if children.len() == 1 {
                Ok(children.into_iter().next().unwrap())
            } else {
                let count = children.len();
                Ok(Requirement::branch(Rule::All, Some(count), None, None, children))
            }
        }
    }
}

fn default_tree(definition: &PresentationDefinition) -> Requirement {
    let descriptors: Vec<Arc<InputDescriptor>> = definition.input_descriptors().iter().cloned().map(Arc::new).collect();
    let count = descriptors.len();
    Requirement::leaf(Rule::All, Some(count), None, None, descriptors)
}

fn build_node(requirement: &SubmissionRequirement, definition: &PresentationDefinition) -> Result<Requirement, Error> {
    match (requirement.from(), requirement.from_nested()) {
        (Some(group), None) => {
            let matched: Vec<Arc<InputDescriptor>> = definition
                .input_descriptors()
                .iter()
                .filter(|descriptor| descriptor.group().as_ref().map(|g| g.contains(group)).unwrap_or(false))
                .cloned()
                .map(Arc::new)
                .collect();
            if matched.is_empty() {
                return Err(Error::NoDescriptorsForGroup(group.clone()));
            }
            let count = resolve_count(requirement, matched.len());
            Ok(Requirement::leaf(*requirement.rule(), count, *requirement.min(), *requirement.max(), matched))
        }
        (None, Some(children)) => {
            let built = children
                .iter()
                .map(|child| build_node(child, definition))
                .collect::<Result<Vec<_>, _>>()?;
            let count = resolve_count(requirement, built.len());
            Ok(Requirement::branch(*requirement.rule(), count, *requirement.min(), *requirement.max(), built))
        }
        _ => Err(Error::InvalidDefinition(
            "submission_requirement must set exactly one of `from` or `from_nested`".to_string(),
        )),
    }
}

fn resolve_count(requirement: &SubmissionRequirement, resolved_children: usize) -> Option<usize> {
    if *requirement.rule() == Rule::All {
        Some(resolved_children)
    } else {
        *requirement.count()
    }
}
