//! Workflow selection per repository.

use std::collections::BTreeSet;

use gwm_core::{Language, Manifest, RepositoryProfile, WorkflowDefinition};

/// Workflows of `manifest` that apply to `profile`, in declaration order.
///
/// A workflow applies when it has no language restriction or when its
/// languages intersect the detected ones.
pub fn matching_workflows<'m>(
    manifest: &'m Manifest,
    profile: &RepositoryProfile,
) -> Vec<&'m WorkflowDefinition> {
    select(manifest.workflows(), &profile.languages)
}

/// Order-preserving filter behind [`matching_workflows`].
pub fn select<'m>(
    workflows: &'m [WorkflowDefinition],
    detected: &BTreeSet<Language>,
) -> Vec<&'m WorkflowDefinition> {
    workflows.iter().filter(|wf| wf.applies_to(detected)).collect()
}
