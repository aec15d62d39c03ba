use std::collections::BTreeSet;
use std::path::PathBuf;

use gwm_core::{Language, WorkflowDefinition, WorkflowFile, WorkflowName};
use gwm_sync::matcher::select;
use proptest::prelude::*;

const TAGS: &[&str] = &["python", "cpp", "rust", "go", "markdown", "shell"];

fn tag_set() -> impl Strategy<Value = BTreeSet<Language>> {
    proptest::sample::subsequence(TAGS, 0..=TAGS.len())
        .prop_map(|tags| tags.into_iter().map(Language::from).collect())
}

fn workflows() -> impl Strategy<Value = Vec<WorkflowDefinition>> {
    proptest::collection::vec(tag_set(), 0..8).prop_map(|sets| {
        sets.into_iter()
            .enumerate()
            .map(|(i, languages)| WorkflowDefinition {
                name: WorkflowName::from(format!("wf{i}")),
                files: vec![WorkflowFile {
                    source: PathBuf::from(format!("/wf/wf{i}.yml")),
                    relative: PathBuf::from(format!("wf{i}.yml")),
                }],
                languages,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn selection_is_universal_or_intersecting(wfs in workflows(), detected in tag_set()) {
        let selected = select(&wfs, &detected);
        for wf in &wfs {
            let expected = wf.languages.is_empty() || !wf.languages.is_disjoint(&detected);
            let picked = selected.iter().any(|s| s.name == wf.name);
            prop_assert_eq!(picked, expected, "workflow {}", wf.name);
        }
    }

    #[test]
    fn selection_keeps_manifest_order(wfs in workflows(), detected in tag_set()) {
        let selected = select(&wfs, &detected);
        let positions: Vec<usize> = selected
            .iter()
            .map(|s| wfs.iter().position(|w| w.name == s.name).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_detection_selects_only_universal(wfs in workflows()) {
        let selected = select(&wfs, &BTreeSet::new());
        prop_assert!(selected.iter().all(|wf| wf.is_universal()));
    }
}
