//! Conflict detection over the resolved binding set.
//!
//! Three rules, each checked independently per alias so that a single run
//! reports everything at once:
//!
//! 1. group and command namespaces are disjoint
//! 2. several command bindings may share an alias only if they agree on the
//!    target
//! 3. reserved aliases may never be claimed

use std::collections::BTreeSet;

use crate::domain::{
    entities::{
        alias::{AliasBinding, AliasSourceSet},
        conflict::{Conflict, ConflictKind, ConflictReport},
    },
    value_objects::SourceKind,
};

pub fn detect_conflicts(sources: &AliasSourceSet, reserved: &BTreeSet<String>) -> ConflictReport {
    let mut conflicts = Vec::new();

    for (alias, bindings) in sources.iter() {
        let labels = source_labels(bindings);

        let has_group = bindings.iter().any(|b| b.kind == SourceKind::Group);
        let has_command = bindings.iter().any(|b| b.kind == SourceKind::Command);

        if has_group && has_command {
            conflicts.push(Conflict {
                alias: alias.to_string(),
                kind: ConflictKind::MixedNamespaces,
                sources: labels.clone(),
            });
        } else {
            let targets: BTreeSet<_> = bindings.iter().map(|b| &b.target).collect();
            if targets.len() > 1 {
                conflicts.push(Conflict {
                    alias: alias.to_string(),
                    kind: ConflictKind::DivergentTargets,
                    sources: labels.clone(),
                });
            }
        }

        if reserved.contains(alias) {
            conflicts.push(Conflict {
                alias: alias.to_string(),
                kind: ConflictKind::Reserved,
                sources: labels,
            });
        }
    }

    if !conflicts.is_empty() {
        tracing::debug!(count = conflicts.len(), "alias conflicts detected");
    }
    ConflictReport::new(conflicts)
}

/// Distinct source labels in first-seen order.
fn source_labels(bindings: &[AliasBinding]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let label = binding.source_label();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}
