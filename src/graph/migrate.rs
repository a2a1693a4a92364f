//! Moving subviews into a wrapper node while keeping their constraints intact
//!
//! Given a source node and a target somewhere below it, every direct child of
//! the source (other than the branch holding the target) is reparented into the
//! target. Constraints on the source that tie a moved child to the source (or
//! one of its layout guides) are rebuilt against the target instead. Constraints
//! between siblings stay where they are.

use tracing::{debug, info};

use super::error::GraphError;
use super::model::Graph;
use super::types::*;

/// Outcome of the rewrite rule for one constraint and one subview
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Rebuilt against the target; the original should be removed
    Replace(Constraint),
    /// Relates the subview to a sibling; leave it on the source
    Keep,
    /// Does not involve the subview; untouched for this pass
    Drop,
}

/// Decide what happens to `constraint` when `subview` moves from `source` to `target`
pub fn rewrite(
    graph: &Graph,
    constraint: &Constraint,
    subview: NodeId,
    source: NodeId,
    target: NodeId,
) -> Rewrite {
    let subview_item = Item::Node(subview);
    let source_is_first = graph.is_node_or_guide_of(constraint.first, source);
    let source_is_second = constraint
        .second
        .is_some_and(|second| graph.is_node_or_guide_of(second, source));

    let replacement = if source_is_first && constraint.second == Some(subview_item) {
        Some(Constraint::new(
            target,
            constraint.first_attribute,
            constraint.relation,
            subview,
            constraint.second_attribute,
        ))
    } else if source_is_second && constraint.first == subview_item {
        Some(Constraint::new(
            subview,
            constraint.first_attribute,
            constraint.relation,
            target,
            constraint.second_attribute,
        ))
    } else {
        None
    };

    match replacement {
        Some(mut replacement) => {
            replacement.multiplier = constraint.multiplier;
            replacement.constant = constraint.constant;
            replacement.priority = constraint.priority;
            replacement.identifier = constraint.identifier.clone();
            Rewrite::Replace(replacement)
        }
        None if constraint.touches(subview_item) => Rewrite::Keep,
        None => Rewrite::Drop,
    }
}

/// What a migration did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    /// Subviews reparented into the target, in their original order
    pub moved: Vec<NodeId>,
    /// Original constraint and the replacement now installed on the target
    pub rewritten: Vec<(ConstraintId, ConstraintId)>,
    /// Sibling constraints left on the source
    pub kept: Vec<ConstraintId>,
    /// Replacements that were activated after the move
    pub activated: usize,
}

impl Graph {
    /// Direct child of `source` that is, or contains, `target`
    fn branch_towards(&self, source: NodeId, target: NodeId) -> Option<NodeId> {
        self.ancestors(target)
            .find(|&n| self.parent(n) == Some(source))
    }

    /// Move every subview of `source` into `target`, rewriting the constraints
    /// that anchor them to `source` so they anchor to `target` instead.
    ///
    /// `target` must be a (direct or indirect) descendant of `source`; otherwise
    /// nothing is changed and [`GraphError::NotADescendant`] is returned.
    pub fn migrate_subviews(
        &mut self,
        source: NodeId,
        target: NodeId,
    ) -> Result<MigrationReport, GraphError> {
        let Some(target_branch) = self.branch_towards(source, target) else {
            return Err(GraphError::not_a_descendant(
                self.name(source),
                self.name(target),
            ));
        };

        let mut report = MigrationReport::default();
        let mut staged: Vec<(ConstraintId, bool)> = Vec::new();

        let subviews: Vec<NodeId> = self.children(source).to_vec();
        for subview in subviews {
            if subview == target_branch {
                continue;
            }

            // The constraint list shrinks as replacements are made
            let snapshot: Vec<ConstraintId> = self.constraints(source).to_vec();
            for id in snapshot {
                match rewrite(self, self.constraint(id), subview, source, target) {
                    Rewrite::Replace(replacement) => {
                        let was_active = self.constraint(id).active;
                        self.deactivate(id);
                        self.uninstall(id);

                        let new_id = self.add_constraint(replacement);
                        debug!(
                            from = %self.describe(id),
                            to = %self.describe(new_id),
                            "rewrote constraint"
                        );
                        report.rewritten.push((id, new_id));
                        staged.push((new_id, was_active));
                    }
                    Rewrite::Keep => {
                        if !report.kept.contains(&id) {
                            report.kept.push(id);
                        }
                    }
                    Rewrite::Drop => {}
                }
            }

            self.add_child(target, subview);
            report.moved.push(subview);
        }

        // Install everything before activating anything
        for &(id, _) in &staged {
            self.install(target, id);
        }
        for &(id, was_active) in &staged {
            if was_active {
                self.constraint_mut(id).active = true;
                report.activated += 1;
            }
        }

        info!(
            source = self.name(source),
            target = self.name(target),
            moved = report.moved.len(),
            rewritten = report.rewritten.len(),
            kept = report.kept.len(),
            "migrated subviews"
        );
        Ok(report)
    }
}
