//! Edge anchoring of a node to its parent
//!
//! `set_anchors` first removes every constraint on the parent that already pins
//! one of the four edges between parent and node (in either direction), then
//! creates one required equality per requested edge. Calling it again with the
//! same spec therefore produces the same constraint set.

use tracing::debug;

use super::model::Graph;
use super::types::*;

/// Offsets for each edge of a node relative to its parent. `None` leaves that
/// edge unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorSpec {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub bottom: Option<f64>,
    pub right: Option<f64>,
}

impl AnchorSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// All four edges flush with the parent
    pub fn fill() -> Self {
        Self::uniform(0.0)
    }

    pub fn uniform(inset: f64) -> Self {
        Self {
            top: Some(inset),
            left: Some(inset),
            bottom: Some(inset),
            right: Some(inset),
        }
    }

    pub fn with_top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    pub fn with_bottom(mut self, bottom: f64) -> Self {
        self.bottom = Some(bottom);
        self
    }

    pub fn with_right(mut self, right: f64) -> Self {
        self.right = Some(right);
        self
    }

    /// (edge, signed constant) pairs for the edges that are set.
    /// Bottom and trailing measure inward from the far edge, hence the sign flip.
    fn edge_constants(&self) -> Vec<(Attribute, f64)> {
        [
            (Attribute::Top, self.top),
            (Attribute::Leading, self.left),
            (Attribute::Bottom, self.bottom.map(|v| -v)),
            (Attribute::Trailing, self.right.map(|v| -v)),
        ]
        .into_iter()
        .filter_map(|(attr, value)| value.map(|v| (attr, v)))
        .collect()
    }
}

impl Graph {
    /// Pin the edges of `node` to its parent according to `spec`.
    ///
    /// Returns the created constraints. A node without a parent is left alone.
    pub fn set_anchors(&mut self, node: NodeId, spec: AnchorSpec) -> Vec<ConstraintId> {
        let Some(parent) = self.parent(node) else {
            debug!(node = self.name(node), "no parent, skipping anchors");
            return Vec::new();
        };

        let stale: Vec<ConstraintId> = self
            .constraints(parent)
            .iter()
            .copied()
            .filter(|&id| self.is_edge_anchor(id, node, parent))
            .collect();
        for id in stale {
            debug!(constraint = %self.describe(id), "removing existing anchor");
            self.deactivate(id);
            self.uninstall(id);
        }

        let mut created = Vec::new();
        for (edge, constant) in spec.edge_constants() {
            let id = self.add_constraint(Constraint::equal(node, parent, edge, constant));
            self.install(parent, id);
            self.constraint_mut(id).active = true;
            debug!(constraint = %self.describe(id), "created anchor");
            created.push(id);
        }
        created
    }

    /// Make `node` fill its parent exactly
    pub fn set_fill(&mut self, node: NodeId) -> Vec<ConstraintId> {
        self.set_anchors(node, AnchorSpec::fill())
    }

    /// True if the constraint relates the same edge of `node` and `parent`,
    /// in either direction
    fn is_edge_anchor(&self, id: ConstraintId, node: NodeId, parent: NodeId) -> bool {
        let c = self.constraint(id);
        if c.first_attribute != c.second_attribute
            || !Attribute::edges().contains(&c.first_attribute)
        {
            return false;
        }
        let (node, parent) = (Item::Node(node), Item::Node(parent));
        match c.second {
            Some(second) => {
                (c.first == parent && second == node) || (c.first == node && second == parent)
            }
            None => false,
        }
    }
}
