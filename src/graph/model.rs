//! Arena holding nodes, layout guides and constraints
//!
//! Handles are plain indices. Records are never removed from the arena, so a
//! handle obtained from a graph stays valid for that graph's lifetime. Using a
//! handle from another graph is a programmer error and panics.

use super::error::GraphError;
use super::types::*;

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    constraints: Vec<ConstraintId>,
    guides: Vec<GuideId>,
}

/// A layout guide: a non-rendering anchor target owned by a node
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGuide {
    pub name: String,
    pub owner: NodeId,
    pub insets: GuideInsets,
}

/// View hierarchy plus the constraints installed on it
///
/// Superseded constraints are uninstalled, not freed. Every `set_anchors` call
/// and every migrated constraint appends new records, so a long-lived graph
/// that is re-anchored repeatedly grows without bound. Rebuild the graph if
/// that matters.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<NodeData>,
    guides: Vec<LayoutGuide>,
    constraints: Vec<Constraint>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Nodes ====================

    /// Create a detached node
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            constraints: Vec::new(),
            guides: Vec::new(),
        });
        id
    }

    /// Append `child` to `parent`'s children, detaching it from its old parent first
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove `node` from its parent's children. Constraints are left alone.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Children in insertion (rendering) order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Look up a node by name (first match in creation order)
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// `node` followed by its parent, grandparent, ...
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&n| self.parent(n))
    }

    /// Nearest node that is an ancestor of (or equal to) both `a` and `b`
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let a_chain: Vec<NodeId> = self.ancestors(a).collect();
        self.ancestors(b).find(|n| a_chain.contains(n))
    }

    // ==================== Layout guides ====================

    pub fn add_guide(
        &mut self,
        owner: NodeId,
        name: impl Into<String>,
        insets: GuideInsets,
    ) -> GuideId {
        let id = GuideId(self.guides.len());
        self.guides.push(LayoutGuide {
            name: name.into(),
            owner,
            insets,
        });
        self.nodes[owner.0].guides.push(id);
        id
    }

    pub fn guide(&self, guide: GuideId) -> &LayoutGuide {
        &self.guides[guide.0]
    }

    pub fn layout_guides(&self, node: NodeId) -> &[GuideId] {
        &self.nodes[node.0].guides
    }

    pub fn find_guide(&self, owner: NodeId, name: &str) -> Option<GuideId> {
        self.layout_guides(owner)
            .iter()
            .copied()
            .find(|&g| self.guides[g.0].name == name)
    }

    /// The node an item belongs to: the node itself, or a guide's owner
    pub fn item_node(&self, item: Item) -> NodeId {
        match item {
            Item::Node(n) => n,
            Item::Guide(g) => self.guides[g.0].owner,
        }
    }

    /// True if `item` is `node` or one of `node`'s layout guides
    pub fn is_node_or_guide_of(&self, item: Item, node: NodeId) -> bool {
        match item {
            Item::Node(n) => n == node,
            Item::Guide(g) => self.guides[g.0].owner == node,
        }
    }

    /// Human-readable item name: `node` or `node.guide`
    pub fn item_name(&self, item: Item) -> String {
        match item {
            Item::Node(n) => self.name(n).to_string(),
            Item::Guide(g) => {
                let guide = &self.guides[g.0];
                format!("{}.{}", self.name(guide.owner), guide.name)
            }
        }
    }

    // ==================== Constraints ====================

    /// Store a constraint record. It starts uninstalled; its `active` flag is kept.
    pub fn add_constraint(&mut self, mut constraint: Constraint) -> ConstraintId {
        constraint.owner = None;
        let id = ConstraintId(self.constraints.len());
        self.constraints.push(constraint);
        id
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.0]
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> &mut Constraint {
        &mut self.constraints[id.0]
    }

    /// Constraints installed on `node`, in installation order
    pub fn constraints(&self, node: NodeId) -> &[ConstraintId] {
        &self.nodes[node.0].constraints
    }

    /// Install a constraint on `node`, moving it off its previous owner
    pub fn install(&mut self, node: NodeId, id: ConstraintId) {
        if self.constraints[id.0].owner == Some(node) {
            return;
        }
        self.uninstall(id);
        self.nodes[node.0].constraints.push(id);
        self.constraints[id.0].owner = Some(node);
    }

    /// Remove a constraint from its owner's list. The record stays addressable.
    pub fn uninstall(&mut self, id: ConstraintId) {
        if let Some(owner) = self.constraints[id.0].owner.take() {
            self.nodes[owner.0].constraints.retain(|&c| c != id);
        }
    }

    /// Mark a constraint active. An uninstalled constraint is installed on the
    /// nearest common ancestor of its endpoints first.
    pub fn activate(&mut self, id: ConstraintId) -> Result<(), GraphError> {
        if self.constraints[id.0].owner.is_none() {
            let owner = self.natural_owner(id)?;
            self.install(owner, id);
        }
        self.constraints[id.0].active = true;
        Ok(())
    }

    pub fn deactivate(&mut self, id: ConstraintId) {
        self.constraints[id.0].active = false;
    }

    /// Node a constraint belongs on: the nearest common ancestor of its endpoints
    pub fn natural_owner(&self, id: ConstraintId) -> Result<NodeId, GraphError> {
        let constraint = &self.constraints[id.0];
        let first = self.item_node(constraint.first);
        match constraint.second {
            None => Ok(first),
            Some(second) => {
                let second = self.item_node(second);
                self.common_ancestor(first, second)
                    .ok_or_else(|| GraphError::NoCommonAncestor {
                        first: self.name(first).to_string(),
                        second: self.name(second).to_string(),
                    })
            }
        }
    }

    /// Render a constraint the way the dump shows it
    pub fn describe(&self, id: ConstraintId) -> String {
        let c = &self.constraints[id.0];
        let mut out = format!(
            "{}.{} {} ",
            self.item_name(c.first),
            c.first_attribute,
            c.relation
        );
        match c.second {
            Some(second) => {
                out.push_str(&format!("{}.{}", self.item_name(second), c.second_attribute));
                if c.multiplier != 1.0 {
                    out.push_str(&format!(" * {}", c.multiplier));
                }
                if c.constant > 0.0 {
                    out.push_str(&format!(" + {}", c.constant));
                } else if c.constant < 0.0 {
                    out.push_str(&format!(" - {}", -c.constant));
                }
            }
            None => out.push_str(&format!("{}", c.constant)),
        }
        if !c.priority.is_required() {
            out.push_str(&format!(" @{}", c.priority.value()));
        }
        if let Some(identifier) = &c.identifier {
            out.push_str(&format!(" '{}'", identifier));
        }
        out
    }
}
