//! Frame solving for a constraint graph
//!
//! Translates the active constraints below a root node into kasuari (Cassowary)
//! constraints and reads back one frame per node. Used to check that a
//! migration keeps the layout it started from.

use std::collections::HashMap;

use kasuari::{
    Expression, Solver as KasuariSolver, Strength, Variable as KasuariVariable,
    WeightedRelation::*,
};
use thiserror::Error;
use tracing::warn;

use super::model::Graph;
use super::types::*;

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsatisfiable constraint: {constraint}")]
    Unsatisfiable { constraint: String },

    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Solved position and size of a node, in root coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Component-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &Frame, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

/// Frames for every node in the solved subtree
#[derive(Debug, Clone, Default)]
pub struct Frames {
    frames: HashMap<NodeId, Frame>,
}

impl Frames {
    pub fn get(&self, node: NodeId) -> Option<Frame> {
        self.frames.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct NodeVars {
    x: KasuariVariable,
    y: KasuariVariable,
    width: KasuariVariable,
    height: KasuariVariable,
}

/// Position and size of an item as solver expressions
struct ItemFrame {
    x: Expression,
    y: Expression,
    width: Expression,
    height: Expression,
}

impl ItemFrame {
    fn attribute(&self, attribute: Attribute) -> Option<Expression> {
        let expr = match attribute {
            Attribute::Left | Attribute::Leading => self.x.clone(),
            Attribute::Right | Attribute::Trailing => self.x.clone() + self.width.clone(),
            Attribute::Top => self.y.clone(),
            Attribute::Bottom => self.y.clone() + self.height.clone(),
            Attribute::Width => self.width.clone(),
            Attribute::Height => self.height.clone(),
            Attribute::CenterX => self.x.clone() + self.width.clone() * 0.5,
            Attribute::CenterY => self.y.clone() + self.height.clone() * 0.5,
            Attribute::NotAnAttribute => return None,
        };
        Some(expr)
    }
}

fn strength_for(priority: Priority) -> Strength {
    match priority.value() {
        1000 => Strength::REQUIRED,
        750..=999 => Strength::STRONG,
        250..=749 => Strength::MEDIUM,
        _ => Strength::WEAK,
    }
}

/// Wrapper around the kasuari solver for one subtree of a graph
struct FrameSolver<'g> {
    graph: &'g Graph,
    solver: KasuariSolver,
    vars: HashMap<NodeId, NodeVars>,
}

impl<'g> FrameSolver<'g> {
    fn new(graph: &'g Graph, root: NodeId) -> Self {
        let mut vars = HashMap::new();
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            vars.insert(
                node,
                NodeVars {
                    x: KasuariVariable::new(),
                    y: KasuariVariable::new(),
                    width: KasuariVariable::new(),
                    height: KasuariVariable::new(),
                },
            );
            pending.extend_from_slice(graph.children(node));
        }
        Self {
            graph,
            solver: KasuariSolver::new(),
            vars,
        }
    }

    fn item_frame(&self, item: Item) -> Option<ItemFrame> {
        let owner = self.graph.item_node(item);
        let vars = self.vars.get(&owner)?;
        let (x, y, width, height): (Expression, Expression, Expression, Expression) = (
            vars.x.into(),
            vars.y.into(),
            vars.width.into(),
            vars.height.into(),
        );
        Some(match item {
            Item::Node(_) => ItemFrame {
                x,
                y,
                width,
                height,
            },
            Item::Guide(guide) => {
                let insets = self.graph.guide(guide).insets;
                ItemFrame {
                    x: x + insets.left,
                    y: y + insets.top,
                    width: width + -(insets.left + insets.right),
                    height: height + -(insets.top + insets.bottom),
                }
            }
        })
    }

    fn pin_root(&mut self, root: NodeId, size: (f64, f64)) -> Result<(), SolverError> {
        let vars = self.vars[&root];
        for (var, value) in [
            (vars.x, 0.0),
            (vars.y, 0.0),
            (vars.width, size.0),
            (vars.height, size.1),
        ] {
            self.solver
                .add_constraint(var | EQ(Strength::REQUIRED) | value)
                .map_err(|e| SolverError::Internal(format!("failed to pin root: {:?}", e)))?;
        }
        Ok(())
    }

    fn add(&mut self, id: ConstraintId) -> Result<(), SolverError> {
        let c = self.graph.constraint(id);
        let desc = self.graph.describe(id);

        let Some(lhs) = self
            .item_frame(c.first)
            .and_then(|frame| frame.attribute(c.first_attribute))
        else {
            warn!(constraint = %desc, "first item outside solved subtree, skipping");
            return Ok(());
        };

        let strength = strength_for(c.priority);
        let constraint = match c.second {
            Some(second) => {
                let Some(expr) = self
                    .item_frame(second)
                    .and_then(|frame| frame.attribute(c.second_attribute))
                else {
                    warn!(constraint = %desc, "second item outside solved subtree, skipping");
                    return Ok(());
                };
                let rhs = expr * c.multiplier + c.constant;
                match c.relation {
                    Relation::Equal => lhs | EQ(strength) | rhs,
                    Relation::GreaterOrEqual => lhs | GE(strength) | rhs,
                    Relation::LessOrEqual => lhs | LE(strength) | rhs,
                }
            }
            None => match c.relation {
                Relation::Equal => lhs | EQ(strength) | c.constant,
                Relation::GreaterOrEqual => lhs | GE(strength) | c.constant,
                Relation::LessOrEqual => lhs | LE(strength) | c.constant,
            },
        };

        self.solver.add_constraint(constraint).map_err(|e| match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => {
                SolverError::Unsatisfiable { constraint: desc }
            }
            kasuari::AddConstraintError::DuplicateConstraint => {
                SolverError::Internal(format!("duplicate constraint: {}", desc))
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("{} ({})", msg, desc))
            }
        })
    }

    fn solve(mut self) -> Frames {
        let mut values: HashMap<KasuariVariable, f64> = HashMap::new();
        for (kvar, value) in self.solver.fetch_changes() {
            values.insert(*kvar, *value);
        }
        // Adding 0.0 turns -0.0 into 0.0
        let value = |var: KasuariVariable| values.get(&var).copied().unwrap_or(0.0) + 0.0;

        let frames = self
            .vars
            .iter()
            .map(|(&node, vars)| {
                (
                    node,
                    Frame::new(
                        value(vars.x),
                        value(vars.y),
                        value(vars.width),
                        value(vars.height),
                    ),
                )
            })
            .collect();
        Frames { frames }
    }
}

/// Solve frames for `root` and everything below it.
///
/// The root is pinned at the origin with `root_size`. Only active constraints
/// installed on nodes of the subtree take part; constraints reaching outside
/// the subtree are skipped.
pub fn solve_frames(
    graph: &Graph,
    root: NodeId,
    root_size: (f64, f64),
) -> Result<Frames, SolverError> {
    let mut solver = FrameSolver::new(graph, root);
    solver.pin_root(root, root_size)?;

    let mut nodes: Vec<NodeId> = solver.vars.keys().copied().collect();
    nodes.sort();
    for node in nodes {
        for &id in graph.constraints(node) {
            if graph.constraint(id).active {
                solver.add(id)?;
            }
        }
    }
    Ok(solver.solve())
}
