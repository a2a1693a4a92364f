//! Property-based tests for anchoring and migration.
//!
//! These tests use proptest to check that the graph operations keep their
//! invariants across randomly generated hierarchies and constraint sets.

use proptest::prelude::*;

use reanchor::graph::{Attribute, Constraint, Graph, Item, NodeId, Priority, Relation};
use reanchor::AnchorSpec;

/// Strategy for an optional edge offset
fn offset() -> impl Strategy<Value = Option<f64>> {
    prop::option::of((-50i32..50).prop_map(f64::from))
}

fn anchor_spec() -> impl Strategy<Value = AnchorSpec> {
    (offset(), offset(), offset(), offset()).prop_map(|(top, left, bottom, right)| AnchorSpec {
        top,
        left,
        bottom,
        right,
    })
}

fn attribute() -> impl Strategy<Value = Attribute> {
    prop::sample::select(vec![
        Attribute::Top,
        Attribute::Bottom,
        Attribute::Leading,
        Attribute::Trailing,
        Attribute::Width,
        Attribute::Height,
        Attribute::CenterX,
        Attribute::CenterY,
    ])
}

fn relation() -> impl Strategy<Value = Relation> {
    prop::sample::select(vec![
        Relation::Equal,
        Relation::GreaterOrEqual,
        Relation::LessOrEqual,
    ])
}

/// One generated constraint; `other` of `None` means the source itself
#[derive(Debug, Clone)]
struct GeneratedConstraint {
    child: usize,
    other: Option<usize>,
    source_first: bool,
    attribute: Attribute,
    relation: Relation,
    constant: f64,
    priority: u16,
    active: bool,
}

fn generated_constraint(children: usize) -> impl Strategy<Value = GeneratedConstraint> {
    (
        0..children,
        prop::option::of(0..children),
        any::<bool>(),
        attribute(),
        relation(),
        (-100i32..100).prop_map(f64::from),
        1u16..=1000,
        any::<bool>(),
    )
        .prop_map(
            |(child, other, source_first, attribute, relation, constant, priority, active)| {
                GeneratedConstraint {
                    child,
                    // A constraint from a child to itself is not a sibling relation
                    other: other.filter(|&o| o != child),
                    source_first,
                    attribute,
                    relation,
                    constant,
                    priority,
                    active,
                }
            },
        )
}

fn scene() -> impl Strategy<Value = (usize, Vec<GeneratedConstraint>)> {
    (1usize..6).prop_flat_map(|n| (Just(n), prop::collection::vec(generated_constraint(n), 0..20)))
}

/// Descriptions of the active constraints installed on `node`, sorted
fn active_descriptions(graph: &Graph, node: NodeId) -> Vec<String> {
    let mut described: Vec<String> = graph
        .constraints(node)
        .iter()
        .filter(|&&id| graph.constraint(id).active)
        .map(|&id| graph.describe(id))
        .collect();
    described.sort();
    described
}

proptest! {
    /// Anchoring twice with the same spec leaves the same constraints as anchoring once.
    #[test]
    fn anchoring_is_idempotent(spec in anchor_spec()) {
        let mut once = Graph::new();
        let parent = once.add_node("parent");
        let child = once.add_node("child");
        once.add_child(parent, child);
        let mut twice = once.clone();

        once.set_anchors(child, spec);
        twice.set_anchors(child, spec);
        twice.set_anchors(child, spec);

        prop_assert_eq!(active_descriptions(&once, parent), active_descriptions(&twice, parent));
        let edges = [spec.top, spec.left, spec.bottom, spec.right].iter().flatten().count();
        prop_assert_eq!(twice.constraints(parent).len(), edges);
    }

    /// Migration moves every subview, rewrites every source-anchored constraint
    /// and leaves sibling constraints alone.
    #[test]
    fn migration_preserves_constraints((n, specs) in scene()) {
        let mut g = Graph::new();
        let source = g.add_node("source");
        let children: Vec<NodeId> = (0..n)
            .map(|i| {
                let child = g.add_node(format!("v{}", i));
                g.add_child(source, child);
                child
            })
            .collect();
        let target = g.add_node("target");
        g.add_child(source, target);

        let mut anchored = 0;
        let mut anchored_active = 0;
        let mut siblings = 0;
        for spec in &specs {
            let child = children[spec.child];
            let other = spec.other.map(|o| children[o]).unwrap_or(source);
            let (first, second) = if spec.source_first { (other, child) } else { (child, other) };
            let constraint =
                Constraint::new(first, spec.attribute, spec.relation, second, spec.attribute)
                    .with_constant(spec.constant)
                    .with_priority(Priority::new(spec.priority));
            let id = g.add_constraint(constraint);
            g.install(source, id);
            g.constraint_mut(id).active = spec.active;

            if spec.other.is_some() {
                siblings += 1;
            } else {
                anchored += 1;
                if spec.active {
                    anchored_active += 1;
                }
            }
        }

        let report = g.migrate_subviews(source, target).unwrap();

        prop_assert_eq!(&report.moved, &children);
        prop_assert_eq!(g.children(source), &[target]);
        prop_assert_eq!(g.children(target), children.as_slice());
        prop_assert_eq!(report.rewritten.len(), anchored);
        prop_assert_eq!(report.activated, anchored_active);
        prop_assert_eq!(g.constraints(target).len(), anchored);
        prop_assert_eq!(g.constraints(source).len(), siblings);

        let source_item = Item::Node(source);
        for &id in g.constraints(target) {
            prop_assert!(!g.constraint(id).touches(source_item));
        }
        for &(old, new) in &report.rewritten {
            let (old, new) = (g.constraint(old), g.constraint(new));
            prop_assert_eq!(old.relation, new.relation);
            prop_assert_eq!(old.constant, new.constant);
            prop_assert_eq!(old.priority, new.priority);
            prop_assert_eq!(old.owner(), None);
            prop_assert!(!old.active);
        }
    }
}
