//! Indented tree dump of nodes and their installed constraints

use std::fmt::{self, Write};

use serde::Deserialize;

use super::model::Graph;
use super::types::NodeId;

/// Formatting options for [`Graph::dump_to`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpStyle {
    /// Indentation added per tree level
    pub indent: String,
    /// List inactive constraints (marked `(inactive)`)
    pub show_inactive: bool,
}

impl Default for DumpStyle {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            show_inactive: true,
        }
    }
}

impl Graph {
    /// Dump the subtree at `root` with the default style
    pub fn dump(&self, root: NodeId) -> String {
        let mut out = String::new();
        let _ = self.dump_to(root, &mut out, &DumpStyle::default());
        out
    }

    /// Write one line per node (`name #id`), its constraints one level deeper,
    /// and its children after that.
    pub fn dump_to(&self, root: NodeId, out: &mut impl Write, style: &DumpStyle) -> fmt::Result {
        self.dump_node(root, 0, out, style)
    }

    fn dump_node(
        &self,
        node: NodeId,
        depth: usize,
        out: &mut impl Write,
        style: &DumpStyle,
    ) -> fmt::Result {
        let inset = style.indent.repeat(depth);
        writeln!(out, "{}{} #{}", inset, self.name(node), node.index())?;

        for &id in self.constraints(node) {
            let constraint = self.constraint(id);
            if !constraint.active && !style.show_inactive {
                continue;
            }
            let suffix = if constraint.active { "" } else { " (inactive)" };
            writeln!(out, "{}{}{}{}", inset, style.indent, self.describe(id), suffix)?;
        }

        for &child in self.children(node) {
            self.dump_node(child, depth + 1, out, style)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::types::{Attribute, Constraint};

    fn sample() -> (Graph, NodeId) {
        let mut g = Graph::new();
        let root = g.add_node("root");
        let child = g.add_node("child");
        g.add_child(root, child);
        let top = g.add_constraint(Constraint::equal(child, root, Attribute::Top, 4.0));
        g.activate(top).unwrap();
        let idle = g.add_constraint(Constraint::equal(child, root, Attribute::Leading, 0.0));
        g.install(root, idle);
        (g, root)
    }

    #[test]
    fn test_dump_default_style() {
        let (g, root) = sample();
        assert_eq!(
            g.dump(root),
            "root #0\n  child.top == root.top + 4\n  \
             child.leading == root.leading (inactive)\n  child #1\n"
        );
    }

    #[test]
    fn test_dump_hides_inactive() {
        let (g, root) = sample();
        let style = DumpStyle {
            indent: "\t".to_string(),
            show_inactive: false,
        };
        let mut out = String::new();
        g.dump_to(root, &mut out, &style).unwrap();
        assert_eq!(out, "root #0\n\tchild.top == root.top + 4\n\tchild #1\n");
    }
}
