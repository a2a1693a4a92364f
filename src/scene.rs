//! Executes a parsed scene against a constraint graph
//!
//! Statements run in document order. Views declared inside a view block are
//! appended to that view; `dump` and `solve` append text to the scene output.

use std::fmt::{self, Write};

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;
use tracing::debug;

use crate::config::SceneConfig;
use crate::error::clamp_span;
use crate::graph::{
    solve_frames, AnchorSpec, Constraint, Frames, Graph, GraphError, GuideInsets, Item, NodeId,
    Priority, SolverError,
};
use crate::parser::ast::*;

/// Errors that can occur while executing a scene
#[derive(Debug, Error)]
pub enum SceneError {
    /// Reference to a node or guide that was never declared
    #[error("undefined identifier '{name}'")]
    UndefinedIdentifier {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    /// A view or guide declared twice
    #[error("'{name}' is already declared")]
    DuplicateName { name: String, span: Span },

    /// Modifier with an unknown key or a value of the wrong kind
    #[error("invalid modifier '{key}': {reason}")]
    InvalidModifier {
        key: String,
        reason: String,
        span: Span,
    },

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("constraint solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("failed to write scene output")]
    Output(#[from] fmt::Error),
}

impl SceneError {
    fn undefined(name: impl Into<String>, span: Span, suggestions: Vec<String>) -> Self {
        Self::UndefinedIdentifier {
            name: name.into(),
            span,
            suggestions,
        }
    }

    fn invalid_modifier(modifier: &Spanned<Modifier>, reason: impl Into<String>) -> Self {
        Self::InvalidModifier {
            key: modifier.node.key.node.0.clone(),
            reason: reason.into(),
            span: modifier.span.clone(),
        }
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UndefinedIdentifier { span, .. } => Some(span),
            Self::DuplicateName { span, .. } => Some(span),
            Self::InvalidModifier { span, .. } => Some(span),
            _ => None,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UndefinedIdentifier { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne. Errors without a
    /// span render as a single `Error:` line.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let message = self.to_string();
        let Some(span) = self.span() else {
            return format!("Error: {}\n", message);
        };

        let span = clamp_span(span, source.len());
        let mut report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            );
        if let Some(suggestions) = self.suggestions().filter(|s| !s.is_empty()) {
            report = report.with_help(format!("did you mean: {}?", suggestions.join(", ")));
        }

        let mut buf = Vec::new();
        if report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .is_err()
        {
            return format!("Error: {}\n", message);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A graph being built and transformed by scene statements
#[derive(Debug, Clone)]
pub struct Scene {
    graph: Graph,
    config: SceneConfig,
    output: String,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            graph: Graph::new(),
            config,
            output: String::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Text produced by `dump` and `solve` statements so far
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// Run every statement of `doc`
    pub fn execute(&mut self, doc: &Document) -> Result<(), SceneError> {
        for stmt in &doc.statements {
            self.execute_statement(stmt, None)?;
        }
        Ok(())
    }

    fn execute_statement(
        &mut self,
        stmt: &Spanned<Statement>,
        enclosing: Option<NodeId>,
    ) -> Result<(), SceneError> {
        match &stmt.node {
            Statement::View(view) => self.declare_view(view, enclosing),
            Statement::Guide(guide) => self.declare_guide(guide),
            Statement::Constrain(decl) => self.declare_constraint(decl),
            Statement::Anchor(anchor) => {
                let node = self.resolve_node(&anchor.node)?;
                let spec = anchor_spec(&anchor.modifiers)?;
                self.graph.set_anchors(node, spec);
                Ok(())
            }
            Statement::Fill(name) => {
                let node = self.resolve_node(name)?;
                self.graph.set_fill(node);
                Ok(())
            }
            Statement::Migrate(migrate) => {
                let source = self.resolve_node(&migrate.source)?;
                let target = self.resolve_node(&migrate.target)?;
                self.graph.migrate_subviews(source, target)?;
                Ok(())
            }
            Statement::Dump(name) => {
                let node = self.resolve_node(name)?;
                self.graph.dump_to(node, &mut self.output, &self.config.dump)?;
                Ok(())
            }
            Statement::Solve(name) => {
                let node = self.resolve_node(name)?;
                let frames = solve_frames(&self.graph, node, self.config.root_size)?;
                self.write_frames(node, &frames, 0)?;
                Ok(())
            }
        }
    }

    fn declare_view(
        &mut self,
        view: &ViewDecl,
        enclosing: Option<NodeId>,
    ) -> Result<(), SceneError> {
        let name = view.name.node.as_str();
        if self.graph.find_node(name).is_some() {
            return Err(SceneError::DuplicateName {
                name: name.to_string(),
                span: view.name.span.clone(),
            });
        }

        let parent = match &view.parent {
            Some(parent) => Some(self.resolve_node(parent)?),
            None => enclosing,
        };
        let node = self.graph.add_node(name);
        if let Some(parent) = parent {
            self.graph.add_child(parent, node);
        }
        debug!(view = name, parent = ?parent.map(|p| self.graph.name(p)), "declared view");

        for child in &view.children {
            self.execute_statement(child, Some(node))?;
        }
        Ok(())
    }

    fn declare_guide(&mut self, guide: &GuideDecl) -> Result<(), SceneError> {
        let owner = self.resolve_node(&guide.owner)?;
        let name = guide.name.node.as_str();
        if self.graph.find_guide(owner, name).is_some() {
            return Err(SceneError::DuplicateName {
                name: format!("{}.{}", guide.owner.node, name),
                span: guide.name.span.clone(),
            });
        }

        let mut insets = GuideInsets::default();
        for modifier in &guide.modifiers {
            let value = number(modifier)?;
            match modifier.node.key.node.as_str() {
                "top" => insets.top = value,
                "left" => insets.left = value,
                "bottom" => insets.bottom = value,
                "right" => insets.right = value,
                _ => {
                    return Err(SceneError::invalid_modifier(
                        modifier,
                        "expected one of: top, left, bottom, right",
                    ))
                }
            }
        }
        self.graph.add_guide(owner, name, insets);
        Ok(())
    }

    fn declare_constraint(&mut self, decl: &ConstrainDecl) -> Result<(), SceneError> {
        let first = self.resolve_item(&decl.left.item)?;
        let first_attribute = decl.left.attribute.node;

        let mut constraint = match &decl.right {
            ConstraintRhs::Attribute {
                target,
                multiplier,
                constant,
            } => {
                let second = self.resolve_item(&target.item)?;
                Constraint::new(
                    first,
                    first_attribute,
                    decl.relation,
                    second,
                    target.attribute.node,
                )
                .with_multiplier(*multiplier)
                .with_constant(*constant)
            }
            ConstraintRhs::Constant(value) => {
                Constraint::constant_only(first, first_attribute, decl.relation, *value)
            }
        };

        let mut active = true;
        for modifier in &decl.modifiers {
            match modifier.node.key.node.as_str() {
                "priority" => {
                    let value = number(modifier)?;
                    if !(1.0..=1000.0).contains(&value) {
                        return Err(SceneError::invalid_modifier(
                            modifier,
                            "priority must be between 1 and 1000",
                        ));
                    }
                    constraint.priority = Priority::new(value.round() as u16);
                }
                "active" => active = boolean(modifier)?,
                "id" => {
                    constraint.identifier = Some(match &modifier.node.value.node {
                        ModifierValue::Word(w) => w.clone(),
                        ModifierValue::Number(n) => n.to_string(),
                    })
                }
                _ => {
                    return Err(SceneError::invalid_modifier(
                        modifier,
                        "expected one of: priority, active, id",
                    ))
                }
            }
        }

        let id = self.graph.add_constraint(constraint);
        if active {
            self.graph.activate(id)?;
        } else {
            let owner = self.graph.natural_owner(id)?;
            self.graph.install(owner, id);
        }
        Ok(())
    }

    fn resolve_node(&self, name: &Spanned<Identifier>) -> Result<NodeId, SceneError> {
        self.graph.find_node(name.node.as_str()).ok_or_else(|| {
            let defined: Vec<&str> = self.graph.node_ids().map(|n| self.graph.name(n)).collect();
            SceneError::undefined(
                name.node.as_str(),
                name.span.clone(),
                find_similar(&defined, name.node.as_str(), 2),
            )
        })
    }

    fn resolve_item(&self, path: &ItemPath) -> Result<Item, SceneError> {
        let node = self.resolve_node(&path.node)?;
        let Some(guide_name) = &path.guide else {
            return Ok(Item::Node(node));
        };
        match self.graph.find_guide(node, guide_name.node.as_str()) {
            Some(guide) => Ok(Item::Guide(guide)),
            None => {
                let defined: Vec<&str> = self
                    .graph
                    .layout_guides(node)
                    .iter()
                    .map(|&g| self.graph.guide(g).name.as_str())
                    .collect();
                Err(SceneError::undefined(
                    format!("{}.{}", path.node.node, guide_name.node),
                    guide_name.span.clone(),
                    find_similar(&defined, guide_name.node.as_str(), 2),
                ))
            }
        }
    }

    fn write_frames(&mut self, node: NodeId, frames: &Frames, depth: usize) -> fmt::Result {
        if let Some(frame) = frames.get(node) {
            writeln!(
                self.output,
                "{}{} x={:.1} y={:.1} w={:.1} h={:.1}",
                self.config.dump.indent.repeat(depth),
                self.graph.name(node),
                frame.x,
                frame.y,
                frame.width,
                frame.height
            )?;
        }
        let children = self.graph.children(node).to_vec();
        for child in children {
            self.write_frames(child, frames, depth + 1)?;
        }
        Ok(())
    }
}

fn number(modifier: &Spanned<Modifier>) -> Result<f64, SceneError> {
    match modifier.node.value.node {
        ModifierValue::Number(n) => Ok(n),
        ModifierValue::Word(_) => Err(SceneError::invalid_modifier(modifier, "expected a number")),
    }
}

fn boolean(modifier: &Spanned<Modifier>) -> Result<bool, SceneError> {
    match &modifier.node.value.node {
        ModifierValue::Word(w) if w == "true" => Ok(true),
        ModifierValue::Word(w) if w == "false" => Ok(false),
        _ => Err(SceneError::invalid_modifier(modifier, "expected true or false")),
    }
}

fn anchor_spec(modifiers: &[Spanned<Modifier>]) -> Result<AnchorSpec, SceneError> {
    let mut spec = AnchorSpec::new();
    for modifier in modifiers {
        let value = number(modifier)?;
        match modifier.node.key.node.as_str() {
            "top" => spec.top = Some(value),
            "left" => spec.left = Some(value),
            "bottom" => spec.bottom = Some(value),
            "right" => spec.right = Some(value),
            _ => {
                return Err(SceneError::invalid_modifier(
                    modifier,
                    "expected one of: top, left, bottom, right",
                ))
            }
        }
    }
    Ok(spec)
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];
    for (i, &ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Find up to three names within `max_distance` edits of `target`, closest first
fn find_similar(defined: &[&str], target: &str, max_distance: usize) -> Vec<String> {
    let mut candidates: Vec<(&str, usize)> = defined
        .iter()
        .filter_map(|&name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((name, dist))
        })
        .collect();

    candidates.sort_by_key(|(_, d)| *d);
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}
