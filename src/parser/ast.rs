//! Abstract Syntax Tree types for the scene language

use crate::graph::{Attribute, Relation};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - a complete scene
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub statements: Vec<Spanned<Statement>>,
}

/// Statement in a scene, executed in order
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `view name [in parent] [{ ... }]`
    View(ViewDecl),
    /// `guide owner.name [insets]`
    Guide(GuideDecl),
    /// `constrain a.attr = b.attr * m + c [modifiers]`
    Constrain(ConstrainDecl),
    /// `anchor node [top: .., left: .., bottom: .., right: ..]`
    Anchor(AnchorDecl),
    /// `fill node`
    Fill(Spanned<Identifier>),
    /// `migrate source -> target`
    Migrate(MigrateDecl),
    /// `dump node`
    Dump(Spanned<Identifier>),
    /// `solve node`
    Solve(Spanned<Identifier>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewDecl {
    pub name: Spanned<Identifier>,
    pub parent: Option<Spanned<Identifier>>,
    pub children: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuideDecl {
    pub owner: Spanned<Identifier>,
    pub name: Spanned<Identifier>,
    pub modifiers: Vec<Spanned<Modifier>>,
}

/// `node` or `node.guide`
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPath {
    pub node: Spanned<Identifier>,
    pub guide: Option<Spanned<Identifier>>,
}

/// `item.attribute`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRef {
    pub item: ItemPath,
    pub attribute: Spanned<Attribute>,
}

/// Right-hand side of a constraint
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintRhs {
    Attribute {
        target: AttributeRef,
        multiplier: f64,
        constant: f64,
    },
    Constant(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainDecl {
    pub left: AttributeRef,
    pub relation: Relation,
    pub right: ConstraintRhs,
    pub modifiers: Vec<Spanned<Modifier>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorDecl {
    pub node: Spanned<Identifier>,
    pub modifiers: Vec<Spanned<Modifier>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MigrateDecl {
    pub source: Spanned<Identifier>,
    pub target: Spanned<Identifier>,
}

/// `key: value` inside a modifier block
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub key: Spanned<Identifier>,
    pub value: Spanned<ModifierValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModifierValue {
    Number(f64),
    /// Bare identifier or quoted string
    Word(String),
}
