//! Core types for the constraint graph

use std::fmt;

/// Handle to a node (a view-like entity) in a [`Graph`](super::Graph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena index of this node
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a layout guide owned by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GuideId(pub(crate) usize);

/// Handle to a constraint record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

/// Something a constraint can refer to: a node or one of its layout guides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Node(NodeId),
    Guide(GuideId),
}

impl From<NodeId> for Item {
    fn from(id: NodeId) -> Self {
        Item::Node(id)
    }
}

impl From<GuideId> for Item {
    fn from(id: GuideId) -> Self {
        Item::Guide(id)
    }
}

/// Geometric attribute of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Top,
    Bottom,
    Leading,
    Trailing,
    Left,
    Right,
    Width,
    Height,
    CenterX,
    CenterY,
    /// Placeholder for the second attribute of a constant-only constraint
    NotAnAttribute,
}

impl Attribute {
    /// Parse an attribute name as written in scene files
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "leading" => Some(Self::Leading),
            "trailing" => Some(Self::Trailing),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "center_x" => Some(Self::CenterX),
            "center_y" => Some(Self::CenterY),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Leading => "leading",
            Self::Trailing => "trailing",
            Self::Left => "left",
            Self::Right => "right",
            Self::Width => "width",
            Self::Height => "height",
            Self::CenterX => "center_x",
            Self::CenterY => "center_y",
            Self::NotAnAttribute => "none",
        }
    }

    /// The four edges used by the anchor builder
    pub fn edges() -> &'static [Attribute] {
        &[Self::Top, Self::Leading, Self::Bottom, Self::Trailing]
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relation between the two sides of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::LessOrEqual => "<=",
            Relation::Equal => "==",
            Relation::GreaterOrEqual => ">=",
        })
    }
}

/// Constraint priority, 1..=1000. Higher wins when constraints conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Priority(u16);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000);
    pub const HIGH: Priority = Priority(750);
    pub const LOW: Priority = Priority(250);

    /// Create a priority, clamped into 1..=1000
    pub fn new(value: u16) -> Self {
        Self(value.clamp(1, 1000))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn is_required(self) -> bool {
        self == Self::REQUIRED
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::REQUIRED
    }
}

/// Distances of a layout guide's edges inward from its owner's edges
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GuideInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl GuideInsets {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn uniform(inset: f64) -> Self {
        Self::new(inset, inset, inset, inset)
    }
}

/// A linear layout relation:
/// `first.first_attribute <relation> second.second_attribute * multiplier + constant`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub first: Item,
    pub first_attribute: Attribute,
    pub relation: Relation,
    /// Absent for constant-only constraints (`width == 44`)
    pub second: Option<Item>,
    pub second_attribute: Attribute,
    pub multiplier: f64,
    pub constant: f64,
    pub priority: Priority,
    pub active: bool,
    pub identifier: Option<String>,
    /// Node whose constraint list currently holds this record
    pub(crate) owner: Option<NodeId>,
}

impl Constraint {
    /// `first.attribute == second.attribute * 1 + 0`, required, inactive
    pub fn new(
        first: impl Into<Item>,
        first_attribute: Attribute,
        relation: Relation,
        second: impl Into<Item>,
        second_attribute: Attribute,
    ) -> Self {
        Self {
            first: first.into(),
            first_attribute,
            relation,
            second: Some(second.into()),
            second_attribute,
            multiplier: 1.0,
            constant: 0.0,
            priority: Priority::REQUIRED,
            active: false,
            identifier: None,
            owner: None,
        }
    }

    /// `first.attribute <relation> constant`
    pub fn constant_only(
        first: impl Into<Item>,
        first_attribute: Attribute,
        relation: Relation,
        constant: f64,
    ) -> Self {
        Self {
            first: first.into(),
            first_attribute,
            relation,
            second: None,
            second_attribute: Attribute::NotAnAttribute,
            multiplier: 0.0,
            constant,
            priority: Priority::REQUIRED,
            active: false,
            identifier: None,
            owner: None,
        }
    }

    /// Same-attribute equality between two items, offset by `constant`
    pub fn equal(
        first: impl Into<Item>,
        second: impl Into<Item>,
        attribute: Attribute,
        constant: f64,
    ) -> Self {
        Self::new(first, attribute, Relation::Equal, second, attribute).with_constant(constant)
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Node currently holding this constraint, if installed
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// True if either endpoint is exactly `item`
    pub fn touches(&self, item: Item) -> bool {
        self.first == item || self.second == Some(item)
    }
}
