//! Error types for graph operations

use thiserror::Error;

/// Errors from structural operations on a [`Graph`](super::Graph)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Migration target does not sit below the migration source
    #[error("target '{target}' is not a descendant of '{ancestor}'")]
    NotADescendant { ancestor: String, target: String },

    /// Constraint endpoints live in disjoint trees, so nothing can own it
    #[error("'{first}' and '{second}' have no common ancestor")]
    NoCommonAncestor { first: String, second: String },
}

impl GraphError {
    pub fn not_a_descendant(ancestor: impl Into<String>, target: impl Into<String>) -> Self {
        Self::NotADescendant {
            ancestor: ancestor.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_descendant_display() {
        let err = GraphError::not_a_descendant("content", "clipping");
        assert_eq!(
            err.to_string(),
            "target 'clipping' is not a descendant of 'content'"
        );
    }
}
